use rmcp::model::{CallToolResult, Tool};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::errors::McpError;
use crate::graphql::{self, Forwarder};
use crate::introspection::INTROSPECTION_QUERY;
use crate::schema_from_type;

/// The name of the tool to introspect the GraphQL schema
pub const INTROSPECT_SCHEMA_TOOL_NAME: &str = "introspect_schema";

/// A tool that sends the full introspection query to the endpoint
#[derive(Clone)]
pub struct IntrospectSchema {
    pub tool: Tool,
}

/// Input for the introspect_schema tool. Any arguments are ignored.
#[derive(JsonSchema, Deserialize)]
pub struct Input {}

impl IntrospectSchema {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                INTROSPECT_SCHEMA_TOOL_NAME,
                "introspect the GraphQL schema, use this tool before doing a query to get the schema information if you do not have it available as a resource already.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, forwarder: &Forwarder) -> Result<CallToolResult, McpError> {
        graphql::into_tool_result(forwarder.execute(INTROSPECTION_QUERY, None).await)
    }
}

impl Default for IntrospectSchema {
    fn default() -> Self {
        Self::new()
    }
}
