use rmcp::model::{CallToolResult, ErrorCode, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::McpError;
use crate::graphql::{self, Forwarder};
use crate::schema_from_type;

/// The name of the tool to execute an ad hoc GraphQL request
pub const GRAPHQL_REQUEST_TOOL_NAME: &str = "graphql_request";

#[derive(Clone)]
pub struct GraphQLRequest {
    pub tool: Tool,
}

/// Input for the graphql_request tool.
#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// the GraphQL query string (e.g. 'query { user { name } }')
    query: String,

    #[serde(default)]
    #[schemars(schema_with = "variables_schema")]
    variables: Option<Value>,
}

fn variables_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "type": "object",
        "description": "optional variables"
    })
}

impl GraphQLRequest {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                GRAPHQL_REQUEST_TOOL_NAME,
                "query a GraphQL endpoint with the given query and variables",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(
        &self,
        forwarder: &Forwarder,
        input: Input,
    ) -> Result<CallToolResult, McpError> {
        if input.query.trim().is_empty() {
            return Err(McpError::new(
                ErrorCode::INVALID_PARAMS,
                "query must not be empty".to_string(),
                None,
            ));
        }
        let variables = variables(input.variables)?;

        graphql::into_tool_result(forwarder.execute(&input.query, variables.as_ref()).await)
    }
}

impl Default for GraphQLRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize the variables argument into an object.
///
/// Agents sometimes send the variables as a JSON-encoded string, so that form is accepted too.
/// An empty object is treated the same as no variables.
fn variables(value: Option<Value>) -> Result<Option<Map<String, Value>>, McpError> {
    let variables = match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(Value::String(s)) => Some(
            serde_json::from_str::<Map<String, Value>>(&s).map_err(|_| invalid_variables())?,
        ),
        Some(_) => return Err(invalid_variables()),
    };
    Ok(variables.filter(|map| !map.is_empty()))
}

fn invalid_variables() -> McpError {
    McpError::new(
        ErrorCode::INVALID_PARAMS,
        "variables must be a JSON object".to_string(),
        None,
    )
}
