use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorCode, Implementation, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::{McpError, ServerError};
use crate::graphql::{self, Forwarder};
use crate::introspection::tools::graphql_request::{GRAPHQL_REQUEST_TOOL_NAME, GraphQLRequest};
use crate::introspection::tools::introspect_schema::{
    INTROSPECT_SCHEMA_TOOL_NAME, IntrospectSchema,
};
use crate::schema_resource::SchemaResource;

/// The MCP handler binding the GraphQL tools and schema resource to a forwarder
#[derive(Clone)]
pub struct GraphQLServerHandler {
    forwarder: Arc<Forwarder>,
    introspect_schema_tool: IntrospectSchema,
    graphql_request_tool: GraphQLRequest,
    schema_resource: SchemaResource,
}

impl GraphQLServerHandler {
    pub fn new(config: graphql::Config) -> Result<Self, ServerError> {
        let schema_resource = SchemaResource::new(config.endpoint.clone());
        Ok(Self {
            forwarder: Arc::new(Forwarder::new(config)?),
            introspect_schema_tool: IntrospectSchema::new(),
            graphql_request_tool: GraphQLRequest::new(),
            schema_resource,
        })
    }

    async fn call_tool_impl(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Calling tool");
        match request.name.as_ref() {
            INTROSPECT_SCHEMA_TOOL_NAME => {
                self.introspect_schema_tool
                    .execute(&self.forwarder)
                    .await
            }
            GRAPHQL_REQUEST_TOOL_NAME => {
                self.graphql_request_tool
                    .execute(&self.forwarder, convert_arguments(request)?)
                    .await
            }
            _ => Err(tool_not_found(&request.name)),
        }
    }

    fn list_tools_impl(&self) -> ListToolsResult {
        ListToolsResult {
            next_cursor: None,
            tools: vec![
                self.introspect_schema_tool.tool.clone(),
                self.graphql_request_tool.tool.clone(),
            ],
        }
    }

    fn list_resources_impl(&self) -> ListResourcesResult {
        ListResourcesResult {
            next_cursor: None,
            resources: vec![self.schema_resource.resource()],
        }
    }

    async fn read_resource_impl(
        &self,
        request: ReadResourceRequestParam,
    ) -> Result<ReadResourceResult, McpError> {
        if !self.schema_resource.matches(&request.uri) {
            return Err(McpError::resource_not_found(
                format!("Resource not found for URI: {}", request.uri),
                None,
            ));
        }
        self.schema_resource
            .read(&self.forwarder, request.uri)
            .await
    }
}

impl ServerHandler for GraphQLServerHandler {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.clone();
        self.call_tool_impl(request)
            .await
            .inspect_err(|e| error!(tool = %name, "Tool call failed: {}", e.message))
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(self.list_tools_impl())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(self.list_resources_impl())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_resource_impl(request).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-graphql".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}

fn convert_arguments<T: serde::de::DeserializeOwned>(
    arguments: CallToolRequestParam,
) -> Result<T, McpError> {
    serde_json::from_value(Value::from(arguments.arguments))
        .map_err(|_| McpError::new(ErrorCode::INVALID_PARAMS, "Invalid input".to_string(), None))
}
