//! MCP tools to allow an AI agent to introspect a GraphQL schema and execute operations.

pub(crate) mod graphql_request;
pub(crate) mod introspect_schema;
