pub mod errors;
pub mod graphql;
pub mod headers;
mod introspection;
pub(crate) mod json_schema;
mod schema_resource;
pub mod server;
mod server_handler;

pub use introspection::INTROSPECTION_QUERY;
pub use server_handler::GraphQLServerHandler;
