use reqwest::StatusCode;
use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};
use tokio::task::JoinError;

/// An error forwarding a request to the GraphQL endpoint
#[derive(Debug, thiserror::Error)]
pub enum GraphQLError {
    #[error("failed to marshal request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to create request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// The endpoint answered with a 4xx or 5xx status. The body is kept.
    #[error("http status {}", .status.as_u16())]
    Status { status: StatusCode, body: String },
}

/// An error in server initialization
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to initialize MCP server: {0}")]
    McpInitialize(Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to start server")]
    StartupError(#[from] JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An MCP tool error
pub type McpError = rmcp::model::ErrorData;
