use std::time::Duration;

use mcp_graphql::errors::ServerError;
use mcp_graphql::graphql;
use mcp_graphql::headers::{HeadersSpec, header_map};
use mcp_graphql::server::Transport;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;
use url::Url;

use super::{endpoint::Endpoint, logging::Logging, parsers};

/// Configuration for the MCP server
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The target GraphQL endpoint [default: https://countries.trevorblades.com/]
    #[serde(deserialize_with = "parsers::blank_as_none")]
    #[schemars(with = "Option<Url>")]
    pub endpoint: Option<Endpoint>,

    /// Headers to include in all GraphQL requests, as a map, a JSON object string, or a single
    /// `Name: Value` string
    pub headers: Option<HeadersSpec>,

    /// A single `Name: Value` header to include in all GraphQL requests. Ignored when `headers`
    /// is set.
    pub header: Option<String>,

    /// How long to wait for the GraphQL endpoint to answer a request
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// Logging configuration
    pub logging: Logging,

    /// The type of server transport to use
    pub transport: Transport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            headers: None,
            header: None,
            timeout: graphql::DEFAULT_TIMEOUT,
            logging: Logging::default(),
            transport: Transport::default(),
        }
    }
}

impl Config {
    /// Resolve the settings used to talk to the GraphQL endpoint
    pub fn forwarder_config(&self) -> Result<graphql::Config, ServerError> {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.clone().into_inner(),
            None => {
                let endpoint = Endpoint::default().into_inner();
                info!("URL not set - using default endpoint {endpoint}");
                endpoint
            }
        };

        Ok(graphql::Config {
            endpoint,
            headers: header_map(self.headers.as_ref(), self.header.as_deref())?,
            timeout: self.timeout,
        })
    }
}
