use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use bon::bon;
use rmcp::ServiceExt as _;
use rmcp::transport::StreamableHttpService;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::ServerError;
use crate::graphql;
use crate::server_handler::GraphQLServerHandler;

/// An MCP server exposing a GraphQL endpoint
pub struct Server {
    transport: Transport,
    forwarder_config: graphql::Config,
}

/// The transport used to talk to the MCP client
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    /// Use standard IO for server <> client communication
    #[default]
    Stdio,

    /// Host the MCP server on the configuration, using streamable HTTP messages.
    StreamableHttp {
        /// The IP address to bind to
        #[serde(default = "Transport::default_address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "Transport::default_port")]
        port: u16,
    },
}

impl Transport {
    fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        5000
    }
}

#[bon]
impl Server {
    #[builder]
    pub fn new(transport: Transport, forwarder_config: graphql::Config) -> Self {
        Self {
            transport,
            forwarder_config,
        }
    }

    pub async fn start(self) -> Result<(), ServerError> {
        info!(endpoint = %self.forwarder_config.endpoint, "Forwarding GraphQL requests");
        let handler = GraphQLServerHandler::new(self.forwarder_config)?;

        match self.transport {
            Transport::StreamableHttp { address, port } => {
                info!(port = ?port, address = ?address, "Starting MCP server in Streamable HTTP mode");
                let listen_address = SocketAddr::new(address, port);
                let service = StreamableHttpService::new(
                    move || Ok(handler.clone()),
                    LocalSessionManager::default().into(),
                    Default::default(),
                );
                let router = axum::Router::new().nest_service("/mcp", service);
                let tcp_listener = tokio::net::TcpListener::bind(listen_address).await?;
                axum::serve(tcp_listener, router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
            Transport::Stdio => {
                info!("Starting MCP server in stdio mode");
                let service = handler
                    .serve(stdio())
                    .await
                    .inspect_err(|e| {
                        error!("serving error: {:?}", e);
                    })
                    .map_err(|e| ServerError::McpInitialize(Box::new(e)))?;
                service.waiting().await?;
            }
        }

        Ok(())
    }
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down MCP server");
}
