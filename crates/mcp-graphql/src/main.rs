use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use mcp_graphql::server::Server;
use runtime::Config;
use tracing::info;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, Parser)]
#[command(
    version,
    styles = STYLES,
    about = "mcp-graphql - expose a GraphQL endpoint to AI agents over MCP",
    after_help = "The endpoint is read from URL and custom headers from HEADERS or HEADER. Any \
                  config key can also be set through MCP_GRAPHQL_<KEY>, using __ between nested keys."
)]
struct Args {
    /// Path to an optional YAML config file
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config: Config = match args.config {
        Some(config_path) => runtime::read_config(config_path)?,
        None => runtime::read_config_from_env()?,
    };

    let _guard = config.logging.setup()?;

    info!("mcp-graphql v{}", std::env!("CARGO_PKG_VERSION"));

    let forwarder_config = config.forwarder_config()?;

    Ok(Server::builder()
        .transport(config.transport)
        .forwarder_config(forwarder_config)
        .build()
        .start()
        .await?)
}
