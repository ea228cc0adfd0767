//! Runtime configuration
//!
//! This module is only used by the binaries. It loads the server configuration from the
//! environment and an optional YAML file.

mod config;
mod endpoint;
mod logging;
mod parsers;

use std::path::Path;

pub use config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

/// Separator to use when drilling down into nested options in the env figment
const ENV_NESTED_SEPARATOR: &str = "__";

/// Prefix for environment variables overriding any config key
const ENV_PREFIX: &str = "MCP_GRAPHQL_";

/// Read configuration from environment variables only (when no config file is provided)
#[allow(clippy::result_large_err)]
pub fn read_config_from_env() -> Result<Config, figment::Error> {
    Figment::new()
        .join(graphql_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .extract()
}

/// Read in a config from a YAML file, filling in any missing values from the environment
#[allow(clippy::result_large_err)]
pub fn read_config(yaml_path: impl AsRef<Path>) -> Result<Config, figment::Error> {
    Figment::new()
        .join(graphql_env())
        .join(Env::prefixed(ENV_PREFIX).split(ENV_NESTED_SEPARATOR))
        .join(Yaml::file(yaml_path))
        .extract()
}

/// Figment provider mapping the plain `URL`, `HEADERS` and `HEADER` environment variables
/// onto their config keys
fn graphql_env() -> Env {
    Env::raw()
        .only(&["url", "headers", "header"])
        .map(|key| match key.to_string().to_lowercase().as_str() {
            "url" => "endpoint".into(),
            other => other.to_string().into(),
        })
}
