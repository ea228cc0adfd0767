//! Custom headers sent with every GraphQL request
//!
//! Headers come from one of two sources, with `HEADERS` taking precedence:
//!
//! - `HEADERS`: a JSON object of header names to values. When the value is not a JSON object,
//!   the whole string is read as a single `Name: Value` pair.
//! - `HEADER`: a single `Name: Value` pair.
//!
//! When both are present `HEADER` is ignored.

use std::collections::BTreeMap;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::warn;

use crate::errors::ServerError;

/// The `HEADERS` setting, either already structured (from a config file) or as raw text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum HeadersSpec {
    Map(BTreeMap<String, String>),
    Text(String),
}

impl HeadersSpec {
    fn is_blank(&self) -> bool {
        match self {
            HeadersSpec::Map(_) => false,
            HeadersSpec::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Resolve the configured header sources into the headers to send
pub fn header_map(
    headers: Option<&HeadersSpec>,
    header: Option<&str>,
) -> Result<HeaderMap, ServerError> {
    let headers = headers.filter(|spec| !spec.is_blank());
    let header = header.filter(|raw| !raw.trim().is_empty());

    match (headers, header) {
        (Some(spec), ignored) => {
            if ignored.is_some() {
                warn!("Both HEADERS and HEADER are set - ignoring HEADER");
            }
            from_spec(spec)
        }
        (None, Some(raw)) => from_pair(raw),
        (None, None) => Ok(HeaderMap::new()),
    }
}

fn from_spec(spec: &HeadersSpec) -> Result<HeaderMap, ServerError> {
    match spec {
        HeadersSpec::Map(map) => from_map(map),
        HeadersSpec::Text(raw) => match serde_json::from_str::<BTreeMap<String, String>>(raw) {
            Ok(map) => from_map(&map),
            Err(_) => from_pair(raw),
        },
    }
}

fn from_map(map: &BTreeMap<String, String>) -> Result<HeaderMap, ServerError> {
    let mut headers = HeaderMap::with_capacity(map.len());
    for (name, value) in map {
        headers.insert(HeaderName::from_str(name)?, HeaderValue::from_str(value)?);
    }
    Ok(headers)
}

/// Split a `Name: Value` string at its first colon
fn from_pair(raw: &str) -> Result<HeaderMap, ServerError> {
    let mut headers = HeaderMap::new();
    match raw.split_once(':') {
        Some((name, value)) => {
            headers.insert(
                HeaderName::from_str(name.trim())?,
                HeaderValue::from_str(value.trim())?,
            );
        }
        None => warn!("Header configuration has no `Name: Value` separator - ignoring it"),
    }
    Ok(headers)
}
