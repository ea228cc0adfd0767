//! Forward GraphQL requests from an MCP tool to the configured endpoint

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rmcp::model::{CallToolResult, Content, ErrorCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::errors::{GraphQLError, McpError, ServerError};

/// The default bound on a single round trip to the endpoint
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for talking to the GraphQL endpoint, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

impl Config {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The JSON body sent to the endpoint
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Map<String, Value>>,
}

/// Sends GraphQL documents to a single endpoint and hands back the raw response body
#[derive(Debug)]
pub struct Forwarder {
    config: Config,
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ServerError::Client)?;
        Ok(Self { config, client })
    }

    /// Execute a GraphQL document against the endpoint.
    ///
    /// GraphQL errors inside a successful HTTP response are not failures here; the body is
    /// returned as is. Any status of 400 or above is reported as an error, and that error still
    /// carries the body.
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<&Map<String, Value>>,
    ) -> Result<String, GraphQLError> {
        let body =
            serde_json::to_vec(&Request { query, variables }).map_err(GraphQLError::Encode)?;

        // Configured headers are applied last so they may replace the content type
        let request = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .headers(self.config.headers.clone())
            .body(body)
            .build()
            .map_err(GraphQLError::Request)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(GraphQLError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GraphQLError::ReadBody)?;

        debug!(
            endpoint = %self.config.endpoint,
            status = status.as_u16(),
            length = body.len(),
            "GraphQL request completed"
        );

        if status.as_u16() >= 400 {
            return Err(GraphQLError::Status { status, body });
        }

        Ok(body)
    }
}

/// Convert the outcome of a forwarded request into an MCP tool result.
///
/// An error status becomes a tool result flagged as an error whose content is the response body.
/// Every other failure is returned as a protocol error.
pub(crate) fn into_tool_result(
    result: Result<String, GraphQLError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(body) => Ok(CallToolResult::success(vec![Content::text(body)])),
        Err(GraphQLError::Status { status, body }) => {
            warn!(status = status.as_u16(), "GraphQL endpoint returned an error status");
            Ok(CallToolResult::error(vec![Content::text(body)]))
        }
        Err(error) => Err(McpError::new(
            ErrorCode::INTERNAL_ERROR,
            error.to_string(),
            None,
        )),
    }
}

/// Collect the text content of a tool result
#[cfg(test)]
pub(crate) fn content_text(result: &CallToolResult) -> String {
    use rmcp::model::RawContent;
    use std::ops::Deref as _;

    result
        .content
        .iter()
        .filter_map(|c| match c.deref() {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rstest::rstest;
    use serde_json::json;

    fn forwarder(url: &str) -> Forwarder {
        Forwarder::new(Config::new(url.parse().unwrap())).unwrap()
    }

    #[test]
    fn request_without_variables_omits_the_key() {
        let body = serde_json::to_value(Request {
            query: "{ countries { code } }",
            variables: None,
        })
        .unwrap();

        assert_eq!(body, json!({ "query": "{ countries { code } }" }));
        assert!(body.get("variables").is_none());
    }

    #[test]
    fn request_with_variables_includes_them() {
        let variables = json!({ "code": "BR", "limit": 3 });
        let body = serde_json::to_value(Request {
            query: "query Country($code: ID!) { country(code: $code) { name } }",
            variables: variables.as_object(),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({
                "query": "query Country($code: ID!) { country(code: $code) { name } }",
                "variables": { "code": "BR", "limit": 3 },
            })
        );
    }

    #[tokio::test]
    async fn sends_query_without_variables() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "query": "{ continents { code } }" })))
            .with_body(r#"{"data":{"continents":[]}}"#)
            .expect(1)
            .create_async()
            .await;

        let body = forwarder(&server.url())
            .execute("{ continents { code } }", None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"data":{"continents":[]}}"#);
    }

    #[tokio::test]
    async fn sends_query_with_variables() {
        let mut server = mockito::Server::new_async().await;
        let variables = json!({ "code": "DE" });
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({
                "query": "query ($code: ID!) { country(code: $code) { name } }",
                "variables": { "code": "DE" },
            })))
            .with_body(r#"{"data":{"country":{"name":"Germany"}}}"#)
            .expect(1)
            .create_async()
            .await;

        let body = forwarder(&server.url())
            .execute(
                "query ($code: ID!) { country(code: $code) { name } }",
                variables.as_object(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"data":{"country":{"name":"Germany"}}}"#);
    }

    #[tokio::test]
    async fn sends_configured_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer abc")
            .match_header("x-tenant", "acme")
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let mut config = Config::new(server.url().parse().unwrap());
        config.headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer abc"),
        );
        config
            .headers
            .insert("x-tenant", HeaderValue::from_static("acme"));

        Forwarder::new(config)
            .unwrap()
            .execute("{ __typename }", None)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_keeps_the_body() {
        let mut server = mockito::Server::new_async().await;
        let upstream = r#"{"errors":[{"message":"Unauthorized"}]}"#;
        let mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body(upstream)
            .create_async()
            .await;

        let error = forwarder(&server.url())
            .execute("{ me { id } }", None)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(error.to_string(), "http status 401");
        match error {
            GraphQLError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(body, upstream);
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[rstest]
    #[case(399, false)]
    #[case(400, true)]
    #[case(599, true)]
    #[case(600, true)]
    #[tokio::test]
    async fn statuses_from_400_up_are_errors(#[case] code: usize, #[case] is_error: bool) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(code)
            .with_body("upstream body")
            .create_async()
            .await;

        let result = forwarder(&server.url()).execute("{ a }", None).await;

        match result {
            Err(GraphQLError::Status { status, body }) => {
                assert!(is_error, "status {code} should not be an error");
                assert_eq!(status.as_u16() as usize, code);
                assert_eq!(body, "upstream body");
            }
            Ok(body) => {
                assert!(!is_error, "status {code} should be an error");
                assert_eq!(body, "upstream body");
            }
            Err(other) => panic!("unexpected error for status {code}: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_endpoint_hits_the_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                std::io::Write::write_all(w, b"{}")
            })
            .create_async()
            .await;

        let config = Config {
            timeout: Duration::from_millis(100),
            ..Config::new(server.url().parse().unwrap())
        };
        let error = Forwarder::new(config)
            .unwrap()
            .execute("{ __typename }", None)
            .await
            .unwrap_err();

        // The stall may land before or after the response head is read
        match error {
            GraphQLError::Transport(e) | GraphQLError::ReadBody(e) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    // GraphQL-level errors on a 200 pass through as success content
    #[tokio::test]
    async fn graphql_errors_with_ok_status_are_not_failures() {
        let mut server = mockito::Server::new_async().await;
        let upstream = r#"{"data":null,"errors":[{"message":"Cannot query field \"nope\""}]}"#;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(upstream)
            .create_async()
            .await;

        let body = forwarder(&server.url())
            .execute("{ nope }", None)
            .await
            .unwrap();

        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let error = forwarder("http://127.0.0.1:1/")
            .execute("{ __typename }", None)
            .await
            .unwrap_err();

        assert!(matches!(error, GraphQLError::Transport(_)));
        assert!(error.to_string().starts_with("request failed"));
    }

    #[test]
    fn success_becomes_text_content() {
        let result = into_tool_result(Ok(r#"{"data":{}}"#.to_string())).unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(content_text(&result), r#"{"data":{}}"#);
    }

    #[test]
    fn status_error_becomes_error_result_with_body() {
        let result = into_tool_result(Err(GraphQLError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "upstream exploded".to_string(),
        }))
        .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(content_text(&result), "upstream exploded");
    }

    #[test]
    fn encode_error_becomes_internal_error() {
        let json_error = serde_json::from_str::<Value>("{").unwrap_err();
        let error = into_tool_result(Err(GraphQLError::Encode(json_error))).unwrap_err();

        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
        assert!(error.message.starts_with("failed to marshal request"));
    }
}
