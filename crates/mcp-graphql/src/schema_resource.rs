//! The GraphQL schema exposed as an MCP resource

use rmcp::model::{AnnotateAble as _, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde_json::json;
use url::Url;

use crate::errors::{GraphQLError, McpError};
use crate::graphql::Forwarder;
use crate::introspection::INTROSPECTION_QUERY;

/// The name of the schema resource
pub const SCHEMA_RESOURCE_NAME: &str = "graphql-schema";

const MIME_TYPE: &str = "application/json";

/// The introspection result of the endpoint, addressed by the endpoint URL
#[derive(Clone)]
pub struct SchemaResource {
    uri: Url,
}

impl SchemaResource {
    pub fn new(uri: Url) -> Self {
        Self { uri }
    }

    pub fn resource(&self) -> Resource {
        let mut resource = RawResource::new(self.uri.as_str(), SCHEMA_RESOURCE_NAME);
        resource.description = Some("access graphql schema".to_string());
        resource.mime_type = Some(MIME_TYPE.to_string());
        resource.no_annotation()
    }

    /// Whether a requested URI addresses this resource
    pub fn matches(&self, uri: &str) -> bool {
        Url::parse(uri).is_ok_and(|uri| uri == self.uri)
    }

    pub async fn read(
        &self,
        forwarder: &Forwarder,
        uri: String,
    ) -> Result<ReadResourceResult, McpError> {
        let text = forwarder
            .execute(INTROSPECTION_QUERY, None)
            .await
            .map_err(|error| match error {
                GraphQLError::Status { status, body } => McpError::internal_error(
                    format!("Failed to introspect schema: http status {}", status.as_u16()),
                    Some(json!({ "status": status.as_u16(), "body": body })),
                ),
                error => {
                    McpError::internal_error(format!("Failed to introspect schema: {error}"), None)
                }
            })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri,
                mime_type: Some(MIME_TYPE.to_string()),
                text,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::Config;
    use mockito::Matcher;
    use rmcp::model::ErrorCode;

    #[test]
    fn resource_is_addressed_by_the_endpoint() {
        let resource =
            SchemaResource::new("https://countries.trevorblades.com/".parse().unwrap()).resource();

        assert_eq!(resource.uri, "https://countries.trevorblades.com/");
        assert_eq!(resource.name, SCHEMA_RESOURCE_NAME);
        assert_eq!(resource.mime_type.as_deref(), Some(MIME_TYPE));
    }

    #[test]
    fn matches_equivalent_uris_only() {
        let resource = SchemaResource::new("https://countries.trevorblades.com/".parse().unwrap());

        assert!(resource.matches("https://countries.trevorblades.com/"));
        assert!(resource.matches("https://countries.trevorblades.com"));
        assert!(!resource.matches("https://countries.trevorblades.com/other"));
        assert!(!resource.matches("not a uri"));
    }

    #[tokio::test]
    async fn reading_runs_introspection() {
        let upstream = r#"{"data":{"__schema":{"types":[]}}}"#;
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Json(serde_json::json!({ "query": INTROSPECTION_QUERY })))
            .with_body(upstream)
            .expect(1)
            .create_async()
            .await;
        let endpoint: Url = server.url().parse().unwrap();
        let forwarder = Forwarder::new(Config::new(endpoint.clone())).unwrap();

        let mut result = SchemaResource::new(endpoint.clone())
            .read(&forwarder, endpoint.to_string())
            .await
            .unwrap();

        mock.assert_async().await;
        let Some(ResourceContents::TextResourceContents {
            uri,
            mime_type,
            text,
        }) = result.contents.pop()
        else {
            panic!("Expected TextResourceContents");
        };
        assert_eq!(uri, endpoint.to_string());
        assert_eq!(mime_type.as_deref(), Some(MIME_TYPE));
        assert_eq!(text, upstream);
    }

    #[tokio::test]
    async fn error_status_keeps_the_body_in_the_error_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let endpoint: Url = server.url().parse().unwrap();
        let forwarder = Forwarder::new(Config::new(endpoint.clone())).unwrap();

        let error = SchemaResource::new(endpoint.clone())
            .read(&forwarder, endpoint.to_string())
            .await
            .unwrap_err();

        assert_eq!(error.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(error.data, Some(json!({ "status": 500, "body": "boom" })));
    }
}
