// Schema download over HTTP
use mongoschema_core::{Error, Result};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, error, info};

/// Fetches JSON Schema documents. Holds one HTTP client for its lifetime.
#[derive(Debug, Clone, Default)]
pub struct SchemaFetcher {
    client: reqwest::Client,
}

impl SchemaFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Transport failures and non-2xx statuses are `Error::Fetch`; a body that
    /// is not JSON is `Error::MalformedResponse`. No retries.
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        info!("Fetching schema from {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching schema from URL: {}", e);
                Error::Fetch(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Schema request to {} returned HTTP {}", url, status);
            return Err(Error::Fetch(format!("HTTP {} from {}", status, url)));
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read schema response body: {}", e);
            Error::Fetch(e.to_string())
        })?;
        debug!("Schema response: {} bytes", body.len());

        serde_json::from_str(&body).map_err(|e| {
            error!("The URL does not contain valid JSON: {}", e);
            Error::MalformedResponse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/person.schema.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type": "object", "properties": {}}"#)
            .create_async()
            .await;

        let fetcher = SchemaFetcher::new();
        let schema = fetcher
            .fetch(&format!("{}/person.schema.json", server.url()))
            .await
            .unwrap();

        assert_eq!(schema, json!({ "type": "object", "properties": {} }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.json")
            .with_status(404)
            .create_async()
            .await;

        let result = SchemaFetcher::new()
            .fetch(&format!("{}/missing.json", server.url()))
            .await;

        assert!(matches!(result, Err(Error::Fetch(ref msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/page.html")
            .with_status(200)
            .with_body("<html>not a schema</html>")
            .create_async()
            .await;

        let result = SchemaFetcher::new()
            .fetch(&format!("{}/page.html", server.url()))
            .await;

        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let result = SchemaFetcher::new().fetch("http://127.0.0.1:1/schema.json").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
