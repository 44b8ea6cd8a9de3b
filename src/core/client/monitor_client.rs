use std::time::Duration;

use async_trait::async_trait;
use http::{header, StatusCode};
use reqwest::Client;
use tracing::debug;

use crate::domain::monitor::error::{MonitorError, MonitorResult};

/// A GET against the monitor API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    /// Already-encoded query string, without the leading `?`.
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Authenticated request-sending capability handed to the query pipeline.
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> MonitorResult<RawResponse>;
}

/// reqwest-backed sender with optional bearer auth.
pub struct HttpRequestSender {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpRequestSender {
    pub fn new(base_url: &str, access_token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("azmon-query-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> String {
        let path = request.path.trim_start_matches('/');
        if request.query.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}?{}", self.base_url, path, request.query)
        }
    }
}

#[async_trait]
impl RequestSender for HttpRequestSender {
    async fn send(&self, request: &ApiRequest) -> MonitorResult<RawResponse> {
        let url = self.url_for(request);
        debug!("AzureMonitor request URL: {}", url);

        let mut builder = self
            .client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| MonitorError::Transport(format!("{} (url={})", e, url)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| MonitorError::Transport(format!("failed to read body: {} (url={})", e, url)))?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str, query: &str) -> ApiRequest {
        ApiRequest {
            path: path.to_string(),
            query: query.to_string(),
        }
    }

    #[tokio::test]
    async fn sends_get_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/subscriptions/sub1/resources")
            .match_query(mockito::Matcher::UrlEncoded("api-version".into(), "2018-01-01".into()))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(r#"{"value":[]}"#)
            .create_async()
            .await;

        let sender = HttpRequestSender::new(
            &format!("{}/subscriptions/", server.url()),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let resp = sender
            .send(&request("sub1/resources", "api-version=2018-01-01"))
            .await
            .unwrap();

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, r#"{"value":[]}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sub1/resources")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let sender = HttpRequestSender::new(&server.url(), None, Duration::from_secs(5)).unwrap();
        let resp = sender.send(&request("/sub1/resources", "")).await.unwrap();

        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert_eq!(resp.body, "forbidden");
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let sender =
            HttpRequestSender::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let result = sender.send(&request("sub1/resources", "")).await;
        assert!(matches!(result, Err(MonitorError::Transport(_))));
    }
}
