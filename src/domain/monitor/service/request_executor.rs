use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::core::client::cancel::CancelSignal;
use crate::core::client::dto::{MetricsResponse, ResourcesResponse};
use crate::core::client::monitor_client::{ApiRequest, RequestSender};
use crate::domain::monitor::error::{MonitorError, MonitorResult};
use crate::domain::monitor::model::{CompiledQuery, API_VERSION};

/// Sends compiled requests and decodes their payloads.
pub struct RequestExecutor<'a> {
    sender: &'a dyn RequestSender,
    cancel: &'a CancelSignal,
}

impl<'a> RequestExecutor<'a> {
    pub fn new(sender: &'a dyn RequestSender, cancel: &'a CancelSignal) -> Self {
        Self { sender, cancel }
    }

    pub async fn execute(&self, query: &CompiledQuery) -> MonitorResult<MetricsResponse> {
        let request = ApiRequest {
            path: query.url.clone(),
            query: query.target.clone(),
        };
        self.fetch(&request, "AzureMonitor").await
    }

    pub async fn execute_resource_list(&self, subscription_id: &str) -> MonitorResult<ResourcesResponse> {
        let request = ApiRequest {
            path: format!("{}/resources", subscription_id),
            query: format!("api-version={}", API_VERSION),
        };
        self.fetch(&request, "AzureMonitor Resource").await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest, label: &str) -> MonitorResult<T> {
        let resp = self.cancel.guard(self.sender.send(request)).await?;

        if !resp.status.is_success() {
            error!(status = %resp.status, body = %resp.body, "{} request failed", label);
            return Err(MonitorError::Api {
                status: resp.status.as_u16(),
                body: resp.body,
            });
        }

        let decoded: T = serde_json::from_str(&resp.body).map_err(|e| {
            error!(error = %e, status = %resp.status, body = %resp.body, "Failed to unmarshal {} response", label);
            MonitorError::from(e)
        })?;

        debug!(path = %request.path, "{} response decoded", label);
        Ok(decoded)
    }
}
