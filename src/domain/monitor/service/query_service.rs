use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::client::cancel::CancelSignal;
use crate::core::client::monitor_client::RequestSender;
use crate::domain::monitor::error::MonitorResult;
use crate::domain::monitor::model::query_model::QueryModel;
use crate::domain::monitor::model::{QueryResult, TimeRange};
use crate::domain::monitor::service::pipeline;

/// Entry point for HTTP callers: parses the range, validates the models and
/// runs them against the shared sender. Runs abort when `shutdown` fires.
pub struct QueryService {
    sender: Arc<dyn RequestSender>,
    default_subscription: String,
    shutdown: CancelSignal,
}

impl QueryService {
    pub fn new(sender: Arc<dyn RequestSender>, default_subscription: String, shutdown: CancelSignal) -> Self {
        Self {
            sender,
            default_subscription,
            shutdown,
        }
    }

    pub async fn run_queries(
        &self,
        from: &str,
        to: &str,
        queries: Vec<QueryModel>,
    ) -> MonitorResult<BTreeMap<String, QueryResult>> {
        let time_range = TimeRange::parse(from, to, Utc::now())?;
        let specs = pipeline::specs_from_models(queries, &self.default_subscription)?;
        info!(queries = specs.len(), timespan = %time_range.timespan(), "running monitor queries");

        pipeline::run(self.sender.as_ref(), &specs, &time_range, &self.shutdown).await
    }
}
