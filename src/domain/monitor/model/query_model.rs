//! Inbound dashboard query model and its conversion into a [`QuerySpec`].

use std::collections::HashMap;

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};
use tracing::warn;
use validator::Validate;

use super::{
    DiscoveryFilter, MetricSelection, QuerySpec, QueryTarget, ResourceIdentity, TimeGrainSetting,
};
use crate::domain::monitor::error::{MonitorError, MonitorResult};

pub const SINGLE_RESOURCE_MODE: &str = "singleResource";
pub const CROSS_RESOURCE_MODE: &str = "crossResource";

/// One query as posted by the dashboard.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    #[validate(length(min = 1, message = "refId is required"))]
    pub ref_id: String,
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub interval_ms: i64,
    #[serde(default)]
    pub subscription: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub subscriptions: Vec<String>,
    pub azure_monitor: Option<AzureMonitorTarget>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureMonitorTarget {
    #[serde(default)]
    pub query_mode: String,
    #[serde(default)]
    pub data: HashMap<String, AzureMonitorData>,
    /// Payload used when `queryMode` is empty.
    #[serde(flatten)]
    pub inline: AzureMonitorData,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureMonitorData {
    pub resource_group: String,
    pub metric_definition: String,
    pub resource_name: String,
    pub metric_name: String,
    pub metric_namespace: String,
    pub aggregation: String,
    pub dimension: String,
    pub dimension_filter: String,
    pub time_grain: String,
    #[serde_as(as = "DefaultOnNull<Vec<PickFirst<(_, DisplayFromStr)>>>")]
    pub allowed_time_grains_ms: Vec<i64>,
    pub alias: String,
    #[serde_as(as = "DefaultOnNull")]
    pub resource_groups: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub locations: Vec<String>,
}

impl QueryModel {
    /// Builds a typed spec. `Ok(None)` means the query mode is not one we know;
    /// such queries compile to nothing.
    pub fn into_spec(self, default_subscription: &str) -> MonitorResult<Option<QuerySpec>> {
        self.validate()?;

        let mut target = self.azure_monitor.ok_or_else(|| {
            MonitorError::Validation(format!(
                "invalid query format: query {} has no azureMonitor section",
                self.ref_id
            ))
        })?;

        let (mode, data) = match target.query_mode.as_str() {
            "" => (SINGLE_RESOURCE_MODE, target.inline),
            mode @ (SINGLE_RESOURCE_MODE | CROSS_RESOURCE_MODE) => {
                let data = target.data.remove(mode).ok_or_else(|| {
                    MonitorError::Validation(format!(
                        "invalid query format: query {} has no data for mode {}",
                        self.ref_id, mode
                    ))
                })?;
                (mode, data)
            }
            other => {
                warn!(ref_id = %self.ref_id, query_mode = %other, "unsupported query mode, skipping query");
                return Ok(None);
            }
        };

        let query_target = if mode == SINGLE_RESOURCE_MODE {
            let subscription = if self.subscription.trim().is_empty() {
                default_subscription.to_string()
            } else {
                self.subscription
            };
            let identity = ResourceIdentity {
                subscription,
                resource_group: data.resource_group.clone(),
                metric_definition: data.metric_definition.clone(),
                resource_name: data.resource_name.clone(),
            };
            identity.validate()?;
            QueryTarget::SingleResource(identity)
        } else {
            let filter = DiscoveryFilter {
                subscriptions: self.subscriptions,
                resource_groups: data.resource_groups.clone(),
                locations: data.locations.clone(),
                resource_type: data.metric_definition.clone(),
            };
            filter.validate()?;
            QueryTarget::CrossResource(filter)
        };

        let metric = MetricSelection {
            metric_name: data.metric_name,
            metric_namespace: data.metric_namespace,
            aggregation: data.aggregation,
            dimension: data.dimension,
            dimension_filter: data.dimension_filter,
            time_grain: TimeGrainSetting::parse(&data.time_grain),
            allowed_time_grains_ms: data.allowed_time_grains_ms,
            alias: data.alias,
        };
        metric.validate()?;

        Ok(Some(QuerySpec {
            ref_id: self.ref_id,
            interval_ms: self.interval_ms,
            target: query_target,
            metric,
        }))
    }
}
