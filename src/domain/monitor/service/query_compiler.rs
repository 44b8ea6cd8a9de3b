//! QuerySpec → CompiledQuery.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::monitor::error::MonitorResult;
use crate::domain::monitor::model::{
    CompiledQuery, QuerySpec, QueryTarget, ResourceIdentity, TimeGrainSetting, TimeRange,
    UrlComponents, API_VERSION,
};
use crate::domain::monitor::service::request_executor::RequestExecutor;
use crate::domain::monitor::service::resource_discovery;
use crate::domain::monitor::service::time_grain::{self, DEFAULT_ALLOWED_INTERVALS_MS};
use crate::domain::monitor::service::url_builder::build_metrics_path;

const NO_DIMENSION: &str = "None";

/// Compiles one spec. Cross-resource specs discover their targets first and
/// yield one query per matching resource.
pub async fn compile(
    spec: &QuerySpec,
    time_range: &TimeRange,
    executor: &RequestExecutor<'_>,
) -> MonitorResult<Vec<CompiledQuery>> {
    match &spec.target {
        QueryTarget::SingleResource(identity) => {
            Ok(vec![build_single_query(spec, identity, time_range)?])
        }
        QueryTarget::CrossResource(filter) => {
            let resources = resource_discovery::discover(executor, filter).await?;
            resources
                .iter()
                .map(|resource| {
                    let identity = ResourceIdentity {
                        subscription: resource.subscription_id.clone(),
                        resource_group: resource.resource_group().to_string(),
                        metric_definition: resource.resource_type.clone(),
                        resource_name: resource.name.clone(),
                    };
                    build_single_query(spec, &identity, time_range)
                })
                .collect()
        }
    }
}

/// Builds the request for one concrete resource.
pub fn build_single_query(
    spec: &QuerySpec,
    identity: &ResourceIdentity,
    time_range: &TimeRange,
) -> MonitorResult<CompiledQuery> {
    let metric = &spec.metric;

    let url_components = UrlComponents {
        subscription: identity.subscription.clone(),
        resource_group: identity.resource_group.clone(),
        metric_definition: identity.metric_definition.clone(),
        resource_name: identity.resource_name.clone(),
    };
    let url = build_metrics_path(&url_components)?;

    let interval = match &metric.time_grain {
        TimeGrainSetting::Auto => time_grain::resolve(
            spec.interval_ms,
            &metric.allowed_time_grains_ms,
            &DEFAULT_ALLOWED_INTERVALS_MS,
        )?,
        TimeGrainSetting::Explicit(grain) => {
            time_grain::validate_explicit(grain)?;
            grain.clone()
        }
    };

    let mut params = BTreeMap::new();
    params.insert("api-version".to_string(), API_VERSION.to_string());
    params.insert("timespan".to_string(), time_range.timespan());
    params.insert("interval".to_string(), interval);
    params.insert("aggregation".to_string(), metric.aggregation.clone());
    params.insert("metricnames".to_string(), metric.metric_name.clone());

    if !metric.metric_namespace.is_empty() {
        params.insert("metricnamespace".to_string(), metric.metric_namespace.clone());
    }

    if let Some(filter) = dimension_filter(&metric.dimension, &metric.dimension_filter) {
        params.insert("$filter".to_string(), filter);
    }

    let target = encode_params(&params);
    debug!(ref_id = %spec.ref_id, url = %url, params = %target, "compiled AzureMonitor query");

    Ok(CompiledQuery {
        ref_id: spec.ref_id.clone(),
        url,
        url_components,
        params,
        target,
        alias: metric.alias.clone(),
    })
}

/// `"{dimension} eq '{value}'"`, unless either side is blank or the dimension is `None`.
fn dimension_filter(dimension: &str, value: &str) -> Option<String> {
    let dimension = dimension.trim();
    let value = value.trim();
    if dimension.is_empty() || value.is_empty() || dimension == NO_DIMENSION {
        return None;
    }
    Some(format!("{} eq '{}'", dimension, value))
}

/// Percent-encoded `key=value` pairs in key order.
fn encode_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
