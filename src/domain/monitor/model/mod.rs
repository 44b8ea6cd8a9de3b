//! Monitor query types: inbound specs, compiled requests and normalized output.

pub mod query_model;
pub mod time_range;

use std::collections::BTreeMap;

use serde::Serialize;
use validator::Validate;

pub use time_range::TimeRange;

/// Pinned Azure Monitor REST API version for both endpoints.
pub const API_VERSION: &str = "2018-01-01";

/// One logical dashboard query after boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub ref_id: String,
    pub interval_ms: i64,
    pub target: QueryTarget,
    pub metric: MetricSelection,
}

/// Where the metric is read from. Compilation dispatches on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTarget {
    SingleResource(ResourceIdentity),
    CrossResource(DiscoveryFilter),
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ResourceIdentity {
    #[validate(length(min = 1, message = "subscription is required"))]
    pub subscription: String,
    #[validate(length(min = 1, message = "resourceGroup is required"))]
    pub resource_group: String,
    /// Resource type, e.g. `Microsoft.Compute/virtualMachines`.
    #[validate(length(min = 1, message = "metricDefinition is required"))]
    pub metric_definition: String,
    #[validate(length(min = 1, message = "resourceName is required"))]
    pub resource_name: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DiscoveryFilter {
    #[validate(length(min = 1, message = "at least one subscription is required"))]
    pub subscriptions: Vec<String>,
    pub resource_groups: Vec<String>,
    pub locations: Vec<String>,
    #[validate(length(min = 1, message = "metricDefinition is required"))]
    pub resource_type: String,
}

/// Metric parameters shared by every compiled request of one spec.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MetricSelection {
    #[validate(length(min = 1, message = "metricName is required"))]
    pub metric_name: String,
    pub metric_namespace: String,
    pub aggregation: String,
    pub dimension: String,
    pub dimension_filter: String,
    pub time_grain: TimeGrainSetting,
    pub allowed_time_grains_ms: Vec<i64>,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeGrainSetting {
    Auto,
    Explicit(String),
}

impl TimeGrainSetting {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == "auto" {
            TimeGrainSetting::Auto
        } else {
            TimeGrainSetting::Explicit(trimmed.to_string())
        }
    }
}

/// Aggregation field read from each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    Average,
    Total,
    Maximum,
    Minimum,
    #[default]
    Count,
}

impl Aggregation {
    /// Unknown or empty names fall back to `Count`.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "Average" => Aggregation::Average,
            "Total" => Aggregation::Total,
            "Maximum" => Aggregation::Maximum,
            "Minimum" => Aggregation::Minimum,
            _ => Aggregation::Count,
        }
    }
}

/// Path segments a compiled query was built from; used again for legend names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlComponents {
    pub subscription: String,
    pub resource_group: String,
    pub metric_definition: String,
    pub resource_name: String,
}

/// Fully parameterized metrics request. Never mutated after compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub ref_id: String,
    /// Path relative to the API base, ending in `/providers/microsoft.insights/metrics`.
    pub url: String,
    pub url_components: UrlComponents,
    /// Sorted by key, matching the encoded `target`.
    pub params: BTreeMap<String, String>,
    pub target: String,
    pub alias: String,
}

impl CompiledQuery {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A resource returned by the list-resources endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub resource_type: String,
    pub location: String,
    pub subscription_id: String,
}

impl Resource {
    /// Identity used for de-duplication across subscriptions.
    pub fn key(&self) -> &str {
        &self.id
    }

    /// Resource group segment of the id, empty when the id is too short.
    pub fn resource_group(&self) -> &str {
        self.id.split('/').nth(4).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub timestamp_ms: i64,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<TimePoint>,
    pub unit: String,
    pub raw_query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_query: Option<String>,
}

/// Everything returned for one correlation id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub ref_id: String,
    pub series: Vec<NamedSeries>,
    pub meta: QueryMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Substring of `id` between `/resourceGroups/` and the following `/providers`.
/// Missing anchors yield an empty string.
pub fn resource_group_from_id(id: &str) -> &str {
    const START: &str = "/resourceGroups/";
    const END: &str = "/providers";

    let Some(start) = id.find(START).map(|i| i + START.len()) else {
        return "";
    };
    match id[start..].find(END) {
        Some(len) => &id[start..start + len],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_group_between_anchors() {
        assert_eq!(
            resource_group_from_id("/subscriptions/s/resourceGroups/rg1/providers/x"),
            "rg1"
        );
    }

    #[test]
    fn resource_group_missing_anchor_is_empty() {
        assert_eq!(resource_group_from_id("/subscriptions/s/providers/x"), "");
        assert_eq!(resource_group_from_id("/subscriptions/s/resourceGroups/rg1"), "");
        assert_eq!(resource_group_from_id(""), "");
    }

    #[test]
    fn resource_parses_group_from_id_segments() {
        let resource = Resource {
            id: "/subscriptions/sub1/resourcegroups/web-rg/providers/Microsoft.Web/sites/app".into(),
            name: "app".into(),
            resource_type: "Microsoft.Web/sites".into(),
            location: "westeurope".into(),
            subscription_id: "sub1".into(),
        };
        assert_eq!(resource.resource_group(), "web-rg");

        let short = Resource { id: "/subscriptions/sub1".into(), ..resource };
        assert_eq!(short.resource_group(), "");
    }

    #[test]
    fn aggregation_defaults_to_count() {
        assert_eq!(Aggregation::from_param(Some("Maximum")), Aggregation::Maximum);
        assert_eq!(Aggregation::from_param(Some("maximum")), Aggregation::Count);
        assert_eq!(Aggregation::from_param(None), Aggregation::Count);
    }

    #[test]
    fn time_grain_setting_detects_auto() {
        assert_eq!(TimeGrainSetting::parse(" auto "), TimeGrainSetting::Auto);
        assert_eq!(
            TimeGrainSetting::parse("PT5M"),
            TimeGrainSetting::Explicit("PT5M".into())
        );
    }
}
