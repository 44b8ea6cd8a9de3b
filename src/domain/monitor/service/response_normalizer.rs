use crate::core::client::dto::{DataPoint, MetricsResponse};
use crate::domain::monitor::model::{Aggregation, CompiledQuery, NamedSeries, TimePoint};
use crate::domain::monitor::service::legend_formatter::{format_legend_key, LegendContext};

/// Flattens a metrics payload into one named series per timeseries.
///
/// Only the first metric entry is read; the API returns one metric per request.
pub fn normalize(response: &MetricsResponse, query: &CompiledQuery) -> Vec<NamedSeries> {
    let Some(entry) = response.value.first() else {
        return Vec::new();
    };

    let aggregation = Aggregation::from_param(query.param("aggregation"));
    let namespace = entry.namespace.as_deref().unwrap_or(response.namespace.as_str());

    entry
        .timeseries
        .iter()
        .map(|series| {
            let (dimension_name, dimension_value) = series
                .metadatavalues
                .first()
                .map(|m| (m.name.localized_value.as_str(), m.value.as_str()))
                .unwrap_or(("", ""));

            let name = format_legend_key(
                &query.alias,
                &LegendContext {
                    resource_name: &query.url_components.resource_name,
                    metric_name: &entry.name.localized_value,
                    dimension_name,
                    dimension_value,
                    namespace,
                    series_id: &entry.id,
                },
            );

            let points = series
                .data
                .iter()
                .map(|point| TimePoint {
                    timestamp_ms: point.time_stamp.timestamp() * 1000,
                    value: select_value(point, aggregation),
                })
                .collect();

            NamedSeries {
                name,
                points,
                unit: entry.unit.clone(),
                raw_query: query.target.clone(),
            }
        })
        .collect()
}

fn select_value(point: &DataPoint, aggregation: Aggregation) -> Option<f64> {
    match aggregation {
        Aggregation::Average => point.average,
        Aggregation::Total => point.total,
        Aggregation::Maximum => point.maximum,
        Aggregation::Minimum => point.minimum,
        Aggregation::Count => point.count,
    }
}
