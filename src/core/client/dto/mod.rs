pub mod metrics_response_dto;
pub mod resources_response_dto;

pub use metrics_response_dto::{DataPoint, MetricEntry, MetricsResponse, Timeseries};
pub use resources_response_dto::{ResourceEntry, ResourcesResponse};
