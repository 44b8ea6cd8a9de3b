//! Query pipeline stages, leaves first.

pub mod time_grain;
pub mod url_builder;
pub mod request_executor;
pub mod resource_discovery;
pub mod query_compiler;
pub mod legend_formatter;
pub mod response_normalizer;
pub mod pipeline;
pub mod query_service;
