use serde::Deserialize;
use validator::Validate;

use crate::domain::monitor::model::query_model::QueryModel;

fn default_from() -> String {
    "now-6h".to_string()
}

fn default_to() -> String {
    "now".to_string()
}

/// Body of `POST /api/v1/query`.
#[derive(Debug, Deserialize, Validate)]
pub struct QueryRequest {
    #[serde(default = "default_from")]
    #[validate(length(min = 1, message = "from must not be empty"))]
    pub from: String,
    #[serde(default = "default_to")]
    #[validate(length(min = 1, message = "to must not be empty"))]
    pub to: String,
    #[serde(default)]
    pub queries: Vec<QueryModel>,
}
