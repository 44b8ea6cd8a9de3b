//! Query controller: runs dashboard monitor queries

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::query_request_dto::QueryRequest;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::monitor::error::MonitorError;
use crate::domain::monitor::model::QueryResult;
use crate::errors::AppError;

pub struct QueryController;

impl QueryController {
    pub async fn run_queries(
        State(state): State<AppState>,
        Json(req): Json<QueryRequest>,
    ) -> Result<Json<ApiResponse<BTreeMap<String, QueryResult>>>, AppError> {
        req.validate().map_err(MonitorError::from)?;
        to_json(
            state
                .query_service
                .run_queries(&req.from, &req.to, req.queries)
                .await,
        )
    }
}
