//! Query routes (e.g., /api/v1/query)

use axum::{routing::post, Router};

use crate::api::controller::query::QueryController;
use crate::app_state::AppState;

/// Build the router for monitor query endpoints under /api/v1/query
pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(QueryController::run_queries))
}
