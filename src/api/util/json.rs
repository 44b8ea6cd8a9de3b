use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::AppError;

/// Wraps a service result in the API envelope. Errors keep their own status mapping.
pub fn to_json<T, E>(
    result: Result<T, E>
) -> Result<Json<ApiResponse<T>>, AppError>
where
    T: serde::Serialize,
    E: Into<AppError>,
{
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => Err(err.into()),
    }
}
