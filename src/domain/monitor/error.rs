use thiserror::Error;

pub type MonitorResult<T> = std::result::Result<T, MonitorError>;

/// Failures raised while compiling, executing or normalizing monitor queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    #[error("invalid query: {0}")]
    Validation(String),

    #[error("invalid time grain: {0}")]
    Config(String),

    #[error("request to monitor API failed: {0}")]
    Transport(String),

    /// Non-2xx status. `body` is the raw upstream payload.
    #[error("{body}")]
    Api { status: u16, body: String },

    #[error("failed to decode monitor API response: {0}")]
    Parse(String),

    #[error("query run cancelled")]
    Cancelled,
}

impl MonitorError {
    /// Errors that belong to one compiled query and must not abort sibling queries.
    pub fn is_query_scoped(&self) -> bool {
        matches!(
            self,
            MonitorError::Transport(_) | MonitorError::Api { .. } | MonitorError::Parse(_)
        )
    }
}

impl From<validator::ValidationErrors> for MonitorError {
    fn from(err: validator::ValidationErrors) -> Self {
        MonitorError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Parse(err.to_string())
    }
}
