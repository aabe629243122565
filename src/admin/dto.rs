use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::services::DeleteFailure;
use crate::error::RepoError;

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub verified: bool,
}

/// `{error: "..."}` with a status that tells the failure kinds apart.
impl IntoResponse for DeleteFailure {
    fn into_response(self) -> Response {
        let status = match &self.cause {
            RepoError::NotFound => StatusCode::NOT_FOUND,
            RepoError::Conflict(_) => StatusCode::CONFLICT,
            RepoError::Unavailable(msg) => {
                error!(error = %msg, entity = ?self.entity, "delete hit an unavailable store");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        (status, Json(json!({ "error": self.entity.failed_message() }))).into_response()
    }
}
