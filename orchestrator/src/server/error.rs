use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ApiResponse;
use crate::error::scenario::ScenarioError;

pub type ApiServiceError = ChaosRouteError;

pub type ApiServiceResult<T> = Result<T, ChaosRouteError>;

/// Errors of the chaos routes.
///
/// # Status Code Mapping
/// * `InvalidRequest` -> 400 Bad Request
/// * `InvalidId` -> 400 Bad Request
/// * `NotFound` -> 404 Not Found
/// * `InvalidScenario` -> 422 Unprocessable Entity
/// * `DatabaseError` -> 500 Internal Server Error
#[derive(Debug, thiserror::Error)]
pub enum ChaosRouteError {
    /// The request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provided run id is not a valid UUID
    #[error("Invalid run ID: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The scenario failed its pre-run checks
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ScenarioError> for ChaosRouteError {
    fn from(value: ScenarioError) -> Self {
        match value {
            ScenarioError::NotFound(name) => ChaosRouteError::NotFound(format!("scenario {}", name)),
            ScenarioError::MalformedDefinition(_)
            | ScenarioError::DuplicateStepName(_)
            | ScenarioError::UnsupportedType(_) => ChaosRouteError::InvalidScenario(value.to_string()),
            ScenarioError::InvalidTemplate(_) | ScenarioError::DatabaseError(_) => {
                ChaosRouteError::DatabaseError(value.to_string())
            }
        }
    }
}

impl IntoResponse for ChaosRouteError {
    fn into_response(self) -> Response {
        let status = match self {
            ChaosRouteError::InvalidRequest(_) | ChaosRouteError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ChaosRouteError::NotFound(_) => StatusCode::NOT_FOUND,
            ChaosRouteError::InvalidScenario(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChaosRouteError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}
