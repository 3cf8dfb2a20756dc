use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ChaosRouteError;
use crate::types::scenario::Scenario;
use crate::worker::coordinator::RunCoordinator;

/// Shared state of the chaos routes.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RunCoordinator>,
}

/// Standardized API response structure.
///
/// # Examples
/// ```
/// use chaos_orchestrator::server::types::ApiResponse;
/// let response: ApiResponse<()> = ApiResponse::success(None);
/// assert!(response.success);
///
/// let response = ApiResponse::error("Scenario not found".to_string());
/// assert!(!response.success);
/// assert_eq!(response.message, Some("Scenario not found".to_string()));
/// ```
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    /// Indicates if the operation was successful
    pub success: bool,
    /// Optional data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional message, typically used for error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self { success: false, data: None, message: Some(message) }
    }
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with data and an optional message.
    pub fn success_with_data(data: T, message: Option<String>) -> Self {
        Self { success: true, data: Some(data), message }
    }

    pub fn success(message: Option<String>) -> Self {
        Self { success: true, data: None, message }
    }
}

pub type ChaosRouteResult = Result<Response<axum::body::Body>, ChaosRouteError>;

/// Body of `POST /chaos/create`.
///
/// `overridden_config` keys are `<step name>-<config key>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChaosRequest {
    pub scenario: String,
    #[serde(default)]
    pub overridden_config: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChaosResponse {
    pub run_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinitionResponse {
    pub name: String,
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatusResponse {
    pub run_id: Uuid,
    pub scenario_id: Uuid,
    pub version: i32,
    pub stages: Scenario,
}
