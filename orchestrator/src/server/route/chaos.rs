use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::super::error::ChaosRouteError;
use super::super::types::{
    ApiResponse, AppState, ChaosRouteResult, CreateChaosRequest, CreateChaosResponse, RunStatusResponse,
    ScenarioDefinitionResponse,
};

/// Accepts a run of a stored scenario.
///
/// Responds `201` with the run id once the initial status document is stored. The run
/// itself continues in the background.
#[instrument(skip(state, body))]
async fn handle_create_chaos_request(
    State(state): State<AppState>,
    body: Result<Json<CreateChaosRequest>, JsonRejection>,
) -> ChaosRouteResult {
    let Json(request) = body.map_err(|e| ChaosRouteError::InvalidRequest(e.body_text()))?;

    match state.coordinator.submit_run(&request.scenario, &request.overridden_config).await {
        Ok(run_id) => {
            info!(run_id = %run_id, scenario = %request.scenario, "Chaos run created");
            let response = ApiResponse::success_with_data(CreateChaosResponse { run_id }, Some("task created".to_string()));
            Ok((StatusCode::CREATED, Json(response)).into_response())
        }
        Err(e) => {
            error!(scenario = %request.scenario, error = %e, "Failed to create chaos run");
            Err(e.into())
        }
    }
}

#[instrument(skip(state), fields(scenario = %name))]
async fn handle_get_scenario_request(Path(name): Path<String>, State(state): State<AppState>) -> ChaosRouteResult {
    let definition = state.coordinator.get_scenario_definition(&name).await?;
    Ok(Json(ApiResponse::success_with_data(ScenarioDefinitionResponse { name, definition }, None)).into_response())
}

#[instrument(skip(state), fields(run_id = %id))]
async fn handle_get_run_request(Path(id): Path<String>, State(state): State<AppState>) -> ChaosRouteResult {
    let run_id = Uuid::parse_str(&id).map_err(|_| ChaosRouteError::InvalidId(id.clone()))?;
    let item = state
        .coordinator
        .get_run_status(run_id)
        .await?
        .ok_or_else(|| ChaosRouteError::NotFound(format!("run {}", run_id)))?;
    let stages = item.tree().map_err(|e| ChaosRouteError::DatabaseError(e.to_string()))?;
    let response = RunStatusResponse { run_id: item.id, scenario_id: item.scenario_id, version: item.version, stages };
    Ok(Json(ApiResponse::success_with_data(response, None)).into_response())
}

pub fn chaos_router(state: AppState) -> Router {
    Router::new()
        .route("/create", post(handle_create_chaos_request))
        .route("/scenarios/:name", get(handle_get_scenario_request))
        .route("/runs/:id", get(handle_get_run_request))
        .with_state(state)
}
