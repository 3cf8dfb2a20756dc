use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::*;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use uuid::Uuid;

use crate::server::route::server_router;
use crate::server::types::{
    ApiResponse, AppState, CreateChaosRequest, CreateChaosResponse, RunStatusResponse, ScenarioDefinitionResponse,
};
use crate::tests::common::in_memory_database::InMemoryDatabase;
use crate::tests::common::{store_scenario, TWO_STAGE_SCENARIO};
use crate::tests::config::TestConfigBuilder;
use crate::types::jobs::types::JobStatus;
use crate::worker::coordinator::RunCoordinator;
use crate::worker::status::status_channel;

#[fixture]
async fn router() -> Router {
    let database = Arc::new(InMemoryDatabase::new());
    store_scenario(database.as_ref(), "checkout", TWO_STAGE_SCENARIO).await;
    store_scenario(database.as_ref(), "broken", "- - name: drain\n    type: node-drain\n").await;
    let config = TestConfigBuilder::new().configure_database(database.clone()).build().config;
    let (sender, propagator) = status_channel(database, 16, 5);
    tokio::spawn(propagator.run());
    let coordinator = Arc::new(RunCoordinator::new(config, sender, CancellationToken::new()));
    server_router(AppState { coordinator })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, response.into_body().collect().await.unwrap().to_bytes())
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> ApiResponse<T> {
    serde_json::from_slice(body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn create(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chaos/create")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[rstest]
#[tokio::test]
async fn health_is_up(#[future] router: Router) {
    let router = router.await;
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"UP");
}

#[rstest]
#[tokio::test]
async fn created_run_can_be_read_back(#[future] router: Router) {
    let router = router.await;
    let request = CreateChaosRequest {
        scenario: "checkout".to_string(),
        overridden_config: HashMap::from([("stress-checkout-TOTAL_CHAOS_DURATION".to_string(), "9".to_string())]),
    };

    let (status, body) = send(&router, create(serde_json::to_string(&request).unwrap())).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: ApiResponse<CreateChaosResponse> = parse(&body);
    assert!(created.success);
    let run_id = created.data.unwrap().run_id;

    let (status, body) = send(&router, get(&format!("/chaos/runs/{}", run_id))).await;
    assert_eq!(status, StatusCode::OK);
    let run = parse::<RunStatusResponse>(&body).data.unwrap();
    assert_eq!(run.run_id, run_id);
    let stress = run.stages.jobs().find(|job| job.name == "stress-checkout").unwrap();
    assert_eq!(stress.config.get("TOTAL_CHAOS_DURATION").map(String::as_str), Some("9"));
    assert_eq!(stress.status, JobStatus::Pending);
}

#[rstest]
#[case(json!({"scenario": "missing"}).to_string(), StatusCode::NOT_FOUND)]
#[case(json!({"scenario": "broken"}).to_string(), StatusCode::UNPROCESSABLE_ENTITY)]
#[case("{\"scenario\": ".to_string(), StatusCode::BAD_REQUEST)]
#[case(json!({"overriddenConfig": {}}).to_string(), StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn rejected_create_requests(#[future] router: Router, #[case] body: String, #[case] expected: StatusCode) {
    let router = router.await;
    let (status, body) = send(&router, create(body)).await;
    assert_eq!(status, expected);
    let response: ApiResponse<()> = parse(&body);
    assert!(!response.success);
    assert!(response.message.is_some());
}

#[rstest]
#[tokio::test]
async fn scenario_definition_is_served(#[future] router: Router) {
    let router = router.await;
    let (status, body) = send(&router, get("/chaos/scenarios/checkout")).await;
    assert_eq!(status, StatusCode::OK);
    let scenario = parse::<ScenarioDefinitionResponse>(&body).data.unwrap();
    assert_eq!(scenario.definition, TWO_STAGE_SCENARIO);

    let (status, _) = send(&router, get("/chaos/scenarios/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/chaos/runs/not-a-uuid".to_string(), StatusCode::BAD_REQUEST)]
#[case(format!("/chaos/runs/{}", Uuid::new_v4()), StatusCode::NOT_FOUND)]
#[case("/chaos/unknown".to_string(), StatusCode::NOT_FOUND)]
#[tokio::test]
async fn run_lookup_errors(#[future] router: Router, #[case] uri: String, #[case] expected: StatusCode) {
    let router = router.await;
    let (status, _) = send(&router, get(&uri)).await;
    assert_eq!(status, expected);
}
