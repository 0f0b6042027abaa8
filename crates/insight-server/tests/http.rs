use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use insight_core::{
    AnalysisEngine, DigestEngine, EngineError, MemoryCurator, RunLogCurator,
};
use insight_server::{router, AppState, ServerConfig};
use insight_test_utils::{sample_brief, structured_brief, CountingCurator, FakeEngine, TestProject};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(
    project: &TestProject,
    api_key: &str,
    engine: Arc<dyn AnalysisEngine>,
    curator: Arc<dyn MemoryCurator>,
) -> Router {
    let config = ServerConfig::for_root(project.project_root()).with_api_key(api_key);
    router(AppState::new(config, project.orchestrator(engine, curator)))
}

fn analyze_request(body: &Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/analyze").header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let project = TestProject::new();
    let app = app(&project, "", FakeEngine::reporting("r"), Arc::new(CountingCurator));

    let (status, body) = send(app, Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn auth_status_reflects_configured_key() {
    let project = TestProject::new();

    let open = app(&project, "", FakeEngine::reporting("r"), Arc::new(CountingCurator));
    let (_, body) = send(open, Request::get("/auth-status").body(Body::empty()).unwrap()).await;
    assert_eq!(body, json!({"api_key_required": false}));

    let guarded = app(&project, "s3cret", FakeEngine::reporting("r"), Arc::new(CountingCurator));
    let (_, body) = send(guarded, Request::get("/auth-status").body(Body::empty()).unwrap()).await;
    assert_eq!(body, json!({"api_key_required": true}));
}

#[tokio::test]
async fn worked_example_round_trips_through_the_engine() {
    let project = TestProject::new();
    let engine = FakeEngine::reporting("# Quick Analysis");
    let app = app(&project, "", engine.clone(), Arc::new(CountingCurator));

    let (status, body) = send(app, analyze_request(&json!({"brief": sample_brief()}), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "mode": "quick",
            "business_goal": "grow",
            "report": "# Quick Analysis",
            "memory_updated": false,
            "output_path": null,
        })
    );

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let brief = &calls[0].brief;
    assert_eq!(
        brief.get("scope"),
        Some(&json!({
            "marketplaces": ["Unknown"],
            "category_or_product": "wireless earbuds",
            "region": "Unknown",
            "timeframe": "Unspecified",
            "scope_type": "Unknown",
        }))
    );
    assert_eq!(
        brief.get("data_sources"),
        Some(&json!({
            "catalog": {"path": "catalog.json"},
            "reviews": {"path": "reviews.json"},
        }))
    );
    assert_eq!(calls[0].root_dir, project.path("datasets/processed"));
}

#[tokio::test]
async fn empty_secret_ignores_the_header() {
    let project = TestProject::new();
    let body = json!({"brief": sample_brief()});

    for key in [None, Some("anything")] {
        let app = app(&project, "", FakeEngine::reporting("r"), Arc::new(CountingCurator));
        let (status, _) = send(app, analyze_request(&body, key)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn configured_secret_rejects_missing_or_wrong_key() {
    let project = TestProject::new();
    let body = json!({"brief": sample_brief()});

    for key in [None, Some("wrong"), Some("")] {
        let engine = FakeEngine::reporting("r");
        let app = app(&project, "s3cret", engine.clone(), Arc::new(CountingCurator));
        let (status, response) = send(app, analyze_request(&body, key)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response,
            json!({"detail": "Unauthorized: invalid or missing API key"})
        );
        assert_eq!(engine.call_count(), 0);
    }
}

#[tokio::test]
async fn configured_secret_accepts_padded_key() {
    let project = TestProject::new();
    let app = app(&project, "s3cret", FakeEngine::reporting("r"), Arc::new(CountingCurator));

    let (status, _) = send(
        app,
        analyze_request(&json!({"brief": sample_brief()}), Some("  s3cret ")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_goal_is_rejected() {
    let project = TestProject::new();
    let engine = FakeEngine::reporting("r");
    let app = app(&project, "", engine.clone(), Arc::new(CountingCurator));

    let (status, body) = send(
        app,
        analyze_request(&json!({"brief": {"mode": "quick", "scope": "earbuds"}}), None),
    )
    .await;

    // data_sources is always filled in by normalization
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "Missing required brief fields: business_goal"})
    );
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn every_missing_field_is_listed_in_order() {
    let project = TestProject::new();
    let engine = FakeEngine::reporting("r");
    let app = app(&project, "", engine.clone(), Arc::new(CountingCurator));

    let (status, body) = send(
        app,
        analyze_request(
            &json!({"brief": {"scope": "earbuds", "data_sources": ["catalog.json"]}}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "Missing required brief fields: mode, business_goal"})
    );
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn engine_client_errors_are_400() {
    let project = TestProject::new();
    let engine = FakeEngine::failing(EngineError::SourceNotFound("catalog.json not found".into()));
    let app = app(&project, "", engine, Arc::new(CountingCurator));

    let (status, body) = send(app, analyze_request(&json!({"brief": sample_brief()}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "catalog.json not found"}));
}

#[tokio::test]
async fn engine_failures_are_500() {
    let project = TestProject::new();
    let engine = FakeEngine::failing(EngineError::Failed("model crashed".into()));
    let app = app(&project, "", engine, Arc::new(CountingCurator));

    let (status, body) = send(app, analyze_request(&json!({"brief": sample_brief()}), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "Unexpected analysis error: model crashed"})
    );
}

#[tokio::test]
async fn update_memory_persists_curated_memory() {
    let project = TestProject::new();
    project.write_json("data/domain_memory.json", &json!({"updates": 2}));
    let app = app(&project, "", FakeEngine::reporting("r"), Arc::new(CountingCurator));

    let (status, body) = send(
        app,
        analyze_request(&json!({"brief": sample_brief(), "update_memory": true}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["memory_updated"], json!(true));
    assert_eq!(
        project.read_json("data/domain_memory.json"),
        json!({"updates": 3, "last_goal": "grow"})
    );
}

#[tokio::test]
async fn output_path_receives_the_report() {
    let project = TestProject::new();
    let app = app(&project, "", FakeEngine::reporting("# Report\n"), Arc::new(CountingCurator));

    let (status, body) = send(
        app,
        analyze_request(
            &json!({"brief": sample_brief(), "output_path": "reports/latest.md"}),
            None,
        ),
    )
    .await;

    let expected = project.path("reports/latest.md");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output_path"], json!(expected.display().to_string()));
    assert_eq!(std::fs::read_to_string(expected).unwrap(), "# Report\n");
}

#[tokio::test]
async fn reference_engine_reads_sources_under_the_project() {
    let project = TestProject::new();
    project.write_json("datasets/processed/catalog.json", &json!([{"sku": "A"}, {"sku": "B"}]));
    project.write_json("datasets/processed/reviews.json", &json!([{"rating": 5}]));
    let app = app(
        &project,
        "",
        Arc::new(DigestEngine::new()),
        Arc::new(RunLogCurator::default()),
    );

    let (status, body) = send(
        app,
        analyze_request(&json!({"brief": structured_brief(), "update_memory": true}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let report = body["report"].as_str().unwrap();
    assert!(report.contains("SKU-472"));
    assert!(report.contains("catalog: 2 record(s)"));

    let memory = project.read_json("data/domain_memory.json");
    assert_eq!(memory["runs"].as_array().map(Vec::len), Some(1));
    assert_eq!(memory["runs"][0]["category_or_product"], json!("SKU-472"));
}

#[tokio::test]
async fn reference_engine_rejects_unknown_mode() {
    let project = TestProject::new();
    let mut brief = sample_brief();
    brief["mode"] = json!("exhaustive");
    let app = app(
        &project,
        "",
        Arc::new(DigestEngine::new()),
        Arc::new(RunLogCurator::default()),
    );

    let (status, body) = send(app, analyze_request(&json!({"brief": brief}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("exhaustive"));
}
