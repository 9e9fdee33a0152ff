//! Contract checks for the HTTP gateway against a local stub of the shelter backend.
//!
//! The stub mirrors the backend's conventions: JSON bodies, `detail` on failures, and the
//! blockchain-disabled sentinel in anchoring fields.

mod stub {
    use axum::extract::Path;
    use axum::http::{header, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use shelter_console::config::GatewayConfig;
    use shelter_console::gateway::{HttpShelterGateway, BLOCKCHAIN_DISABLED_SENTINEL};

    pub(super) fn stats_body() -> Value {
        json!({
            "blockchain_stats": { "count": 3, "latest_block": 1207 },
            "ml_model_loaded": true,
            "blockchain_enabled": false,
            "system_status": "operational",
            "uptime_seconds": 5120
        })
    }

    async fn allocate(Json(request): Json<Value>) -> Json<Value> {
        Json(json!({
            "applicant_id": request["applicant_id"],
            "shelter_unit_id": request["shelter_unit_id"],
            "vulnerability_score": 64,
            "priority": "HIGH",
            "blockchain_transaction": {
                "success": true,
                "transaction_hash": BLOCKCHAIN_DISABLED_SENTINEL,
                "verification_url": BLOCKCHAIN_DISABLED_SENTINEL,
                "blockchain_disabled": true
            }
        }))
    }

    async fn predict(Json(profile): Json<Value>) -> Json<Value> {
        Json(json!({
            "vulnerability_score": 87,
            "priority": "CRITICAL",
            "prediction_method": "ml_model",
            "applicant_data": profile
        }))
    }

    async fn stats() -> Json<Value> {
        Json(stats_body())
    }

    async fn model_status() -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": "Model warming up" })),
        )
            .into_response()
    }

    async fn allocation(Path(applicant_id): Path<String>) -> Response {
        match applicant_id.as_str() {
            "APP-1001" => Json(json!({
                "applicant_id": "APP-1001",
                "shelter_unit_id": "UNIT-7",
                "vulnerability_score": 72,
                "priority": "HIGH",
                "success": true,
                "timestamp": "2025-05-14T09:12:00"
            }))
            .into_response(),
            "A 7/2" => Json(json!({ "applicant_id": "A 7/2" })).into_response(),
            "garbled" => Json(json!({ "vulnerability_score": "very high" })).into_response(),
            "html-500" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/html")],
                "<h1>upstream error</h1>",
            )
                .into_response(),
            other => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": format!("Allocation not found for {other}") })),
            )
                .into_response(),
        }
    }

    pub(super) fn backend() -> Router {
        Router::new()
            .route("/shelter/allocate", post(allocate))
            .route("/shelter/test-prediction", post(predict))
            .route("/shelter/stats", get(stats))
            .route("/shelter/model-status", get(model_status))
            .route("/shelter/allocation/:applicant_id", get(allocation))
    }

    pub(super) async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, router).await.expect("serve stub") });
        format!("http://{addr}")
    }

    pub(super) fn gateway(base_url: &str) -> HttpShelterGateway {
        let config = GatewayConfig::new(base_url).expect("valid base url");
        HttpShelterGateway::new(&config).expect("client builds")
    }
}

use shelter_console::console::{priority_color, DisplayColor};
use shelter_console::gateway::{
    AllocationRequest, ApplicantProfile, GatewayError, Priority, ShelterGateway,
    SpecialCircumstance,
};

#[tokio::test]
async fn assessment_scenario_round_trips_profile() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let profile = ApplicantProfile {
        poverty_level: 90,
        unemployment_duration: 12,
        family_size: 5,
        has_disability: true,
        is_elderly: false,
        is_single_parent: false,
        minority_status: false,
        special_circumstances: vec![SpecialCircumstance::Veteran],
    };

    let result = gateway
        .test_prediction(&profile)
        .await
        .expect("prediction succeeds");

    assert_eq!(result.vulnerability_score, 87);
    assert_eq!(result.priority, Priority::Critical);
    assert_eq!(result.prediction_method, "ml_model");
    assert_eq!(result.applicant_data, profile);
    assert_eq!(
        priority_color(Some(result.priority.label())),
        DisplayColor::Red
    );
}

#[tokio::test]
async fn allocation_surfaces_disabled_blockchain() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let request = AllocationRequest {
        applicant_id: "APP-2002".to_string(),
        shelter_unit_id: "UNIT-3".to_string(),
        applicant_data: ApplicantProfile::default(),
    };
    let result = gateway
        .allocate_shelter(&request)
        .await
        .expect("allocation succeeds");

    assert_eq!(result.applicant_id, "APP-2002");
    assert_eq!(result.shelter_unit_id, "UNIT-3");
    assert_eq!(result.priority, Priority::High);
    let chain = result
        .blockchain_transaction
        .expect("blockchain details present");
    assert!(chain.disabled());
    assert_eq!(chain.anchored_hash(), None);
    assert_eq!(chain.anchored_url(), None);
}

#[tokio::test]
async fn stats_body_passes_through_unchanged() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let stats = gateway.get_stats().await.expect("stats load");

    assert_eq!(stats.blockchain_allocations(), 3);
    assert_eq!(
        serde_json::to_value(&stats).expect("stats serialize"),
        stub::stats_body()
    );
}

#[tokio::test]
async fn failure_detail_becomes_the_error_message() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let err = gateway
        .get_model_status()
        .await
        .expect_err("model status unavailable");

    assert_eq!(
        err,
        GatewayError::Status {
            status: 503,
            message: "Model warming up".to_string(),
        }
    );
}

#[tokio::test]
async fn lookup_success_and_not_found() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let record = gateway
        .get_allocation("APP-1001")
        .await
        .expect("lookup succeeds");
    assert_eq!(record.applicant_id.as_deref(), Some("APP-1001"));
    assert_eq!(record.priority, Some(Priority::High));
    assert_eq!(record.status_label(), "Verified");
    assert!(record.recorded_at().is_some());

    let err = gateway
        .get_allocation("APP-404")
        .await
        .expect_err("unknown applicant");
    assert_eq!(err.to_string(), "Allocation not found for APP-404");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn lookup_encodes_identifier_as_single_segment() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let record = gateway
        .get_allocation("A 7/2")
        .await
        .expect("encoded id routes to the record");
    assert_eq!(record.applicant_id.as_deref(), Some("A 7/2"));
}

#[tokio::test]
async fn non_json_failure_synthesizes_status_line() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    let err = gateway
        .get_allocation("html-500")
        .await
        .expect_err("backend error");
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn mismatched_success_body_is_a_schema_failure() {
    let base = stub::spawn(stub::backend()).await;
    let gateway = stub::gateway(&base);

    match gateway.get_allocation("garbled").await {
        Err(GatewayError::Schema { status, message }) => {
            assert_eq!(status, 200);
            assert!(message.starts_with("unexpected allocation response"));
        }
        other => panic!("expected schema failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_reports_transport_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let gateway = stub::gateway(&format!("http://{addr}"));
    let err = gateway.get_stats().await.expect_err("nothing listening");

    match &err {
        GatewayError::Transport { message } => {
            assert!(!message.is_empty());
            assert_eq!(err.to_string(), *message);
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn missing_route_without_detail_uses_status_line() {
    let base = stub::spawn(axum::Router::new()).await;
    let gateway = stub::gateway(&base);

    let err = gateway
        .test_prediction(&ApplicantProfile::default())
        .await
        .expect_err("route missing");
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
    assert_eq!(err.status(), Some(404));
}

mod passthrough {
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    pub(super) fn allocation_body() -> Value {
        json!({
            "applicant_id": "APP-3003",
            "shelter_unit_id": "UNIT-12",
            "vulnerability_score": 58,
            "priority": "MEDIUM",
            "queue_position": 4,
            "blockchain_transaction": {
                "transaction_hash": "0x9a1e",
                "block_number": 1207
            }
        })
    }

    pub(super) fn assessment_body() -> Value {
        json!({
            "vulnerability_score": 87,
            "priority": "CRITICAL",
            "prediction_method": "ml_model",
            "model_confidence": 0.93,
            "applicant_data": {
                "poverty_level": 90,
                "unemployment_duration": 12,
                "family_size": 5,
                "has_disability": true,
                "is_elderly": false,
                "is_single_parent": false,
                "minority_status": false,
                "special_circumstances": ["Veteran"]
            }
        })
    }

    pub(super) fn record_body() -> Value {
        json!({
            "applicant_id": "APP-3003",
            "priority": "MEDIUM",
            "timestamp": "2025-05-14T09:12:00",
            "ledger": "local"
        })
    }

    pub(super) fn backend() -> Router {
        Router::new()
            .route("/shelter/allocate", post(|| async { Json(allocation_body()) }))
            .route(
                "/shelter/test-prediction",
                post(|| async { Json(assessment_body()) }),
            )
            .route(
                "/shelter/allocation/:applicant_id",
                get(|| async { Json(record_body()) }),
            )
    }
}

#[tokio::test]
async fn allocation_body_encodes_back_unchanged() {
    let base = stub::spawn(passthrough::backend()).await;
    let gateway = stub::gateway(&base);

    let request = AllocationRequest {
        applicant_id: "APP-3003".to_string(),
        shelter_unit_id: "UNIT-12".to_string(),
        applicant_data: ApplicantProfile::default(),
    };
    let result = gateway
        .allocate_shelter(&request)
        .await
        .expect("allocation succeeds");

    let chain = result
        .blockchain_transaction
        .as_ref()
        .expect("blockchain details present");
    assert_eq!(chain.blockchain_disabled, None);
    assert_eq!(chain.anchored_hash(), Some("0x9a1e"));
    assert_eq!(
        serde_json::to_value(&result).expect("result serializes"),
        passthrough::allocation_body()
    );
}

#[tokio::test]
async fn assessment_body_encodes_back_unchanged() {
    let base = stub::spawn(passthrough::backend()).await;
    let gateway = stub::gateway(&base);

    let result = gateway
        .test_prediction(&ApplicantProfile::default())
        .await
        .expect("prediction succeeds");

    assert_eq!(result.extra.get("model_confidence"), Some(&serde_json::json!(0.93)));
    assert_eq!(
        serde_json::to_value(&result).expect("result serializes"),
        passthrough::assessment_body()
    );
}

#[tokio::test]
async fn lookup_body_encodes_back_unchanged() {
    let base = stub::spawn(passthrough::backend()).await;
    let gateway = stub::gateway(&base);

    let record = gateway
        .get_allocation("APP-3003")
        .await
        .expect("lookup succeeds");

    assert_eq!(record.success, None);
    assert_eq!(record.status_label(), "Pending");
    assert_eq!(
        serde_json::to_value(&record).expect("record serializes"),
        passthrough::record_body()
    );
}
