//! End-to-end router tests against in-memory ports
//!
//! Every request goes through the real router, middleware included, with
//! the domain services wired onto mock stores.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use core_kernel::{
    AdapterHealth, AssetId, Currency, HealthCheckResult, HealthCheckable, LossEventId, Money,
    PropertyId, UserId,
};
use domain_jumpstart::ports::mock::MockJumpstartStore;
use domain_jumpstart::JumpstartService;
use domain_loss::ports::mock::MockLossEventStore;
use domain_loss::LossEventService;
use domain_proof::ports::mock::{MockAssetCatalog, MockLossEventGateway, MockProofOfLossStore};
use domain_proof::{
    CatalogAsset, LossEventContext, ProofOfLossService, DEFAULT_SWORN_STATEMENT,
};
use rust_decimal_macros::dec;

use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};

/// Readiness probe stub that always reports healthy
struct StaticHealth;

#[async_trait::async_trait]
impl HealthCheckable for StaticHealth {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "static".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

struct Harness {
    loss_store: Arc<MockLossEventStore>,
    gateway: Arc<MockLossEventGateway>,
    catalog: Arc<MockAssetCatalog>,
    form_store: Arc<MockProofOfLossStore>,
    config: ApiConfig,
    app: Router,
}

fn harness() -> Harness {
    let loss_store = Arc::new(MockLossEventStore::new());
    let gateway = Arc::new(MockLossEventGateway::new());
    let catalog = Arc::new(MockAssetCatalog::new());
    let form_store = Arc::new(MockProofOfLossStore::new());
    let jumpstart_store = Arc::new(MockJumpstartStore::new());
    let config = ApiConfig::default();

    let state = AppState {
        loss_events: Arc::new(LossEventService::new(loss_store.clone())),
        proof_of_loss: Arc::new(ProofOfLossService::new(
            gateway.clone(),
            catalog.clone(),
            form_store.clone(),
        )),
        jumpstart: Arc::new(JumpstartService::new(jumpstart_store)),
        health: Arc::new(StaticHealth),
        config: config.clone(),
    };

    let app = create_router(state);
    Harness {
        loss_store,
        gateway,
        catalog,
        form_store,
        config,
        app,
    }
}

impl Harness {
    fn bearer(&self, user_id: UserId) -> String {
        let token = create_token(
            &Uuid::from(user_id).to_string(),
            vec!["member".to_string()],
            &self.config.jwt_secret,
            self.config.jwt_expiration_secs,
        )
        .unwrap();
        format!("Bearer {token}")
    }

    async fn get(&self, uri: &str, user_id: UserId) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("Authorization", self.bearer(user_id))
            .body(Body::empty())
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, user_id: UserId, body: Value) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Authorization", self.bearer(user_id))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn report_body(discovery_date: NaiveDate) -> Value {
    json!({
        "property_id": null,
        "event_type": "theft",
        "event_date": discovery_date.to_string(),
        "discovery_date": discovery_date.to_string(),
        "description": "Garage broken into overnight",
        "police_report_number": "PR-2025-118",
        "fire_report_number": null,
        "estimated_loss": { "amount": "8200.00", "currency": "USD" }
    })
}

#[tokio::test]
async fn test_health_check_is_public() {
    let h = harness();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_includes_adapter_checks() {
    let h = harness();
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"][0]["adapter_id"], "static");
    assert_eq!(json["checks"][0]["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let h = harness();
    let request = Request::builder()
        .uri("/api/v1/loss-events")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_report_loss_event_returns_deadline_fields() {
    let h = harness();
    let user_id = UserId::new();

    // Discovered today, so the window figures are deterministic
    let today = Utc::now().date_naive();
    let response = h
        .post("/api/v1/loss-events", user_id, report_body(today))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["event_type"], "theft");
    assert_eq!(json["status"], "active");
    assert_eq!(
        json["filing_deadline"],
        (today + Duration::days(60)).to_string()
    );
    assert_eq!(json["days_remaining"], 60);
    assert_eq!(json["urgency"], "informational");
    assert_eq!(json["reminders_sent"], json!([]));
    assert_eq!(json["estimated_loss"]["amount"], "8200.00");

    // The event landed in the store under the caller's identity
    let id = LossEventId::from(Uuid::parse_str(json["id"].as_str().unwrap()).unwrap());
    let stored = h.loss_store.get(id).await.unwrap();
    assert_eq!(stored.user_id, user_id);
}

#[tokio::test]
async fn test_report_rejects_unknown_event_type() {
    let h = harness();
    let mut body = report_body(Utc::now().date_naive());
    body["event_type"] = json!("meteor");

    let response = h.post("/api/v1/loss-events", UserId::new(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_report_rejects_blank_description() {
    let h = harness();
    let mut body = report_body(Utc::now().date_naive());
    body["description"] = json!("");

    let response = h.post("/api/v1/loss-events", UserId::new(), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    let details = json["details"].as_array().unwrap();
    assert!(details.iter().any(|d| {
        d.as_str().unwrap().starts_with("description:")
    }));
}

#[tokio::test]
async fn test_get_event_hides_other_users() {
    let h = harness();
    let owner = UserId::new();

    let response = h
        .post(
            "/api/v1/loss-events",
            owner,
            report_body(Utc::now().date_naive()),
        )
        .await;
    let json = body_json(response).await;
    let id = json["id"].as_str().unwrap().to_string();

    let stranger = UserId::new();
    let response = h.get(&format!("/api/v1/loss-events/{id}"), stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = h.get(&format!("/api/v1/loss-events/{id}"), owner).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_events_is_scoped_to_caller() {
    let h = harness();
    let owner = UserId::new();
    h.post(
        "/api/v1/loss-events",
        owner,
        report_body(Utc::now().date_naive()),
    )
    .await;

    let response = h.get("/api/v1/loss-events", owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = h.get("/api/v1/loss-events", UserId::new()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

fn proof_context(user_id: UserId, property_id: Option<PropertyId>) -> LossEventContext {
    LossEventContext {
        id: LossEventId::new(),
        user_id,
        property_id,
        event_label: "Theft".to_string(),
        event_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        discovery_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        filing_deadline: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
    }
}

#[tokio::test]
async fn test_proof_submission_assembles_packet() {
    let h = harness();
    let user_id = UserId::new();
    let property_id = PropertyId::new();
    let context = proof_context(user_id, Some(property_id));
    let event_id = context.id;
    h.gateway.register(context).await;
    h.catalog
        .register(
            property_id,
            vec![CatalogAsset {
                id: AssetId::new(),
                name: "Laptop".to_string(),
                category: Some("Electronics".to_string()),
                estimated_value: Some(Money::new(dec!(1500.00), Currency::USD)),
                photos: vec![],
            }],
        )
        .await;

    let uri = format!("/api/v1/loss-events/{}/proof-of-loss", Uuid::from(event_id));
    let response = h
        .post(
            &uri,
            user_id,
            json!({
                "insurer_name": "Acme Mutual",
                "policy_number": "HO-2291",
                "claim_number": "CLM-88",
                "sworn_statement": null,
                "signature_data": "data:image/png;base64,iVBORw0KGgo="
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["asset_count"], 1);
    assert_eq!(json["total_documented_value"]["amount"], "1500.00");
    assert_eq!(json["filing_deadline"], "2025-03-02");
    // Omitted statement falls back to the standard text
    assert_eq!(json["form"]["sworn_statement"], DEFAULT_SWORN_STATEMENT);

    let response = h.get(&uri, user_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["insurer_name"], "Acme Mutual");
    assert_eq!(json["status"], "submitted");
}

#[tokio::test]
async fn test_proof_submission_without_signature_is_rejected() {
    let h = harness();
    let user_id = UserId::new();
    let context = proof_context(user_id, None);
    let event_id = context.id;
    h.gateway.register(context).await;

    let uri = format!("/api/v1/loss-events/{}/proof-of-loss", Uuid::from(event_id));
    let response = h
        .post(
            &uri,
            user_id,
            json!({
                "insurer_name": "Acme Mutual",
                "policy_number": "HO-2291",
                "claim_number": null,
                "sworn_statement": null,
                "signature_data": ""
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.form_store.form_count().await, 0);
}

#[tokio::test]
async fn test_proof_get_before_submission_is_not_found() {
    let h = harness();
    let uri = format!("/api/v1/loss-events/{}/proof-of-loss", Uuid::new_v4());
    let response = h.get(&uri, UserId::new()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_jumpstart_start_session_returns_prompts() {
    let h = harness();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            UserId::new(),
            json!({ "mode": "quick_win" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["session"]["mode"], "quick_win");
    assert_eq!(json["session"]["mode_label"], "Quick Win");
    assert_eq!(json["session"]["items_target"], 3);
    assert_eq!(json["session"]["total_value"]["amount"], "0");
    assert_eq!(json["prompts"].as_array().unwrap().len(), 3);
    assert_eq!(json["prompts"][0]["label"], "Your biggest TV");
    assert_eq!(json["current_prompt_index"], 0);
    assert_eq!(json["exhausted"], false);
}

#[tokio::test]
async fn test_jumpstart_unknown_mode_is_rejected() {
    let h = harness();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            UserId::new(),
            json!({ "mode": "speed_run" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_jumpstart_active_is_204_when_none() {
    let h = harness();
    let response = h.get("/api/v1/jumpstart/sessions/active", UserId::new()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_jumpstart_complete_prompt_advances() {
    let h = harness();
    let user_id = UserId::new();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            user_id,
            json!({ "mode": "quick_win" }),
        )
        .await;
    let json = body_json(response).await;
    let session_id = json["session"]["id"].as_str().unwrap().to_string();

    let response = h
        .post(
            &format!("/api/v1/jumpstart/sessions/{session_id}/prompts/complete"),
            user_id,
            json!({
                "asset_id": Uuid::new_v4().to_string(),
                "value": { "amount": "1200.00", "currency": "USD" }
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["session"]["items_completed"], 1);
    assert_eq!(json["session"]["total_value"]["amount"], "1200.00");
    assert_eq!(json["session"]["progress_percent"], 33);
    assert_eq!(json["current_prompt_index"], 1);

    // The resumable session reflects the progress
    let response = h.get("/api/v1/jumpstart/sessions/active", user_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["session"]["id"].as_str().unwrap(), session_id);
    assert_eq!(json["current_prompt_index"], 1);
}

#[tokio::test]
async fn test_jumpstart_foreign_currency_is_rejected() {
    let h = harness();
    let user_id = UserId::new();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            user_id,
            json!({ "mode": "quick_win" }),
        )
        .await;
    let json = body_json(response).await;
    let session_id = json["session"]["id"].as_str().unwrap().to_string();

    let response = h
        .post(
            &format!("/api/v1/jumpstart/sessions/{session_id}/prompts/complete"),
            user_id,
            json!({
                "asset_id": null,
                "value": { "amount": "100.00", "currency": "EUR" }
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_jumpstart_dismiss_removes_from_resumption() {
    let h = harness();
    let user_id = UserId::new();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            user_id,
            json!({ "mode": "high_value" }),
        )
        .await;
    let json = body_json(response).await;
    let session_id = json["session"]["id"].as_str().unwrap().to_string();

    let response = h
        .post(
            &format!("/api/v1/jumpstart/sessions/{session_id}/dismiss"),
            user_id,
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = h.get("/api/v1/jumpstart/sessions/active", user_id).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_session_routes_hide_other_users_sessions() {
    let h = harness();
    let owner = UserId::new();
    let response = h
        .post(
            "/api/v1/jumpstart/sessions",
            owner,
            json!({ "mode": "quick_win" }),
        )
        .await;
    let json = body_json(response).await;
    let session_id = json["session"]["id"].as_str().unwrap().to_string();

    let response = h
        .post(
            &format!("/api/v1/jumpstart/sessions/{session_id}/prompts/skip"),
            UserId::new(),
            json!({}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
