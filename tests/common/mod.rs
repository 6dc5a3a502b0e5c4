//! In-process stand-in for the payment backend
//!
//! Behaviour is keyed off the customer's phone number so tests can pick an
//! outcome without extra plumbing:
//! - ending in `0000`: business error (`success: false`)
//! - ending in `9999`: backend used the fallback provider
//! - ending in `5030`: HTTP 503 with an HTML body

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use smartpay_client::config::ApiConfig;
use smartpay_client::payments::registry::default_availability;
use smartpay_client::payments::{Country, PaymentMethod};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
    pub idempotency_key: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    polls: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockState {
    fn record(&self, path: impl Into<String>, headers: &HeaderMap, body: Value) {
        let idempotency_key = headers
            .get("idempotency-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.into(),
            body,
            idempotency_key,
        });
    }
}

pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let base_url = serve(router(state.clone())).await;
        Self { base_url, state }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            timeout_secs: 5,
            ..ApiConfig::new(format!("{}/api", self.base_url))
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

/// Bind an ephemeral port and serve `router` in the background
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend");
    });
    format!("http://{}", addr)
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/smart-payment/initialize", post(initialize))
        .route("/api/smart-payment/check-status", post(check_status))
        .route("/api/smart-payment/available-methods", get(available_methods))
        .route("/api/pawapay/process/:country/:method", post(pawapay))
        .route("/api/process-paydunya-payment", post(paydunya))
        .route("/api/process-orange-money-ci-payment", post(orange_money_ci))
        .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
        .with_state(state)
}

fn phone_of(body: &Value) -> &str {
    body["phone_number"].as_str().unwrap_or_default()
}

async fn initialize(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/smart-payment/initialize", &headers, body.clone());
    let phone = phone_of(&body);

    if phone.ends_with("5030") {
        return (StatusCode::SERVICE_UNAVAILABLE, "<html>maintenance</html>").into_response();
    }
    if phone.ends_with("0000") {
        return Json(json!({
            "success": false,
            "message": "Numéro non enregistré chez l'opérateur",
            "details": {"code": "PAYER_NOT_FOUND"}
        }))
        .into_response();
    }

    let Some(method) = body["payment_method"].as_str().and_then(PaymentMethod::from_key) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"success": false, "message": "Unknown payment method"})),
        )
            .into_response();
    };
    let entry = method.entry();
    let (provider, fallback_used) = match entry.fallback {
        Some(fallback) if phone.ends_with("9999") => (fallback, true),
        _ => (entry.primary, false),
    };

    let reference = body["reference"].as_str().unwrap_or_default();
    Json(json!({
        "success": true,
        "message": "Payment initiated",
        "data": {
            "status": "initiated",
            "provider": provider,
            "payment_id": format!("dep-{}", reference),
            "amount": body["amount"].clone(),
            "currency": body["currency"].clone(),
            "fallback_used": fallback_used,
        }
    }))
    .into_response()
}

// First poll of a payment is pending, every later poll is completed
async fn check_status(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/smart-payment/check-status", &headers, body.clone());
    let payment_id = body["payment_id"].as_str().unwrap_or_default().to_string();

    let polls = {
        let mut polls = state.polls.lock().unwrap();
        let count = polls.entry(payment_id.clone()).or_insert(0);
        *count += 1;
        *count
    };
    let status = if polls == 1 { "PENDING" } else { "COMPLETED" };

    Json(json!({
        "success": true,
        "data": {
            "payment_id": payment_id,
            "provider": body["provider"].clone(),
            "status": status,
        }
    }))
    .into_response()
}

async fn available_methods(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let country = params.get("country").cloned().unwrap_or_default();
    state.record(
        format!("/smart-payment/available-methods?country={}", country),
        &headers,
        Value::Null,
    );

    match country.parse::<Country>() {
        Ok(country) => Json(json!({
            "success": true,
            "data": {
                "country": country,
                "methods": default_availability(country),
            }
        }))
        .into_response(),
        Err(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": message})),
        )
            .into_response(),
    }
}

async fn pawapay(
    State(state): State<MockState>,
    Path((country, method)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(format!("/pawapay/process/{}/{}", country, method), &headers, body);
    Json(json!({
        "success": true,
        "data": {"deposit_id": "pp-deposit-1", "status": "ACCEPTED"}
    }))
    .into_response()
}

async fn paydunya(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/process-paydunya-payment", &headers, body);
    Json(json!({
        "success": true,
        "data": {
            "token": "pd-token-1",
            "redirect_url": "https://paydunya.example.com/checkout/pd-token-1",
            "status": "pending"
        }
    }))
    .into_response()
}

async fn orange_money_ci(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/process-orange-money-ci-payment", &headers, body.clone());

    if body["otp_code"] == "1234" {
        Json(json!({
            "success": true,
            "message": "Paiement effectué",
            "data": {"transaction_id": "OM-CI-1", "status": "success"}
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Code OTP invalide ou expiré"})),
        )
            .into_response()
    }
}
