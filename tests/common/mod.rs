//! In-process mock of the reliability backend for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const EXPORT_CSV: &[u8] = b"date,make,model,year\n2026-01-02,Kia,Rio (1999-2025),2017\n";

// What the backend saw for one request
#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub bearer: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    hits: Arc<AtomicUsize>,
}

impl Recorder {
    fn record(
        &self,
        uri: &Uri,
        bearer: Option<TypedHeader<Authorization<Bearer>>>,
        query: HashMap<String, String>,
        body: Option<Value>,
    ) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call {
            path: uri.path().to_string(),
            bearer: bearer.map(|TypedHeader(Authorization(b))| b.token().to_string()),
            query,
            body,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn analysis_payload() -> Value {
    json!({
        "source": "model",
        "used_fallback": false,
        "km_warn": false,
        "mileage_note": null,
        "result": {
            "base_score_calculated": 83,
            "reliability_summary": "Very reliable compact car.",
            "score_breakdown": {
                "engine_transmission_score": 9,
                "electrical_score": 8,
                "suspension_brakes_score": 8,
                "maintenance_cost_score": 9,
                "satisfaction_score": 9,
                "recalls_score": 7
            },
            "common_issues": ["Water pump wear"],
            "avg_repair_cost_ILS": 2200,
            "issues_with_costs": [
                {"issue": "Water pump wear", "avg_cost_ILS": 1500, "source": "forum", "severity": "בינוני"},
                {"issue": "Infotainment freeze", "cost": "not sure", "severity": "low"}
            ],
            "sources": ["owners forum", "recall database"],
            "recommended_checks": ["Check coolant level", "Scan for fault codes"],
            "common_competitors_brief": [
                {"model": "Mazda3", "brief_summary": "Sportier handling"},
                {"model": "Hyundai i30", "brief_summary": "Cheaper parts"}
            ]
        },
        "quota": {"user_left_today": 4, "global_left_today": 812}
    })
}

async fn quota(
    State(rec): State<Recorder>,
    uri: Uri,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Response {
    rec.record(&uri, bearer, HashMap::new(), None);
    Json(json!({"user_left_today": 0, "global_left_today": 999})).into_response()
}

// The requested make picks the outcome
async fn analyze(
    State(rec): State<Recorder>,
    uri: Uri,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(body): Json<Value>,
) -> Response {
    let make = body["make"].as_str().unwrap_or_default().to_string();
    rec.record(&uri, bearer, HashMap::new(), Some(body));
    match make.as_str() {
        "Limit" => (StatusCode::TOO_MANY_REQUESTS, Json(json!({"detail": "daily limit"}))).into_response(),
        "Down" => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"detail": "model down"}))).into_response(),
        "Broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "Expired" => (StatusCode::UNAUTHORIZED, Json(json!({"detail": "invalid token"}))).into_response(),
        "Sparse" => Json(json!({"result": {"base_score_calculated": "71"}, "source": "cache"})).into_response(),
        _ => Json(analysis_payload()).into_response(),
    }
}

async fn history(
    State(rec): State<Recorder>,
    uri: Uri,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    rec.record(&uri, bearer, query, None);
    Json(json!({
        "items": [
            {"date": "2026-01-02", "make": "Kia", "model": "Rio (1999-2025)", "year": 2017,
             "fuel": "בנזין", "transmission": "אוטומטית", "mileage_range": "עד 50,000 ק\"מ",
             "base_score_calculated": 81},
            {"date": "2026-01-01", "make": "Toyota", "model": "Yaris (2008-2025)", "year": 2011,
             "mileage_range": "150,000 - 200,000 ק\"מ", "base_score_calculated": null}
        ],
        "total": 2
    }))
    .into_response()
}

async fn export(State(rec): State<Recorder>, uri: Uri, bearer: Option<TypedHeader<Authorization<Bearer>>>) -> Response {
    rec.record(&uri, bearer, HashMap::new(), None);
    ([(header::CONTENT_TYPE, "text/csv")], EXPORT_CSV).into_response()
}

async fn leads(
    State(rec): State<Recorder>,
    uri: Uri,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(body): Json<Value>,
) -> Response {
    // The contact name picks how the save is acknowledged
    let name = body["payload"]["name"].as_str().unwrap_or_default().to_string();
    rec.record(&uri, bearer, HashMap::new(), Some(body));
    match name.as_str() {
        "Quiet" => StatusCode::NO_CONTENT.into_response(),
        "Bare" => (StatusCode::OK, "null").into_response(),
        _ => Json(json!({"status": "success", "message": "Lead saved successfully"})).into_response(),
    }
}

async fn roi(
    State(rec): State<Recorder>,
    uri: Uri,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(body): Json<Value>,
) -> Response {
    let price = body["purchase_price"].as_i64().unwrap_or_default();
    rec.record(&uri, bearer, HashMap::new(), Some(body));
    Json(json!({
        "estimated_value_1y": price * 85 / 100,
        "estimated_value_3y": price * 60 / 100,
        "estimated_value_5y": price * 40 / 100,
        "total_cost_of_ownership_1y": price * 15 / 100 + 5000,
        "total_cost_of_ownership_3y": price * 40 / 100 + 15000,
        "total_cost_of_ownership_5y": price * 60 / 100 + 25000
    }))
    .into_response()
}

async fn health() -> Response {
    Json(json!({"status": "healthy", "timestamp": "2026-10-16T09:00:00"})).into_response()
}

pub fn router(rec: Recorder) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/quota", get(quota))
        .route("/v1/analyze", post(analyze))
        .route("/v1/history", get(history))
        .route("/v1/history/export.csv", get(export))
        .route("/v1/leads", post(leads))
        .route("/v1/roi", post(roi))
        .with_state(rec)
}

/// Serves the mock on an ephemeral port and returns its base URL.
pub async fn start_backend(rec: Recorder) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(rec)).await.unwrap();
    });
    format!("http://{}", addr)
}
