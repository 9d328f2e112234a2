#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use garment_valuer_lib::backend::{ConnectivityProber, SubmissionClient, http_client};
use garment_valuer_lib::media::{Camera, CaptureSettings, MediaAcquisition};
use garment_valuer_lib::{AcquisitionFailure, BackendUrl, WorkflowController};
use serde_json::{Value, json};

/// How the fake analysis backend answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub health_status: u16,
    pub health_delay: Duration,
    pub submit_status: u16,
    pub submit_body: String,
    pub submit_delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            health_status: 200,
            health_delay: Duration::ZERO,
            submit_status: 200,
            submit_body: r#"{"depreciation_score": 0.42, "estimated_value": 55.0}"#.to_string(),
            submit_delay: Duration::ZERO,
        }
    }
}

impl Behavior {
    pub fn submit_body(mut self, body: &str) -> Self {
        self.submit_body = body.to_string();
        self
    }
}

struct Shared {
    behavior: Behavior,
    health_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    last_submission: Mutex<Option<Value>>,
}

pub struct FakeBackend {
    url: String,
    shared: Arc<Shared>,
}

impl FakeBackend {
    pub async fn start(behavior: Behavior) -> Self {
        let shared = Arc::new(Shared {
            behavior,
            health_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            last_submission: Mutex::new(None),
        });

        let app = Router::new()
            .route("/health", get(health))
            .route("/depreciation", post(depreciation))
            .route("/convert-currency", post(convert_currency))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            shared,
        }
    }

    pub fn base(&self) -> BackendUrl {
        BackendUrl::parse(&self.url).expect("backend url")
    }

    pub fn health_calls(&self) -> usize {
        self.shared.health_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.shared.submit_calls.load(Ordering::SeqCst)
    }

    pub fn last_submission(&self) -> Option<Value> {
        self.shared.last_submission.lock().expect("lock").clone()
    }
}

async fn health(State(shared): State<Arc<Shared>>) -> impl IntoResponse {
    shared.health_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(shared.behavior.health_delay).await;
    let status = StatusCode::from_u16(shared.behavior.health_status).expect("status");
    (status, Json(json!({ "status": "ok" })))
}

async fn depreciation(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> impl IntoResponse {
    shared.submit_calls.fetch_add(1, Ordering::SeqCst);
    *shared.last_submission.lock().expect("lock") = Some(body);
    tokio::time::sleep(shared.behavior.submit_delay).await;
    let status = StatusCode::from_u16(shared.behavior.submit_status).expect("status");
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        shared.behavior.submit_body.clone(),
    )
}

async fn convert_currency(Json(body): Json<Value>) -> impl IntoResponse {
    let amount = body["amount"].as_f64().unwrap_or_default();
    match body["target_currency"].as_str() {
        Some("EUR") => (
            StatusCode::OK,
            Json(json!({ "converted_amount": amount * 0.5, "exchange_rate": 0.5 })),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Exchange rate fetch failed" })),
        ),
    }
}

/// Base URL where nothing is listening.
pub async fn dead_backend() -> BackendUrl {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    BackendUrl::parse(&format!("http://{addr}")).expect("url")
}

/// Camera that writes a fixed frame.
pub struct StubCamera {
    pub frame: Vec<u8>,
}

impl Camera for StubCamera {
    fn is_ready(&self) -> bool {
        true
    }

    async fn capture(&self, _settings: CaptureSettings, output: &Path) -> Result<(), AcquisitionFailure> {
        tokio::fs::write(output, &self.frame)
            .await
            .map_err(AcquisitionFailure::capture)
    }
}

pub fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write image");
    path
}

pub fn controller(
    base: BackendUrl,
    capture_dir: &Path,
    probe_timeout: Duration,
    submit_timeout: Duration,
) -> WorkflowController<StubCamera> {
    let http = http_client().expect("http client");
    WorkflowController::new(
        MediaAcquisition::new(StubCamera { frame: b"\xFF\xD8\xFFcamera".to_vec() }, capture_dir),
        ConnectivityProber::new(http.clone(), base.clone(), probe_timeout),
        SubmissionClient::new(http, base, submit_timeout, "test-os"),
    )
}
