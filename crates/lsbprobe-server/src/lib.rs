//! HTTP steganalysis server.
//!
//! Accepts raw image bytes, decodes and analyzes them off the async runtime,
//! and answers with the per-image report as JSON.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use lsbprobe_core::{ImageReport, analyze_image_bytes};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8043;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Listener and request limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body; larger uploads get 413.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared server state.
struct AppState {
    max_upload_bytes: usize,
    analyzed: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Deserialize)]
struct AnalyzeParams {
    /// Label echoed back as the report source.
    name: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ImageReport>,
    /// Error message if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    analyzed: u64,
    rejected: u64,
}

impl AnalyzeResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            report: None,
            error: Some(error),
        }
    }
}

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> (StatusCode, Json<AnalyzeResponse>) {
    let label = params.name.unwrap_or_else(|| "upload".to_string());

    if body.is_empty() {
        state.rejected.fetch_add(1, Ordering::Relaxed);
        return Json(AnalyzeResponse::failure(
            "Empty request body. POST the raw image bytes.".to_string(),
        ))
        .with_status(StatusCode::BAD_REQUEST);
    }

    // Decoding and the pixel scan are CPU-bound; keep them off the reactor.
    let task_label = label.clone();
    let outcome =
        tokio::task::spawn_blocking(move || analyze_image_bytes(&task_label, &body)).await;

    match outcome {
        Ok(Ok(report)) => {
            state.analyzed.fetch_add(1, Ordering::Relaxed);
            log::info!(
                "{label}: {} p={:.6} ({} bytes, {:.1}ms)",
                report.result.status,
                report.result.probability,
                report.bytes,
                report.elapsed_ms
            );
            (
                StatusCode::OK,
                Json(AnalyzeResponse {
                    success: true,
                    report: Some(report),
                    error: None,
                }),
            )
        }
        Ok(Err(e)) => {
            state.rejected.fetch_add(1, Ordering::Relaxed);
            log::warn!("{label}: {e}");
            Json(AnalyzeResponse::failure(e.to_string())).with_status(StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            state.rejected.fetch_add(1, Ordering::Relaxed);
            log::error!("{label}: analysis task failed: {e}");
            Json(AnalyzeResponse::failure("Analysis task failed.".to_string()))
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: lsbprobe_core::VERSION.to_string(),
        analyzed: state.analyzed.load(Ordering::Relaxed),
        rejected: state.rejected.load(Ordering::Relaxed),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "lsbprobe server",
        "version": lsbprobe_core::VERSION,
        "endpoints": {
            "/": "This API index",
            "/api/v1/analyze": {
                "method": "POST",
                "description": "Analyze an image for LSB steganography",
                "body": "Raw PNG, BMP or JPEG bytes",
                "max_body_bytes": state.max_upload_bytes,
                "params": {
                    "name": "Optional label echoed back as report.source",
                }
            },
            "/health": "Health check with request counters",
        },
        "thresholds": {
            "clean": format!("p <= {}", lsbprobe_core::CLEAN_THRESHOLD),
            "suspicious": format!("p > {}", lsbprobe_core::SUSPICIOUS_THRESHOLD),
        },
        "examples": {
            "analyze": "curl --data-binary @image.png 'http://HOST:PORT/api/v1/analyze?name=image.png'",
        }
    }))
}

fn new_state(config: &ServerConfig) -> Arc<AppState> {
    Arc::new(AppState {
        max_upload_bytes: config.max_upload_bytes,
        analyzed: AtomicU64::new(0),
        rejected: AtomicU64::new(0),
    })
}

/// Build the axum router.
pub fn build_router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/analyze", post(handle_analyze))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(new_state(config))
}

/// Run the HTTP analysis server until the listener fails.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = build_router(&config);
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
