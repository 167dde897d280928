//! REST API server for the hybrid analyst
//!
//! Exposes the orchestrator via HTTP endpoints.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::agent::Orchestrator;
use crate::models::{DocumentSource, StatusReport};

pub const SERVICE_NAME: &str = "Hybrid AI Analyst";

/// Upload cap for a single request (both files together).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiReply = (StatusCode, Json<ApiResponse>);

fn bad_request(message: impl Into<String>) -> ApiReply {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message.into())))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
}

/// =============================
/// Info Endpoints
/// =============================

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Hybrid AI Analyst - Startup Vetting System"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn status(State(state): State<ApiState>) -> Json<StatusReport> {
    Json(state.orchestrator.status().await)
}

/// =============================
/// Vetting Endpoint
/// =============================

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct VetUploads {
    memo: Option<Upload>,
    financials: Option<Upload>,
}

async fn read_uploads(mut multipart: Multipart) -> Result<VetUploads, ApiReply> {
    let mut uploads = VetUploads::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(bad_request(format!("Invalid multipart body: {}", e))),
        };

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();

        let slot = match name.as_str() {
            "memo_file" => &mut uploads.memo,
            "financial_data" => &mut uploads.financials,
            _ => continue,
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read {}: {}", name, e)))?;

        *slot = Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Ok(uploads)
}

async fn vet_startup(State(state): State<ApiState>, multipart: Multipart) -> ApiReply {
    let uploads = match read_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(reply) => return reply,
    };

    let Some(memo) = uploads.memo else {
        return bad_request("Missing memo_file upload");
    };
    let Some(financials) = uploads.financials else {
        return bad_request("Missing financial_data upload");
    };

    if !memo.file_name.ends_with(".txt") {
        return bad_request("Memo file must be a .txt file");
    }
    if !financials.file_name.ends_with(".csv") {
        return bad_request("Financial data must be a .csv file");
    }

    info!(
        memo_file = %memo.file_name,
        financial_data = %financials.file_name,
        "Received analysis request"
    );

    let memo_source = DocumentSource::Bytes(memo.bytes);
    let financial_source = DocumentSource::Bytes(financials.bytes);

    match state
        .orchestrator
        .run_analysis(&memo_source, &financial_source)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success(result))),
        Err(e) => {
            error!(error = %e, "Analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Analysis failed: {}", e))),
            )
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = ApiState { orchestrator };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/vet_startup", post(vet_startup))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<Orchestrator>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
