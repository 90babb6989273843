//! HTTP API over the two pipeline stages and the download root.
//!
//! Pipeline calls are blocking (reqwest blocking client, pdftotext), so every
//! handler that touches them runs on the blocking thread pool. Modeled
//! failures come back as `200` with `status: "error"`; faults as `500`.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rol_core::acquisition::fetch::{Fetcher, HttpFetcher};
use rol_core::config::PipelineConfig;
use rol_core::error::RolError;
use rol_core::extraction::pdftotext::PdftotextExtractor;
use rol_core::extraction::TableExtractor;
use rol_core::outcome::Outcome;
use rol_core::storage::{FsStorage, Storage, Stores};
use rol_core::transform::ProcessReport;
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SCRAPED_MESSAGE: &str = "Rol de procedimentos baixado e compactado com sucesso!";
const ROOT_MESSAGE: &str = "API do rol de procedimentos rodando!";

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PipelineConfig>,
    pub downloads: Arc<dyn Storage>,
    pub work: Arc<dyn Storage>,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn TableExtractor>,
}

impl AppState {
    /// Filesystem storage, reqwest fetcher and pdftotext extractor.
    pub fn from_config(config: PipelineConfig) -> Self {
        AppState {
            downloads: Arc::new(FsStorage::new(&config.download_root)),
            work: Arc::new(FsStorage::new(&config.work_root)),
            fetcher: Arc::new(HttpFetcher::new(config.user_agent.clone())),
            extractor: Arc::new(PdftotextExtractor::new()),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/scrapping/rol-procedimentos", post(scrape))
        .route("/downloads", get(list_files))
        .route("/downloads/:name", get(download_file))
        .route("/processamento/rol-procedimentos", post(process))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, state: AppState) -> anyhow::Result<()> {
    if !PdftotextExtractor::is_available() {
        tracing::warn!("pdftotext not found on PATH; processing requests will fail");
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────

/// A fault: storage, archive or tool failure, or a panicked worker.
#[derive(Debug)]
pub struct ApiError(String);

impl From<RolError> for ApiError {
    fn from(e: RolError) -> Self {
        ApiError(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError(format!("pipeline task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": self.0 })),
        )
            .into_response()
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RolError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

// ── Handlers ────────────────────────────────────────────────────

async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

#[derive(Debug, Serialize)]
struct FileUrl {
    file_url: String,
}

async fn scrape(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Outcome<FileUrl>>, ApiError> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost")
        .to_string();

    let outcome = blocking(move || {
        rol_core::run_acquisition(&state.config, state.fetcher.as_ref(), state.downloads.as_ref())
    })
    .await?;

    let mut response = outcome.map(|report| FileUrl {
        file_url: format!("http://{host}/downloads/{}", report.archive_key),
    });
    if response.is_success() {
        response.message = SCRAPED_MESSAGE.to_string();
    }
    Ok(Json(response))
}

async fn list_files(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let files = blocking(move || state.downloads.list("")).await?;
    Ok(Json(json!({ "files": files })))
}

async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let key = name.clone();
    let bytes = blocking(move || {
        if !state.downloads.exists(&key) {
            return Ok(None);
        }
        match state.downloads.get(&key) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(RolError::ArtifactMissing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    })
    .await?;

    let Some(bytes) = bytes else {
        let missing: Outcome<()> = Outcome::error(&RolError::ArtifactMissing(name));
        return Ok(Json(missing).into_response());
    };

    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "_"));
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&name).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn process(State(state): State<AppState>) -> Result<Json<Outcome<ProcessReport>>, ApiError> {
    let outcome = blocking(move || {
        let stores = Stores {
            downloads: state.downloads.as_ref(),
            work: state.work.as_ref(),
        };
        rol_core::run_processing(&state.config, stores, state.extractor.as_ref())
    })
    .await?;
    Ok(Json(outcome))
}

fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("zip") => "application/zip",
        Some("pdf") => "application/pdf",
        Some("csv") => "text/csv; charset=utf-8",
        _ => "application/octet-stream",
    }
}
