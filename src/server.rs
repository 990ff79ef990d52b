//! HTTP front end for the dashboard: uploads, stored charts, history and static files.

use std::path::{Path as FsPath, PathBuf};
use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::db::{append_statement, checksum, get_connection, init_db, load_history};
use crate::error::{PesaError, Result};
use crate::models::{ChartData, History};
use crate::pipeline::{process, PipelineConfig};
use crate::reader::read_bytes;
use crate::settings::Settings;
use crate::store::ChartStore;

pub struct AppState {
    pub pipeline: PipelineConfig,
    pub charts: ChartStore,
    pub static_dir: PathBuf,
    pub db: Mutex<Connection>,
}

impl AppState {
    pub fn new(
        pipeline: PipelineConfig,
        chart_dir: PathBuf,
        static_dir: PathBuf,
        db_path: &FsPath,
    ) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self {
            pipeline,
            charts: ChartStore::new(chart_dir),
            static_dir,
            db: Mutex::new(conn),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.pipeline(),
            settings.chart_dir(),
            PathBuf::from(&settings.static_dir),
            &settings.db_path(),
        )
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| PesaError::Other("database lock poisoned".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<PesaError> for ApiError {
    fn from(e: PesaError) -> Self {
        match e {
            PesaError::NotFound(msg) => Self::not_found(msg),
            PesaError::UnsupportedFormat(_) | PesaError::Parse(_) => Self::bad_request(e.to_string()),
            other => Self::bad_request(PesaError::Parse(other.to_string()).to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message }));
        (self.status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Upload handling
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub processed_chart_data_id: String,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
    pub charts: ChartData,
}

/// Pull the `file` part out of a multipart form.
async fn read_file_part(mut multipart: Multipart) -> std::result::Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read form field: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(ApiError::bad_request("No selected file"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file data: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError::bad_request("No file part"))
}

/// Run the pipeline on an uploaded statement and keep the chart payload.
pub fn analyze_upload(state: &AppState, filename: &str, bytes: &[u8]) -> Result<UploadResponse> {
    let table = read_bytes(filename, bytes)?;
    let processed = process(&table, &state.pipeline);
    let id = state.charts.save(&processed.charts)?;
    info!(
        filename,
        transactions = processed.transactions.len(),
        chart_id = %id,
        "statement analyzed"
    );
    Ok(UploadResponse {
        success: true,
        message: "File processed and chart data generated successfully!".to_string(),
        processed_chart_data_id: id,
    })
}

/// Run the pipeline on an uploaded statement and append its rows to the database.
pub fn store_upload(state: &AppState, filename: &str, bytes: &[u8]) -> Result<StoreResponse> {
    let table = read_bytes(filename, bytes)?;
    let processed = process(&table, &state.pipeline);
    let result = {
        let mut conn = state.conn()?;
        append_statement(&mut conn, filename, &checksum(bytes), &processed.transactions)?
    };
    if result.duplicate_file {
        info!(filename, "statement already imported");
    } else {
        info!(filename, imported = result.imported, skipped = result.skipped, "statement stored");
    }
    Ok(StoreResponse {
        success: true,
        imported: result.imported,
        skipped: result.skipped,
        duplicate_file: result.duplicate_file,
        charts: processed.charts,
    })
}

fn log_failure(route: &str, e: PesaError) -> ApiError {
    warn!(route, error = %e, "upload failed");
    ApiError::from(e)
}

async fn upload_mpesa_data(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ApiError> {
    let (filename, bytes) = read_file_part(multipart).await?;
    analyze_upload(&state, &filename, &bytes)
        .map(Json)
        .map_err(|e| log_failure("/upload-mpesa-data", e))
}

async fn upload_and_store(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> std::result::Result<Json<StoreResponse>, ApiError> {
    let (filename, bytes) = read_file_part(multipart).await?;
    store_upload(&state, &filename, &bytes)
        .map(Json)
        .map_err(|e| log_failure("/upload", e))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub async fn get_chart_data(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Response {
    match state.charts.load_raw(&file_id) {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn history_data(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<History>, ApiError> {
    let conn = state.conn()?;
    Ok(Json(load_history(&conn)?))
}

// ---------------------------------------------------------------------------
// Static files
// ---------------------------------------------------------------------------

async fn serve_static(dir: &FsPath, relative: &str) -> Response {
    match tokio::fs::read(dir.join(relative)).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(relative).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    serve_static(&state.static_dir, "index.html").await
}

pub async fn static_file(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    if path.contains("..") || path.starts_with('/') {
        return (StatusCode::FORBIDDEN, "Access Denied").into_response();
    }
    serve_static(&state.static_dir, &path).await
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload-mpesa-data", post(upload_mpesa_data))
        .route("/get-chart-data/:file_id", get(get_chart_data))
        .route("/upload", post(upload_and_store))
        .route("/api/data", get(history_data))
        .route("/*path", get(static_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

pub async fn serve(settings: &Settings, addr: &str) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_settings(settings)?);
    info!(
        charts = %state.charts.dir().display(),
        static_dir = %state.static_dir.display(),
        "dashboard state ready"
    );
    let app = router(state, settings.max_upload_bytes());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
