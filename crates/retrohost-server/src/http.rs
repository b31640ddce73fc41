//! HTTP surface: catalog JSON, ROM and save transfer, static assets

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use retrohost_config::RetroHostConfig;
use retrohost_library::{GameLibrary, LibraryError, MAX_SAVE_BYTES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

/// Static asset locations served next to the API
#[derive(Debug, Clone)]
pub struct AssetDirs {
    pub frontend: PathBuf,
    pub emulatorjs: PathBuf,
}

impl AssetDirs {
    pub fn from_config(config: &RetroHostConfig) -> Self {
        Self {
            frontend: config.frontend_dir(),
            emulatorjs: config.emulatorjs_dir(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    library: Arc<GameLibrary>,
}

/// Build the application router
pub fn router(library: GameLibrary, assets: &AssetDirs) -> Router {
    let covers_dir = library.covers_dir();
    let state = AppState {
        library: Arc::new(library),
    };

    let frontend = ServeDir::new(&assets.frontend)
        .fallback(ServeFile::new(assets.frontend.join("index.html")));

    Router::new()
        .route("/api/systems", get(list_systems))
        .route("/api/roms", get(list_roms))
        .route("/api/covers", get(cover_report))
        .route("/api/saves/:system/:rom", get(get_save).post(store_save))
        .route("/roms/:system/*file", get(serve_rom))
        .layer(DefaultBodyLimit::max(MAX_SAVE_BYTES + 1))
        .nest_service("/covers", ServeDir::new(covers_dir))
        .nest_service("/emulatorjs", ServeDir::new(&assets.emulatorjs))
        .fallback_service(frontend)
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn run(config: &RetroHostConfig, library: GameLibrary) -> anyhow::Result<()> {
    let assets = AssetDirs::from_config(config);
    let addr = config.listen_addr();

    tracing::info!("RetroHost starting on {}", addr);
    tracing::info!("ROM directory: {}", library.rom_dir().display());
    tracing::info!("Data directory: {}", library.data_dir().display());

    let app = router(library, &assets);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct RomsQuery {
    system: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: String,
}

/// Run filesystem work off the async executor
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> retrohost_library::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(ApiError::from)
}

async fn list_systems(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let systems = blocking(move || state.library.list_systems()).await?;
    Ok(Json(systems))
}

async fn list_roms(
    State(state): State<AppState>,
    Query(query): Query<RomsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let system = query
        .system
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "system parameter required"))?;

    let roms = blocking(move || state.library.list_roms(&system)).await?;
    Ok(Json(roms))
}

async fn cover_report(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = blocking(move || state.library.audit_covers()).await?;
    Ok(Json(report))
}

async fn serve_rom(
    State(state): State<AppState>,
    Path((system, file)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = blocking(move || state.library.fetch_rom_bytes(&system, &file)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        bytes,
    ))
}

async fn get_save(
    State(state): State<AppState>,
    Path((system, rom)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = blocking(move || state.library.fetch_save(&system, &rom)).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes))
}

async fn store_save(
    State(state): State<AppState>,
    Path((system, rom)): Path<(String, String)>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body =
        body.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
    blocking(move || state.library.store_save(&system, &rom, &body)).await?;
    Ok(Json(StatusResponse { status: "ok" }))
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<LibraryError> for ApiError {
    fn from(err: LibraryError) -> Self {
        let status = match &err {
            LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
            LibraryError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            LibraryError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            LibraryError::Io(_) | LibraryError::MalformedConfig(_) | LibraryError::Registry(_) => {
                tracing::error!("Request failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            status: "error",
            error: self.message,
        };
        (self.status, Json(payload)).into_response()
    }
}
