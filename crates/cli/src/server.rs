//! HTTP face-detection service.

use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use facespot_core::detection::domain::detection_error::DetectionError;
use facespot_core::detection::domain::face_geometry::DetectionResponse;
use facespot_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use facespot_core::shared::constants::DETECTION_PATH;

#[derive(Clone)]
pub struct AppState {
    use_case: Arc<DetectFacesUseCase>,
}

impl AppState {
    pub fn new(use_case: Arc<DetectFacesUseCase>) -> Self {
        Self { use_case }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Detection, health and optional static routes, with permissive CORS so
/// pages on other origins can call the service.
pub fn create_router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/v1/facedetection/*image_url", get(detect_faces))
        .fallback(fallback)
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.layer(CorsLayer::permissive())
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Received shutdown signal");
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn detect_faces(State(state): State<AppState>, Path(image_url): Path<String>) -> Response {
    let segment = image_url.trim_start_matches('/').to_string();
    log::debug!("Detection request for {segment:?}");

    let use_case = state.use_case.clone();
    let result = tokio::task::spawn_blocking(move || use_case.execute(&segment))
        .await
        .unwrap_or_else(|e| Err(DetectionError::Internal(e.to_string())));

    match result {
        Ok(faces) => (StatusCode::OK, Json(DetectionResponse::faces(faces))).into_response(),
        Err(err) => error_response(err),
    }
}

/// The detection prefix with nothing after it never reaches the wildcard.
async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == DETECTION_PATH.trim_end_matches('/') || path == DETECTION_PATH {
        return error_response(DetectionError::NoImageSpecified);
    }
    StatusCode::NOT_FOUND.into_response()
}

fn error_response(err: DetectionError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        log::error!("Detection failed: {err}");
    }
    (status, Json(err.to_response())).into_response()
}
