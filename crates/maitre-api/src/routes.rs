//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use maitre_core::error::MaitreError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: the kiosk front-end is served from localhost on the configured
    // port, or port+1 during development.
    let port = state.config.general.port;
    let dev_port = port.saturating_add(1);
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            [
                format!("http://127.0.0.1:{}", port),
                format!("http://localhost:{}", port),
                format!("http://127.0.0.1:{}", dev_port),
                format!("http://localhost:{}", dev_port),
            ]
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat))
        .route("/voice/status", get(handlers::voice_status))
        .route("/voice/start", post(handlers::voice_start))
        .route("/voice/stop-listening", post(handlers::voice_stop_listening))
        .route("/voice/stop-speaking", post(handlers::voice_stop_speaking))
        .route("/voice/transcript", post(handlers::voice_transcript))
        .route("/voice/capture-error", post(handlers::voice_capture_error))
        .route("/voice/capture-ended", post(handlers::voice_capture_ended))
        .route(
            "/voice/playback-started",
            post(handlers::voice_playback_started),
        )
        .route(
            "/voice/playback-finished",
            post(handlers::voice_playback_finished),
        )
        .layer(DefaultBodyLimit::max(64 * 1024)) // utterances are short
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Binds to 127.0.0.1 (localhost only) on the port from config.
pub async fn start_server(state: AppState) -> Result<(), MaitreError> {
    let addr = format!("127.0.0.1:{}", state.config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MaitreError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| MaitreError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
