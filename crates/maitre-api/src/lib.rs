//! Maitre API crate - axum HTTP server and route handlers.
//!
//! Exposes the dialogue transport endpoint (`POST /api/chat`), the voice
//! controller surface used by the kiosk front-end (user intents and service
//! callbacks), and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod transport;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use transport::EngineTransport;
