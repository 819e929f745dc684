//! HTTP API routes and handlers.
//!
//! This module contains all HTTP endpoint implementations organized by domain:
//! - `scan` - Scan submission (the decision engine's caller-facing surface)
//! - `students` - Student roster lookups
//! - `logs` - Log listing, bulk clear, and CSV export
//! - `ws` - WebSocket fan-out of accepted scans
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub mod error;
pub mod health;
pub mod logs;
pub mod openapi;
pub mod scan;
pub mod students;
pub mod ws;

// Re-export commonly used types
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorResponse};

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                    - Health check
/// /api
/// ├── /scan                  - Scan submission
/// ├── /students/{enrollment} - Student lookup
/// ├── /library/logs          - Log listing (GET) and bulk clear (DELETE)
/// ├── /library/logs/export   - CSV export
/// ├── /ws                    - WebSocket live updates
/// └── /openapi.json          - OpenAPI specification
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                .nest("/scan", scan::router())
                .nest("/students", students::router())
                .nest("/library", logs::router())
                .route("/ws", get(ws::ws_handler))
                .route("/openapi.json", get(openapi::get_openapi_spec)),
        )
        .with_state(state)
}
