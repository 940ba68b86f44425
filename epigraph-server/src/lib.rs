//! # Epigraph Server
//!
//! HTTP front end for the rating-chart pipeline:
//!
//! - `GET /graph?title=..` renders (or serves from cache) a PNG chart
//! - `GET|POST /slack` acknowledges a slash command and posts the chart link
//!   back from a background task
//! - `GET /ping` is a liveness probe

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod slack;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use infra::app_state::AppState;

pub fn create_app(state: AppState) -> Router {
    routes::create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
