use axum::Router;
use axum::routing::get;

use crate::handlers::{graph_handler, ping_handler};
use crate::infra::app_state::AppState;
use crate::slack::handlers::{slack_form_handler, slack_query_handler};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/graph", get(graph_handler))
        .route("/slack", get(slack_query_handler).post(slack_form_handler))
        .route("/ping", get(ping_handler))
}
