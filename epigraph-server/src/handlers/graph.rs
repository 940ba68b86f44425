use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

/// Query for `GET /graph`.
///
/// Callback links also carry a `uuid` parameter; it is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub title: String,
}

pub async fn graph_handler(
    State(state): State<AppState>,
    Query(query): Query<GraphQuery>,
) -> AppResult<Response> {
    let png = state.charts.get_or_render(&query.title).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        png,
    )
        .into_response())
}
