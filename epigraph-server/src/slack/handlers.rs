use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Json, Response};
use epigraph_core::resolver::{TOP_RATED_COMMAND, pick_top_rated};
use tracing::{info, warn};

use super::{Acknowledgment, HELP_TEXT, SlackCommand};
use crate::infra::app_state::AppState;

/// `GET /slack?text=..&response_url=..`
pub async fn slack_query_handler(
    State(state): State<AppState>,
    Query(command): Query<SlackCommand>,
) -> Response {
    handle_command(&state, command).await
}

/// `POST /slack` with the form body chat platforms send.
pub async fn slack_form_handler(
    State(state): State<AppState>,
    Form(command): Form<SlackCommand>,
) -> Response {
    handle_command(&state, command).await
}

async fn handle_command(state: &AppState, command: SlackCommand) -> Response {
    let Some((text, response_url)) = command.validate() else {
        return HELP_TEXT.into_response();
    };

    let title = if text == TOP_RATED_COMMAND {
        match pick_top_rated(state.catalog().as_ref()).await {
            Ok(title) => title,
            Err(err) => {
                warn!(error = %err, "could not pick a top rated series");
                return Json(Acknowledgment::in_channel(err.public_message()))
                    .into_response();
            }
        }
    } else {
        text
    };

    info!(title = %title, "chart requested from chat");
    state.callbacks.dispatch(title.clone(), response_url);

    Json(Acknowledgment::in_channel(format!(
        "Graphing episode ratings for {title}..."
    )))
    .into_response()
}
