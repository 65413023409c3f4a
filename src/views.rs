use askama::Template;
use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::models::ActionId;
use crate::poller::PollStatus;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/monitor", get(monitor_page))
        .route("/api/status", get(status))
}

#[derive(Template)]
#[template(path = "monitor/index.html")]
struct MonitorTemplate {
    enabled: bool,
    server_url: String,
    interval_ms: u128,
    cards: Vec<String>,
    polls: u64,
    failures: u64,
    cursor: Option<ActionId>,
    last_error: Option<String>,
}

fn current_status(state: &SharedState) -> PollStatus {
    state
        .poller
        .as_ref()
        .map(|poller| poller.status())
        .unwrap_or_default()
}

pub async fn monitor_page(State(state): State<SharedState>) -> impl IntoResponse {
    let status = current_status(&state);

    let template = MonitorTemplate {
        enabled: state.feed.is_some(),
        server_url: state.config.server_url.clone(),
        interval_ms: state.config.poll_interval.as_millis(),
        cards: state.feed.as_ref().map(|feed| feed.cards()).unwrap_or_default(),
        polls: status.polls,
        failures: status.failures,
        cursor: status.cursor,
        last_error: status.last_error,
    };
    Html(template.render().unwrap_or_default())
}

pub async fn status(State(state): State<SharedState>) -> Json<PollStatus> {
    Json(current_status(&state))
}
