pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod poller;
pub mod render;
pub mod source;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::PollError;
use crate::feed::{Feed, HtmlFeed};
use crate::source::HttpUpdateSource;
use crate::state::{AppState, SharedState};

/// Build the feed container and start the poller when the feed is enabled.
pub fn start_feed(
    config: Config,
    shutdown: watch::Receiver<bool>,
) -> Result<(SharedState, Option<JoinHandle<()>>), PollError> {
    let source = Arc::new(HttpUpdateSource::new(
        &config.server_url,
        config.request_timeout,
    )?);
    tracing::info!("Polling {} every {:?}", source.url(), config.poll_interval);

    let feed = config
        .feed_enabled
        .then(|| Arc::new(HtmlFeed::new(config.max_cards)));

    let started = poller::initialize(
        feed.clone().map(|f| f as Arc<dyn Feed>),
        source,
        config.poll_interval,
        shutdown,
    );
    let (poller, handle) = match started {
        Some((poller, handle)) => (Some(poller), Some(handle)),
        None => (None, None),
    };

    let state: SharedState = Arc::new(AppState {
        config,
        feed,
        poller,
    });

    Ok((state, handle))
}

pub fn build_app(state: SharedState) -> Router {
    Router::new()
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
