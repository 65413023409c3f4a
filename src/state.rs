use std::sync::Arc;

use crate::config::Config;
use crate::feed::HtmlFeed;
use crate::poller::UpdatePoller;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub feed: Option<Arc<HtmlFeed>>,
    pub poller: Option<Arc<UpdatePoller>>,
}
