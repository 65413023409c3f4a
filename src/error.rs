use reqwest::StatusCode;

/// Everything that can go wrong during a single poll. All variants are handled
/// the same way by the poller: logged, counted, and retried on the next tick.
#[derive(Debug)]
pub enum PollError {
    Network(reqwest::Error),
    Status(StatusCode),
    Parse(serde_json::Error),
}

impl std::fmt::Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollError::Network(err) => write!(f, "Network Error: {err}"),
            PollError::Status(status) => write!(f, "Unexpected Status: {status}"),
            PollError::Parse(err) => write!(f, "Parse Error: {err}"),
        }
    }
}

impl std::error::Error for PollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PollError::Network(err) => Some(err),
            PollError::Status(_) => None,
            PollError::Parse(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for PollError {
    fn from(err: reqwest::Error) -> Self {
        PollError::Network(err)
    }
}

impl From<serde_json::Error> for PollError {
    fn from(err: serde_json::Error) -> Self {
        PollError::Parse(err)
    }
}
