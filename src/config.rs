use std::net::IpAddr;
use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub max_cards: Option<usize>,
    pub feed_enabled: bool,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env = Env(lookup);

        let server_url = env
            .required("FEED_SERVER_URL")?
            .trim_end_matches('/')
            .to_string();

        let default_interval = DEFAULT_POLL_INTERVAL.as_millis().to_string();
        let interval_ms: u64 = env
            .or("FEED_POLL_INTERVAL_MS", &default_interval)
            .parse()
            .map_err(|e| format!("Invalid FEED_POLL_INTERVAL_MS: {e}"))?;
        if interval_ms == 0 {
            return Err("FEED_POLL_INTERVAL_MS must be greater than zero".to_string());
        }

        let request_timeout = env
            .optional("FEED_REQUEST_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| format!("Invalid FEED_REQUEST_TIMEOUT_SECS: {e}"))
            })
            .transpose()?;

        let max_cards = env
            .optional("FEED_MAX_CARDS")
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|e| format!("Invalid FEED_MAX_CARDS: {e}"))
            })
            .transpose()?;
        if max_cards == Some(0) {
            return Err("FEED_MAX_CARDS must be greater than zero".to_string());
        }

        let feed_enabled = match env.or("FEED_ENABLED", "true").trim().to_lowercase().as_str() {
            "false" | "0" | "no" | "off" => false,
            _ => true,
        };

        let host: IpAddr = env
            .or("FEED_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FEED_HOST: {e}"))?;

        let port: u16 = env
            .or("FEED_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FEED_PORT: {e}"))?;

        let log_level = env.or("FEED_LOG_LEVEL", "info");

        Ok(Config {
            server_url,
            poll_interval: Duration::from_millis(interval_ms),
            request_timeout,
            max_cards,
            feed_enabled,
            host,
            port,
            log_level,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn required(&self, key: &str) -> Result<String, String> {
        (self.0)(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|s| !s.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }
}
