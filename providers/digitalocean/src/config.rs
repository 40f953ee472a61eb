//! Provider configuration.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use nimbus_poll::{PollPeriod, PollSettings, Timeouts};

/// Default DigitalOcean API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

/// DigitalOcean provider configuration.
#[derive(Clone)]
pub struct Config {
    /// API base URL, without a trailing slash.
    pub api_url: String,

    /// Personal access token.
    pub token: String,

    /// Per-wait timeouts and poll periods.
    pub poll: PollSettings,

    /// Whether delete waits for the droplet to disappear.
    pub await_termination_on_delete: bool,

    /// Page size for list endpoints.
    pub page_size: u32,

    /// Timeout for a single HTTP request in seconds.
    pub request_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("poll", &self.poll)
            .field("await_termination_on_delete", &self.await_termination_on_delete)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Configuration with defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll: PollSettings::default(),
            await_termination_on_delete: true,
            page_size: 200,
            request_timeout_secs: 60,
        }
    }

    /// Override the API URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("DIGITALOCEAN_TOKEN").context("DIGITALOCEAN_TOKEN must be set")?;
        Self::new(token).apply_env()
    }

    /// Apply every environment override except the token.
    pub fn apply_env(self) -> Result<Self> {
        let mut config = self;

        if let Ok(url) = std::env::var("DIGITALOCEAN_API_URL") {
            config = config.with_api_url(url);
        }

        let defaults = config.poll.timeouts;
        let timeouts = Timeouts {
            node_running: env_millis("NIMBUS_TIMEOUT_NODE_RUNNING_MS")?
                .unwrap_or(defaults.node_running),
            node_suspended: env_millis("NIMBUS_TIMEOUT_NODE_SUSPENDED_MS")?
                .unwrap_or(defaults.node_suspended),
            node_terminated: env_millis("NIMBUS_TIMEOUT_NODE_TERMINATED_MS")?
                .unwrap_or(defaults.node_terminated),
            image_available: env_millis("NIMBUS_TIMEOUT_IMAGE_AVAILABLE_MS")?
                .unwrap_or(defaults.image_available),
        };

        let default_period = config.poll.period;
        let period = PollPeriod::new(
            env_millis("NIMBUS_POLL_INITIAL_PERIOD_MS")?.unwrap_or(default_period.initial()),
            env_millis("NIMBUS_POLL_MAX_PERIOD_MS")?.unwrap_or(default_period.max()),
        )
        .context("Invalid poll period")?;

        config.poll = PollSettings::new(timeouts, period);

        if let Ok(value) = std::env::var("NIMBUS_AWAIT_TERMINATION_ON_DELETE") {
            config.await_termination_on_delete = parse_bool(&value)
                .with_context(|| format!("NIMBUS_AWAIT_TERMINATION_ON_DELETE: {value:?}"))?;
        }

        Ok(config)
    }
}

fn env_millis(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(value) => {
            let ms: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a number of milliseconds, got {value:?}"))?;
            Ok(Some(Duration::from_millis(ms)))
        }
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected a boolean"),
    }
}
