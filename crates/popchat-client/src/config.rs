//! Client configuration.
//!
//! [`ClientConfig`] is read from the `[client]` table of
//! `config/popchat.toml` (every field optional) and then overridden from the
//! environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `POPCHAT_BASE_URL` | `base_url` |
//! | `POPCHAT_WELCOME_DELAY_MS` | `welcome_delay_ms` |
//! | `POPCHAT_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Path of the login endpoint, relative to the base URL.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path of the chat endpoint, relative to the base URL.
pub const CHAT_PATH: &str = "/chat";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_WELCOME: &str = "Welcome to RBC Banking Assistant! How can I help you today?";
const DEFAULT_WELCOME_DELAY_MS: u64 = 500;

/// Settings for talking to the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin the `/auth/login` and `/chat` paths are resolved against.
    pub base_url: String,
    /// Bot line shown after a successful login.
    pub welcome_message: String,
    /// Delay between the login confirmation and the welcome line.
    pub welcome_delay_ms: u64,
    /// Per-request timeout.  `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            welcome_message: DEFAULT_WELCOME.to_owned(),
            welcome_delay_ms: DEFAULT_WELCOME_DELAY_MS,
            request_timeout_secs: None,
            user_agent: format!("popchat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Apply `POPCHAT_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `POPCHAT_*` overrides using `lookup` to read variables.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("POPCHAT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(ms) = lookup("POPCHAT_WELCOME_DELAY_MS") {
            self.welcome_delay_ms = parse_number("POPCHAT_WELCOME_DELAY_MS", &ms)?;
        }
        if let Some(secs) = lookup("POPCHAT_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_number("POPCHAT_REQUEST_TIMEOUT_SECS", &secs)?);
        }
        self.validate()
    }

    /// Check that the base URL is usable.
    pub fn validate(&self) -> Result<()> {
        self.endpoint(LOGIN_PATH).map(|_| ())
    }

    /// Resolve an absolute endpoint path (such as [`CHAT_PATH`]) against the
    /// base URL.  Any path on the base URL is replaced, matching how a page
    /// resolves root-relative links.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "url cannot be used as a base".into(),
            });
        }
        base.join(path).map_err(|e| ClientError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// The login-to-welcome delay as a [`Duration`].
    pub fn welcome_delay(&self) -> Duration {
        Duration::from_millis(self.welcome_delay_ms)
    }

    /// The per-request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| ClientError::Config {
        reason: format!("{key} must be a non-negative integer, got `{value}`"),
    })
}
