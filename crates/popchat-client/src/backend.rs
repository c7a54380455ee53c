//! The chat backend boundary.
//!
//! [`ChatBackend`] is the seam between the controller and the network.
//! [`HttpBackend`] speaks the JSON-over-HTTP protocol:
//!
//! - `POST /auth/login` with `{username, password}`, answering
//!   `{status, access_token}`.
//! - `POST /chat` with `Authorization: Bearer <token>` and `{message}`,
//!   answering `{reply}`.
//!
//! The backend reports what the server said (status code plus decoded body)
//! and leaves the interpretation to the controller.  Only transport failures
//! and bodies that are not JSON at all are errors.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{CHAT_PATH, ClientConfig, LOGIN_PATH};
use crate::error::{ClientError, Result};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Login credentials.  The password never appears in `Debug` output.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decoded body of a login response.  Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// What the login endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginReply {
    pub http_status: u16,
    pub body: LoginBody,
}

impl LoginReply {
    /// The bearer token, if this reply is a successful login.
    ///
    /// Success requires a 2xx status, `status == "success"`, and a token.
    pub fn token(&self) -> Option<&str> {
        let ok = (200..300).contains(&self.http_status)
            && self.body.status.as_deref() == Some("success");
        if ok {
            self.body.access_token.as_deref()
        } else {
            None
        }
    }
}

/// What the chat endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub http_status: u16,
    /// The `reply` field when it is present and a string.
    pub reply: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Transport used by the chat controller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submit credentials to the login endpoint.
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply>;

    /// Send one chat message with the bearer token.
    async fn chat(&self, token: &str, message: &str) -> Result<ChatReply>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// [`ChatBackend`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    login_url: url::Url,
    chat_url: url::Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            login_url: config.endpoint(LOGIN_PATH)?,
            chat_url: config.endpoint(CHAT_PATH)?,
        })
    }

    /// Read the body as JSON.  An unparseable body is an error whatever the
    /// status code.
    async fn read_json(response: reqwest::Response, endpoint: &'static str) -> Result<(u16, Value)> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let value = serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse {
            endpoint,
            reason: e.to_string(),
        })?;
        Ok((status, value))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply> {
        tracing::debug!(username = %credentials.username, url = %self.login_url, "posting login");
        let response = self
            .client
            .post(self.login_url.clone())
            .json(credentials)
            .send()
            .await?;
        let (http_status, value) = Self::read_json(response, LOGIN_PATH).await?;
        Ok(LoginReply {
            http_status,
            body: login_body(&value),
        })
    }

    async fn chat(&self, token: &str, message: &str) -> Result<ChatReply> {
        tracing::debug!(url = %self.chat_url, len = message.len(), "posting chat message");
        let response = self
            .client
            .post(self.chat_url.clone())
            .bearer_auth(token)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let (http_status, value) = Self::read_json(response, CHAT_PATH).await?;
        Ok(ChatReply {
            http_status,
            reply: value.get("reply").and_then(Value::as_str).map(str::to_owned),
        })
    }
}

/// Pull the string fields out of a login body, ignoring anything else.
fn login_body(value: &Value) -> LoginBody {
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);
    LoginBody {
        status: field("status"),
        access_token: field("access_token"),
    }
}
