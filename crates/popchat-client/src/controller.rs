//! The chat controller: session, transcript and input focus for one popup.
//!
//! The controller is owned by a single UI task.  Network calls are split
//! into a synchronous start and a synchronous finish so the front end can
//! run the call on a spawned task and feed the result back:
//!
//! ```text
//! begin_send ──► backend.chat (spawned) ──► finish_send
//! backend.login (spawned) ──► finish_login ──► sleep(welcome_delay) ──► deliver_welcome
//! ```
//!
//! [`ChatController::submit_login`] and [`ChatController::send_message`]
//! chain those steps inline for callers that can await in place.

use std::sync::Arc;

use crate::backend::{ChatBackend, ChatReply, Credentials, LoginReply};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::message::Message;
use crate::session::SessionState;
use crate::transcript::Transcript;

/// System line appended after a successful login.
pub const LOGIN_SUCCEEDED: &str = "✅ Login successful! You can now proceed.";
/// System line appended when the backend rejects the credentials.
pub const LOGIN_REJECTED: &str = "❌ Login failed. Try again.";
/// System line appended when the login request itself fails.
pub const LOGIN_ERROR: &str = "⚠️ An error occurred. Please try again.";
/// System line appended when a send finds no token.
pub const SESSION_EXPIRED: &str = "🔒 Session expired. Please login again.";
/// System line appended when a chat request fails.
pub const SEND_FAILED: &str = "⚠️ Could not send message.";

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Input field that receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Username,
    Password,
    Message,
}

/// Which parts of the popup are showing and where input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub popup_open: bool,
    pub login_visible: bool,
    pub focus: FocusTarget,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            popup_open: false,
            login_visible: false,
            focus: FocusTarget::Message,
        }
    }
}

/// What the front end should do after Enter was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    /// Focus moved; nothing else to do.
    FocusMoved,
    /// Submit the login form.
    SubmitLogin,
    /// Send the message field.
    Send,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a finished login request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored; the welcome line is due after the configured delay.
    Succeeded,
    /// The backend said no.
    Rejected,
    /// The request or its decoding failed.
    Failed,
}

/// A chat request that has been recorded but not yet issued.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub token: String,
    pub message: String,
}

impl std::fmt::Debug for PendingSend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSend")
            .field("token", &"<redacted>")
            .field("message", &self.message)
            .finish()
    }
}

/// Result of [`ChatController::begin_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStart {
    /// Blank input; nothing happened.
    Ignored,
    /// The message was recorded but there is no token; the login form is
    /// showing again.
    NeedsLogin,
    /// The message was recorded and a typing placeholder is showing.
    Pending(PendingSend),
}

/// Result of [`ChatController::finish_send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Replied,
    Failed,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the session token, the transcript and the popup's view state.
pub struct ChatController {
    config: ClientConfig,
    backend: Arc<dyn ChatBackend>,
    session: SessionState,
    transcript: Transcript,
    view: ViewState,
}

impl ChatController {
    pub fn new(config: ClientConfig, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            config,
            backend,
            session: SessionState::default(),
            transcript: Transcript::new(),
            view: ViewState::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A handle to the backend for spawned requests.
    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn focus(&mut self, target: FocusTarget) {
        self.view.focus = target;
    }

    // -- popup ---------------------------------------------------------------

    /// Open or close the popup.  Opening without a token shows the login
    /// form with the username field focused.  Returns whether the popup is
    /// now open.
    pub fn toggle_popup(&mut self) -> bool {
        self.view.popup_open = !self.view.popup_open;
        if self.view.popup_open && self.session.request_login() {
            self.view.login_visible = true;
            self.view.focus = FocusTarget::Username;
        }
        tracing::debug!(open = self.view.popup_open, "popup toggled");
        self.view.popup_open
    }

    /// Handle Enter in the focused field.
    pub fn enter_pressed(&mut self) -> EnterAction {
        match self.view.focus {
            FocusTarget::Username => {
                self.view.focus = FocusTarget::Password;
                EnterAction::FocusMoved
            }
            FocusTarget::Password => EnterAction::SubmitLogin,
            FocusTarget::Message => EnterAction::Send,
        }
    }

    // -- login ---------------------------------------------------------------

    /// Apply the result of a login request.
    pub fn finish_login(&mut self, result: Result<LoginReply>) -> LoginOutcome {
        match result {
            Ok(reply) => match reply.token() {
                Some(token) => {
                    self.session.establish(token);
                    self.view.login_visible = false;
                    self.transcript.push(Message::system(LOGIN_SUCCEEDED));
                    tracing::info!("login succeeded");
                    LoginOutcome::Succeeded
                }
                None => {
                    self.transcript.push(Message::system(LOGIN_REJECTED));
                    tracing::info!(
                        http_status = reply.http_status,
                        status = reply.body.status.as_deref().unwrap_or("<none>"),
                        "login rejected"
                    );
                    LoginOutcome::Rejected
                }
            },
            Err(err) => {
                self.transcript.push(Message::system(LOGIN_ERROR));
                tracing::warn!(error = %err, "login request failed");
                LoginOutcome::Failed
            }
        }
    }

    /// Append the welcome line and focus the message field.
    ///
    /// Does nothing if the session is no longer logged in.
    pub fn deliver_welcome(&mut self) {
        if !self.session.is_logged_in() {
            return;
        }
        self.transcript
            .push(Message::bot(self.config.welcome_message.clone()));
        self.view.focus = FocusTarget::Message;
    }

    /// Log in and, on success, wait the welcome delay and deliver the
    /// welcome line.
    pub async fn submit_login(&mut self, credentials: &Credentials) -> LoginOutcome {
        tracing::debug!(username = %credentials.username, "submitting login");
        let result = self.backend.login(credentials).await;
        let outcome = self.finish_login(result);
        if outcome == LoginOutcome::Succeeded {
            tokio::time::sleep(self.config.welcome_delay()).await;
            self.deliver_welcome();
        }
        outcome
    }

    // -- send ----------------------------------------------------------------

    /// Record a message for sending.
    ///
    /// Blank input is ignored.  Otherwise the trimmed text is appended as a
    /// user line; without a token the session expires and the login form is
    /// shown, with a token a typing placeholder is shown and the request is
    /// returned for the caller to issue.
    pub fn begin_send(&mut self, input: &str) -> SendStart {
        let message = input.trim();
        if message.is_empty() {
            return SendStart::Ignored;
        }
        self.transcript.push(Message::user(message));

        let Some(token) = self.session.token().map(str::to_owned) else {
            self.transcript.push(Message::system(SESSION_EXPIRED));
            self.session.expire();
            self.view.login_visible = true;
            self.view.focus = FocusTarget::Username;
            tracing::info!("send attempted without a session");
            return SendStart::NeedsLogin;
        };

        self.transcript.show_typing();
        SendStart::Pending(PendingSend {
            token,
            message: message.to_owned(),
        })
    }

    /// Apply the result of a chat request.
    ///
    /// The typing placeholder is removed on every path.  Any failure,
    /// including an authentication failure, appends the same generic line.
    pub fn finish_send(&mut self, result: Result<ChatReply>) -> SendOutcome {
        self.transcript.hide_typing();
        match result {
            Ok(ChatReply {
                reply: Some(reply), ..
            }) => {
                self.transcript.push(Message::bot(reply));
                SendOutcome::Replied
            }
            Ok(ChatReply {
                http_status,
                reply: None,
            }) => {
                self.transcript.push(Message::system(SEND_FAILED));
                tracing::warn!(http_status, "chat response had no reply");
                SendOutcome::Failed
            }
            Err(err) => {
                self.transcript.push(Message::system(SEND_FAILED));
                tracing::warn!(error = %err, "chat request failed");
                SendOutcome::Failed
            }
        }
    }

    /// Send one message and wait for its reply.  Returns `None` when nothing
    /// was sent.
    pub async fn send_message(&mut self, input: &str) -> Option<SendOutcome> {
        let SendStart::Pending(pending) = self.begin_send(input) else {
            return None;
        };
        let result = self.backend.chat(&pending.token, &pending.message).await;
        Some(self.finish_send(result))
    }
}

impl std::fmt::Debug for ChatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("session", &self.session)
            .field("messages", &self.transcript.len())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
