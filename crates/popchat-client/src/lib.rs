//! Client side of the popchat widget.
//!
//! This crate holds everything except drawing:
//!
//! - [`ChatController`] owns the login session, the transcript and the
//!   popup's input focus, and drives the login and send flows.
//! - [`ChatBackend`] is the network seam; [`HttpBackend`] implements it with
//!   `reqwest` against the `/auth/login` and `/chat` endpoints.
//! - [`GeometryController`] applies drag and resize gestures to the popup.
//!
//! Front ends own a controller, forward key and pointer events to it, and
//! run backend calls on spawned tasks.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod message;
pub mod session;
pub mod transcript;

pub use backend::{ChatBackend, ChatReply, Credentials, HttpBackend, LoginReply};
pub use config::ClientConfig;
pub use controller::{
    ChatController, EnterAction, FocusTarget, LoginOutcome, PendingSend, SendOutcome, SendStart,
    ViewState,
};
pub use error::{ClientError, Result};
pub use geometry::{Bounds, GeometryController, Hit, Placement, Point, Popup, ResizeHandle, Size};
pub use message::{Message, Sender};
pub use session::SessionState;
pub use transcript::Transcript;
