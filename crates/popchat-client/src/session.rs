//! Login state.

use std::fmt;

/// Where the user is in the login flow.
///
/// The bearer token is held only in [`SessionState::LoggedIn`], so there is
/// no way to observe a token while logged out.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No token and no login form requested yet.
    #[default]
    LoggedOut,
    /// The login form is showing.
    AwaitingLogin,
    /// A bearer token from a successful login is held.
    LoggedIn { token: String },
}

impl SessionState {
    /// Ask for credentials unless a token is already held.
    ///
    /// Returns `true` when the state moved to [`SessionState::AwaitingLogin`].
    pub fn request_login(&mut self) -> bool {
        match self {
            Self::LoggedOut => {
                *self = Self::AwaitingLogin;
                true
            }
            Self::AwaitingLogin => true,
            Self::LoggedIn { .. } => false,
        }
    }

    /// Store the token returned by a successful login.
    pub fn establish(&mut self, token: impl Into<String>) {
        *self = Self::LoggedIn {
            token: token.into(),
        };
    }

    /// Drop the token and show the login form again.
    pub fn expire(&mut self) {
        *self = Self::AwaitingLogin;
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::LoggedIn { token } => Some(token),
            _ => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => f.write_str("LoggedOut"),
            Self::AwaitingLogin => f.write_str("AwaitingLogin"),
            Self::LoggedIn { .. } => f
                .debug_struct("LoggedIn")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_moves_to_awaiting_login() {
        let mut s = SessionState::default();
        assert!(s.request_login());
        assert_eq!(s, SessionState::AwaitingLogin);
        assert!(s.token().is_none());
    }

    #[test]
    fn logged_in_does_not_reopen_login() {
        let mut s = SessionState::default();
        s.establish("tok");
        assert!(!s.request_login());
        assert_eq!(s.token(), Some("tok"));
    }

    #[test]
    fn expire_clears_token() {
        let mut s = SessionState::default();
        s.establish("tok");
        s.expire();
        assert_eq!(s, SessionState::AwaitingLogin);
        assert!(!s.is_logged_in());
    }

    #[test]
    fn debug_redacts_token() {
        let mut s = SessionState::default();
        s.establish("secret-token");
        let shown = format!("{s:?}");
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("LoggedIn"));
    }
}
