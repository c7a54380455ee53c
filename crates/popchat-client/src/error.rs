//! Client error types.
//!
//! All client subsystems surface errors through [`ClientError`].  The chat
//! controller never shows these to the user directly; it logs them and
//! appends one of its fixed transcript lines instead.

/// Unified error type for the popchat client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a body that is not the expected JSON.
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Path of the endpoint that produced the body.
        endpoint: &'static str,
        /// Why decoding failed.
        reason: String,
    },

    /// The configured backend URL cannot be parsed or joined.
    #[error("invalid backend url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration could not be loaded or failed validation.
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the client crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_response() {
        let err = ClientError::InvalidResponse {
            endpoint: "/chat",
            reason: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid response from /chat: expected value at line 1 column 1"
        );
    }

    #[test]
    fn error_display_invalid_url() {
        let err = ClientError::InvalidUrl {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid backend url `nope`: relative URL without a base"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
