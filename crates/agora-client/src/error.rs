//! Error types for the AgoraNet client.

use thiserror::Error;

/// Errors that can occur in client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The external signer could not be spawned or its channel broke down.
    #[error("signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The signer responded but the payload was malformed or reported failure.
    #[error("signer protocol error: {0}")]
    SignerProtocol(String),

    /// The verification endpoint rejected the auth payload or returned no token.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A business endpoint returned a non-success status after any applicable retry.
    #[error("request failed with status {status}: {body}")]
    RequestFailed {
        /// HTTP status code of the failing response.
        status: u16,
        /// Raw server error body.
        body: String,
    },

    /// Network-level failure (DNS, connection refused, timeout). Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The x402 payment challenge was missing or malformed.
    #[error("payment error: {0}")]
    Payment(String),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
