//! Error types for the bot API client.
//!
//! # Design
//! Transport-level failures get their own variant so callers can tell "the
//! server never answered" apart from "the server answered with an error" or
//! from a legitimately empty response. Decode failures are surfaced loudly
//! rather than handed back as an opaque empty result.

use thiserror::Error;

/// Errors returned by [`BotClient`](crate::BotClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response: connection refused or
    /// reset, timeout, malformed address, or another I/O failure.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Login was rejected, or the login response carried no usable token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The response body was not the JSON shape the endpoint promises.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
