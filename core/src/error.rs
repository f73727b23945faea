//! Error types for the netapi client.
//!
//! # Design
//! A non-200 status is not an error: it comes back as a normal `NetResponse`
//! with an empty payload. Neither is a successful body that fails to parse as
//! JSON. Only terminal outcomes of a single call land here: the transport
//! failed, the timeout elapsed, or a typed decode of the payload did not fit.

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type NetResult<T> = Result<T, NetError>;

/// Errors returned by `NetApi` calls and typed payload access.
#[derive(Debug, Error)]
pub enum NetError {
    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The call did not complete within the requested timeout and was aborted.
    #[error("request aborted after {after:?}")]
    Timeout { after: Duration },

    /// A request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A JSON payload could not be deserialized into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Typed access asked for a payload shape the response does not carry.
    #[error("expected {expected} payload, found {found}")]
    UnexpectedPayload {
        expected: &'static str,
        found: &'static str,
    },
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    timed_out: bool,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: None,
        }
    }

    /// Wrap an underlying client error, keeping it as the `source()`.
    pub fn with_source(message: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
            source: Some(Box::new(source)),
        }
    }

    /// The client gave up waiting on its own deadline.
    pub fn timed_out(message: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            timed_out: true,
            ..Self::with_source(message, source)
        }
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure reported by a `CacheStore` or `CacheBucket`.
///
/// The buffer fetch never surfaces these to its caller; it falls back to the
/// network instead.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache backend error: {0}")]
    Backend(String),
}
