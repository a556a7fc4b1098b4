//! The shared error taxonomy for `shelf`.
//!
//! The taxonomy is closed on purpose: every failure a caller can see falls
//! into one of these buckets, and every one of them is recoverable by a
//! caller-level retry or user re-action. Backends map their internal errors
//! into it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The catalog fetch failed (network error or non-success status).
  /// Per-identifier and non-fatal: re-invoking `resolve` retries.
  #[error("catalog unavailable: {message}")]
  CatalogUnavailable {
    /// HTTP status, when the request made it far enough to have one.
    status:  Option<u16>,
    message: String,
  },

  /// A mutation was attempted without an active subject.
  #[error("not authenticated")]
  NotAuthenticated,

  /// A review rating outside the accepted 1..=5 range.
  #[error("invalid rating {0}: must be between 1 and 5")]
  InvalidRating(u8),

  /// A shelf toggle or review submission failed at the remote store.
  #[error("remote write failed: {0}")]
  RemoteWriteFailed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
