//! The `CatalogSource` trait: the external, read-only book catalog.
//!
//! Implemented by `shelf-catalog` over HTTP; tests implement it with
//! scripted stubs. Failures surface as
//! [`Error::CatalogUnavailable`](crate::Error::CatalogUnavailable) and are
//! never retried inside a call — the caller decides whether to re-invoke.
//!
//! All methods return `Send` futures so the trait can be used from
//! multi-threaded tokio runtimes.

use std::future::Future;

use crate::{Result, book::{Book, VolumeId}};

/// Abstraction over the external catalog service. Read-only, no auth.
pub trait CatalogSource: Send + Sync {
  /// Free-text search (title, author, ISBN…), returning at most
  /// `max_results` volumes. An empty result is not an error.
  fn search<'a>(
    &'a self,
    term: &'a str,
    max_results: u32,
  ) -> impl Future<Output = Result<Vec<Book>>> + Send + 'a;

  /// Fetch the full record for a single volume.
  fn fetch_by_id<'a>(
    &'a self,
    id: &'a VolumeId,
  ) -> impl Future<Output = Result<Book>> + Send + 'a;
}
