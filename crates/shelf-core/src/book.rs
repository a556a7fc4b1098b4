//! The resolved representation of a catalog volume.
//!
//! A [`VolumeId`] is the join key across the whole system; it is never
//! interpreted, only compared. A [`Book`] is immutable once fetched: the
//! resolver hands out `Arc<Book>` and owns the only copies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier naming one catalog volume.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VolumeId(String);

impl VolumeId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for VolumeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for VolumeId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for VolumeId {
  fn from(s: String) -> Self { Self(s) }
}

/// Resolved metadata for one volume, sourced exclusively from the external
/// catalog. Fields mirror what the discovery UI actually renders; anything
/// the catalog may omit is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
  pub id:             VolumeId,
  pub title:          String,
  pub authors:        Vec<String>,
  pub publisher:      Option<String>,
  pub published_date: Option<String>,
  pub description:    Option<String>,
  pub page_count:     Option<u32>,
  pub categories:     Vec<String>,
  /// URL of the preferred cover image, when the catalog provides one.
  pub thumbnail:      Option<String>,
  pub language:       Option<String>,
  /// Catalog-wide rating statistics (not ours — see the review ledger for
  /// user-authored ratings).
  pub average_rating: Option<f64>,
  pub ratings_count:  Option<u32>,
  pub preview_link:   Option<String>,
}
