//! Immutable, append-only user commentary.
//!
//! A review is never edited or deleted once written; the ledger only grows.
//! Reviews are partitioned by the volume they describe and also queryable
//! flat per author for aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, book::VolumeId, user::UserId};

/// A star rating, guaranteed in 1..=5 by construction.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub fn new(value: u8) -> Result<Self> {
    if (1..=5).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::InvalidRating(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> u8 { r.0 }
}

/// One immutable rated comment about a volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub id:         Uuid,
  pub user_id:    UserId,
  pub volume_id:  VolumeId,
  pub rating:     Rating,
  pub comment:    Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Review {
  /// Build a new review stamped with a fresh id and the current time.
  pub fn new(
    user_id: UserId,
    volume_id: VolumeId,
    rating: Rating,
    comment: Option<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      user_id,
      volume_id,
      rating,
      comment,
      created_at: Utc::now(),
    }
  }
}
