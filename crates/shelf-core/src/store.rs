//! The `ProfileStore` trait and the review feed contract.
//!
//! The trait abstracts the remote per-user document store: one shelf
//! document per user (four id lists with set semantics, created on first
//! read) plus an append-only collection of reviews, subscribable per
//! volume. `shelf-store-memory` implements it; a hosted document-store
//! backend would implement the same surface.
//!
//! Review feeds are [`tokio::sync::watch`] channels carrying the full
//! newest-first list for one volume. Watch semantics are deliberate: a
//! subscriber that falls behind sees only the latest list (intermediate
//! states coalesce), and dropping the receiver is the unsubscribe.

use std::future::Future;

use tokio::sync::watch;

use crate::{
  Result,
  book::VolumeId,
  review::Review,
  shelf::{Shelf, ShelfSets},
  user::UserId,
};

/// A live, coalescing feed of all reviews for one volume, newest first.
pub type ReviewReceiver = watch::Receiver<Vec<Review>>;

/// Abstraction over the remote per-user document store.
///
/// Write failures surface as
/// [`Error::RemoteWriteFailed`](crate::Error::RemoteWriteFailed); reads
/// that fail at the transport level may use the same variant — the caller
/// treats both as retryable.
pub trait ProfileStore: Send + Sync {
  /// Fetch all four shelf lists for `user` as one read, creating an empty
  /// document if the user has none yet.
  fn fetch_shelves<'a>(
    &'a self,
    user: &'a UserId,
  ) -> impl Future<Output = Result<ShelfSets>> + Send + 'a;

  /// Atomically add `volume` to `shelf` in the user's document. Adding an
  /// id that is already present is a no-op, not an error.
  fn add_to_shelf<'a>(
    &'a self,
    user: &'a UserId,
    shelf: Shelf,
    volume: &'a VolumeId,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Atomically remove `volume` from `shelf`. Removing an absent id is a
  /// no-op, not an error.
  fn remove_from_shelf<'a>(
    &'a self,
    user: &'a UserId,
    shelf: Shelf,
    volume: &'a VolumeId,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Append one immutable review to the ledger. Subscribers to the
  /// review's volume observe the update through their feeds.
  fn submit_review<'a>(
    &'a self,
    review: &'a Review,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// All reviews authored by `user`, newest first.
  fn reviews_for_user<'a>(
    &'a self,
    user: &'a UserId,
  ) -> impl Future<Output = Result<Vec<Review>>> + Send + 'a;

  /// Establish a push subscription for one volume's reviews. The receiver
  /// holds the current list immediately; dropping it releases the
  /// subscription.
  fn subscribe_reviews<'a>(
    &'a self,
    volume: &'a VolumeId,
  ) -> impl Future<Output = Result<ReviewReceiver>> + Send + 'a;
}
