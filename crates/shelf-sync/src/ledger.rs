//! Append-only review submission and live feeds.
//!
//! Submission and visibility are deliberately decoupled: `submit` appends
//! to the remote store and touches no local state; the update arrives back
//! through the volume's feed, which mirrors into the ledger's local
//! snapshot for aggregation. A [`ReviewFeed`] is the cancellable handle.
//! Dropping it (or calling [`unsubscribe`](ReviewFeed::unsubscribe))
//! aborts the mirror task and releases the store subscription.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shelf_core::{
  Error, Rating, Result, Review, UserId, VolumeId,
  store::{ProfileStore, ReviewReceiver},
};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Default)]
struct LedgerState {
  /// Local mirror of every review list this session has seen, keyed by
  /// volume. Fed by subscriptions and by the sign-in seed.
  by_volume: HashMap<VolumeId, Vec<Review>>,
}

/// The per-session review ledger.
pub struct ReviewLedger<S> {
  store: Arc<S>,
  state: Arc<Mutex<LedgerState>>,
}

/// A live, coalescing feed of one volume's reviews, newest first.
///
/// Holds the subscription open for as long as it lives. If updates arrive
/// faster than the holder polls, intermediate lists are skipped; only
/// convergence to the latest list is guaranteed.
pub struct ReviewFeed {
  receiver: ReviewReceiver,
  mirror:   JoinHandle<()>,
}

impl ReviewFeed {
  /// The current list, newest first.
  pub fn latest(&self) -> Vec<Review> { self.receiver.borrow().clone() }

  /// Wait for the next change. Returns `false` if the store side closed
  /// the feed.
  pub async fn changed(&mut self) -> bool {
    self.receiver.changed().await.is_ok()
  }

  /// Explicit release; equivalent to dropping the feed.
  pub fn unsubscribe(self) {}
}

impl Drop for ReviewFeed {
  fn drop(&mut self) {
    // Stop mirroring; the receivers drop with us, releasing the
    // subscription at the store.
    self.mirror.abort();
  }
}

impl<S> ReviewLedger<S>
where
  S: ProfileStore,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, state: Arc::default() }
  }

  fn locked(&self) -> MutexGuard<'_, LedgerState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Append one immutable review for `volume`.
  ///
  /// Requires an authenticated subject and a rating in 1..=5. Does not
  /// update the local mirror; visibility arrives via the feed, keeping
  /// one source of truth for ordering.
  pub async fn submit(
    &self,
    user: Option<&UserId>,
    volume: &VolumeId,
    rating: u8,
    comment: Option<String>,
  ) -> Result<Review> {
    let user = user.ok_or(Error::NotAuthenticated)?;
    let rating = Rating::new(rating)?;
    let review =
      Review::new(user.clone(), volume.clone(), rating, comment);
    self.store.submit_review(&review).await?;
    debug!(%volume, rating = rating.get(), "review submitted");
    Ok(review)
  }

  /// Open a live feed of `volume`'s reviews and keep the local mirror in
  /// sync while the feed lives.
  pub async fn subscribe(&self, volume: &VolumeId) -> Result<ReviewFeed> {
    let receiver = self.store.subscribe_reviews(volume).await?;

    // Seed the mirror with the current list so derivations see it before
    // the first change fires.
    self
      .locked()
      .by_volume
      .insert(volume.clone(), receiver.borrow().clone());

    let mirror = {
      let mut rx = receiver.clone();
      let state = Arc::clone(&self.state);
      let volume = volume.clone();
      tokio::spawn(async move {
        while rx.changed().await.is_ok() {
          let latest = rx.borrow_and_update().clone();
          state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_volume
            .insert(volume.clone(), latest);
        }
      })
    };

    Ok(ReviewFeed { receiver, mirror })
  }

  /// Load the subject's own reviews into the mirror so aggregation covers
  /// them before any volume feed is opened.
  pub async fn seed(&self, user: &UserId) -> Result<()> {
    let reviews = self.store.reviews_for_user(user).await?;
    debug!(%user, count = reviews.len(), "seeded own reviews");
    let mut state = self.locked();
    for review in reviews {
      let list = state.by_volume.entry(review.volume_id.clone()).or_default();
      if !list.iter().any(|r| r.id == review.id) {
        list.push(review);
      }
    }
    // Keep per-volume lists newest first regardless of arrival order.
    for list in state.by_volume.values_mut() {
      list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    Ok(())
  }

  /// Local mirror of one volume's reviews, newest first.
  pub fn reviews_for(&self, volume: &VolumeId) -> Vec<Review> {
    self.locked().by_volume.get(volume).cloned().unwrap_or_default()
  }

  /// Every review currently visible to this session, flattened.
  pub fn snapshot(&self) -> Vec<Review> {
    self.locked().by_volume.values().flatten().cloned().collect()
  }

  /// Discard the local mirror. Live feeds keep working and will
  /// repopulate the volumes they watch on their next update.
  pub fn reset(&self) { self.locked().by_volume.clear(); }
}
