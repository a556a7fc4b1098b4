//! In-memory implementation of [`ProfileStore`].

use std::collections::HashMap;

use shelf_core::{
  Error, Result, Review, Shelf, ShelfSets, UserId, VolumeId,
  store::{ProfileStore, ReviewReceiver},
};
use tokio::sync::{Mutex, watch};
use tracing::debug;

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  /// One shelf document per user, created on first read.
  shelves:     HashMap<UserId, ShelfSets>,
  /// The append-only review ledger, in server-assigned (insertion) order.
  reviews:     Vec<Review>,
  /// Live feed senders, one per volume that has ever been subscribed.
  feeds:       HashMap<VolumeId, watch::Sender<Vec<Review>>>,
  /// When set, every write fails with `RemoteWriteFailed`. Used by tests
  /// to exercise optimistic-update reconciliation.
  fail_writes: bool,
}

impl Inner {
  /// All reviews for `volume`, newest first. Insertion order breaks
  /// creation-time ties, which keeps feed ordering stable.
  fn reviews_for_volume(&self, volume: &VolumeId) -> Vec<Review> {
    let mut out: Vec<Review> = self
      .reviews
      .iter()
      .filter(|r| &r.volume_id == volume)
      .cloned()
      .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
  }

  fn check_writable(&self) -> Result<()> {
    if self.fail_writes {
      Err(Error::RemoteWriteFailed("memory store write disabled".into()))
    } else {
      Ok(())
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A profile store living entirely in process memory.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: std::sync::Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent write fail with
  /// [`Error::RemoteWriteFailed`] (or succeed again when `fail` is
  /// `false`). Reads are unaffected.
  pub async fn set_fail_writes(&self, fail: bool) {
    self.inner.lock().await.fail_writes = fail;
  }

  /// Total number of reviews in the ledger, across all volumes and users.
  pub async fn review_count(&self) -> usize {
    self.inner.lock().await.reviews.len()
  }
}

impl ProfileStore for MemoryStore {
  async fn fetch_shelves(&self, user: &UserId) -> Result<ShelfSets> {
    let mut inner = self.inner.lock().await;
    // Create-if-absent: first fetch mints an empty document.
    Ok(inner.shelves.entry(user.clone()).or_default().clone())
  }

  async fn add_to_shelf(
    &self,
    user: &UserId,
    shelf: Shelf,
    volume: &VolumeId,
  ) -> Result<()> {
    let mut inner = self.inner.lock().await;
    inner.check_writable()?;
    let sets = inner.shelves.entry(user.clone()).or_default();
    sets.insert(shelf, volume.clone());
    debug!(%user, %shelf, %volume, "added to shelf");
    Ok(())
  }

  async fn remove_from_shelf(
    &self,
    user: &UserId,
    shelf: Shelf,
    volume: &VolumeId,
  ) -> Result<()> {
    let mut inner = self.inner.lock().await;
    inner.check_writable()?;
    let sets = inner.shelves.entry(user.clone()).or_default();
    sets.remove(shelf, volume);
    debug!(%user, %shelf, %volume, "removed from shelf");
    Ok(())
  }

  async fn submit_review(&self, review: &Review) -> Result<()> {
    let mut inner = self.inner.lock().await;
    inner.check_writable()?;
    inner.reviews.push(review.clone());
    debug!(volume = %review.volume_id, rating = review.rating.get(), "review appended");

    // Push the updated list to the volume's feed. `send_replace` updates
    // the channel value even while no receiver is alive, so a later
    // subscriber still starts from the current list.
    if let Some(sender) = inner.feeds.get(&review.volume_id) {
      let latest = inner.reviews_for_volume(&review.volume_id);
      sender.send_replace(latest);
    }
    Ok(())
  }

  async fn reviews_for_user(&self, user: &UserId) -> Result<Vec<Review>> {
    let inner = self.inner.lock().await;
    let mut out: Vec<Review> = inner
      .reviews
      .iter()
      .filter(|r| &r.user_id == user)
      .cloned()
      .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(out)
  }

  async fn subscribe_reviews(&self, volume: &VolumeId) -> Result<ReviewReceiver> {
    let mut inner = self.inner.lock().await;
    let current = inner.reviews_for_volume(volume);
    let sender = inner
      .feeds
      .entry(volume.clone())
      .or_insert_with(|| watch::channel(Vec::new()).0);
    // Seed the channel with the current list before handing out the
    // receiver. This must not be a plain `send`: a fresh or fully-dropped
    // channel has no receivers, and `send` discards the value then.
    if !current.is_empty() {
      sender.send_replace(current);
    }
    Ok(sender.subscribe())
  }
}
