//! One subject's view of the whole sync core.
//!
//! The session is the explicit object the authentication glue drives:
//! its change notification calls [`sign_in`](SyncSession::sign_in),
//! [`sign_out`](SyncSession::sign_out), or
//! [`suspend`](SyncSession::suspend), and the session performs the
//! corresponding state reset. Per-subject state is always discarded on a
//! subject change, never merged; the resolver cache is subject-independent
//! and survives every transition.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelf_core::{
  Error, Result, Review, Shelf, ShelfSets, UserId, VolumeId,
  catalog::CatalogSource, store::ProfileStore,
};
use tracing::debug;

use crate::{
  dashboard::{self, ActivityEntry, ReviewStats},
  ledger::{ReviewFeed, ReviewLedger},
  resolver::{Resolution, Resolver},
  shelves::Shelves,
};

#[derive(Default)]
struct SubjectState {
  /// The subject allowed to mutate right now.
  active: Option<UserId>,
  /// The subject whose shelves/reviews are currently held locally. Differs
  /// from `active` only while suspended.
  loaded: Option<UserId>,
}

/// The synchronization core bound to (at most) one authenticated subject.
pub struct SyncSession<C, S> {
  resolver: Resolver<C>,
  shelves:  Shelves<S>,
  ledger:   ReviewLedger<S>,
  subject:  Mutex<SubjectState>,
}

impl<C, S> SyncSession<C, S>
where
  C: CatalogSource + 'static,
  S: ProfileStore,
{
  pub fn new(catalog: Arc<C>, store: Arc<S>) -> Self {
    Self {
      resolver: Resolver::new(catalog),
      shelves:  Shelves::new(Arc::clone(&store)),
      ledger:   ReviewLedger::new(store),
      subject:  Mutex::default(),
    }
  }

  fn locked(&self) -> MutexGuard<'_, SubjectState> {
    self.subject.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// The currently active subject, if any.
  pub fn subject(&self) -> Option<UserId> { self.locked().active.clone() }

  // ── Subject lifecycle ─────────────────────────────────────────────────

  /// Activate `user`: load their shelf document (one remote read) and
  /// seed their own reviews for aggregation.
  ///
  /// Re-activating the subject whose state is still held (after
  /// [`suspend`](Self::suspend)) resumes without refetching. A different
  /// subject always discards the previous one's state first.
  pub async fn sign_in(&self, user: UserId) -> Result<()> {
    {
      let mut subject = self.locked();
      if subject.loaded.as_ref() == Some(&user) {
        subject.active = Some(user);
        debug!("session resumed");
        return Ok(());
      }
      // A different subject: nobody is active while we reload.
      subject.active = None;
      subject.loaded = None;
    }
    self.shelves.reset();
    self.ledger.reset();

    debug!(%user, "signing in");
    self.shelves.load(&user).await?;
    self.ledger.seed(&user).await?;

    let mut subject = self.locked();
    subject.active = Some(user.clone());
    subject.loaded = Some(user);
    Ok(())
  }

  /// Explicit sign-out: discard all per-subject state.
  pub fn sign_out(&self) {
    debug!("signing out");
    {
      let mut subject = self.locked();
      subject.active = None;
      subject.loaded = None;
    }
    self.shelves.reset();
    self.ledger.reset();
  }

  /// The subject became inactive without an explicit sign-out (e.g. an
  /// expired credential). Mutations fail with
  /// [`Error::NotAuthenticated`] until re-activation, but local state is
  /// retained so the same subject resumes seamlessly.
  pub fn suspend(&self) {
    debug!("session suspended");
    self.locked().active = None;
  }

  // ── Resolution ────────────────────────────────────────────────────────

  /// Materialize records for `ids` through the shared resolver cache.
  pub async fn resolve(&self, ids: &[VolumeId]) -> Resolution {
    self.resolver.resolve(ids).await
  }

  /// Resolve every volume the session currently references (all shelves
  /// plus all visible reviews) — the dashboard's refresh step.
  pub async fn resolve_referenced(&self) -> Resolution {
    let ids = self.referenced_ids();
    self.resolver.resolve(&ids).await
  }

  pub fn resolver(&self) -> &Resolver<C> { &self.resolver }

  // ── Shelves ───────────────────────────────────────────────────────────

  /// Optimistically flip membership of `volume` on `shelf` for the active
  /// subject. See [`Shelves::toggle`].
  pub async fn toggle(&self, volume: &VolumeId, shelf: Shelf) -> Result<bool> {
    let user = self.subject().ok_or(Error::NotAuthenticated)?;
    self.shelves.toggle(&user, volume, shelf).await
  }

  /// Pure local membership read.
  pub fn contains(&self, volume: &VolumeId, shelf: Shelf) -> bool {
    self.shelves.contains(volume, shelf)
  }

  pub fn shelf_snapshot(&self) -> ShelfSets { self.shelves.snapshot() }

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Append a review for `volume` as the active subject. The local mirror
  /// is not touched; the review becomes visible through the volume's feed.
  pub async fn submit_review(
    &self,
    volume: &VolumeId,
    rating: u8,
    comment: Option<String>,
  ) -> Result<Review> {
    let user = self.subject();
    self.ledger.submit(user.as_ref(), volume, rating, comment).await
  }

  /// Open a live feed of `volume`'s reviews. Dropping the returned feed
  /// unsubscribes.
  pub async fn subscribe_reviews(
    &self,
    volume: &VolumeId,
  ) -> Result<ReviewFeed> {
    self.ledger.subscribe(volume).await
  }

  /// Local mirror of one volume's reviews, newest first.
  pub fn reviews_for(&self, volume: &VolumeId) -> Vec<Review> {
    self.ledger.reviews_for(volume)
  }

  // ── Dashboard derivations ─────────────────────────────────────────────

  /// Union of every referenced volume id: all shelves plus all visible
  /// reviews.
  pub fn referenced_ids(&self) -> Vec<VolumeId> {
    dashboard::referenced_ids(&self.shelves.snapshot(), &self.ledger.snapshot())
  }

  /// Review count and mean rating over everything visible.
  pub fn statistics(&self) -> ReviewStats {
    dashboard::statistics(&self.ledger.snapshot())
  }

  /// The most recent reviews with resolved books, newest first.
  pub fn recent_activity(&self, limit: usize) -> Vec<ActivityEntry> {
    dashboard::recent_activity(&self.ledger.snapshot(), limit, |id| {
      self.resolver.peek(id)
    })
  }

  /// Resolved books currently on `shelf`, in insertion order.
  pub fn shelf_view(&self, shelf: Shelf) -> Vec<Arc<shelf_core::Book>> {
    dashboard::shelf_view(&self.shelves.snapshot(), shelf, |id| {
      self.resolver.peek(id)
    })
  }
}
