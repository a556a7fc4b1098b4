//! Remote-backed membership lists with optimistic toggles.
//!
//! Per session the state machine is Unloaded → Loading → Loaded, driven by
//! one remote read of all four lists. A toggle flips local state first so
//! the UI never waits on the network, then performs the remote write; if
//! the write fails the flip is reverted — unless a newer toggle has taken
//! over the (shelf, volume) pair in the meantime, tracked by a generation
//! counter per pair.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shelf_core::{
  Error, Result, Shelf, ShelfSets, UserId, VolumeId, store::ProfileStore,
};
use tracing::{debug, warn};

/// Load progress for a subject's shelf document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
  #[default]
  Unloaded,
  Loading,
  Loaded,
}

#[derive(Default)]
struct ShelfState {
  phase:       LoadPhase,
  sets:        ShelfSets,
  /// Bumped on every toggle of a (shelf, volume) pair. A failed remote
  /// write only reverts the optimistic flip when its generation is still
  /// current.
  generations: HashMap<(Shelf, VolumeId), u64>,
}

/// The per-session membership store.
pub struct Shelves<S> {
  store: Arc<S>,
  state: Mutex<ShelfState>,
}

impl<S> Shelves<S>
where
  S: ProfileStore,
{
  pub fn new(store: Arc<S>) -> Self {
    Self { store, state: Mutex::default() }
  }

  /// The lock never spans an await; a poisoned lock still guards
  /// consistent state, so recover the guard.
  fn locked(&self) -> MutexGuard<'_, ShelfState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn phase(&self) -> LoadPhase { self.locked().phase }

  /// Fetch the subject's four lists as one remote read, replacing any
  /// local state. On failure the store drops back to `Unloaded`.
  pub async fn load(&self, user: &UserId) -> Result<()> {
    self.locked().phase = LoadPhase::Loading;
    match self.store.fetch_shelves(user).await {
      Ok(sets) => {
        debug!(%user, "shelves loaded");
        let mut state = self.locked();
        state.sets = sets;
        state.generations.clear();
        state.phase = LoadPhase::Loaded;
        Ok(())
      }
      Err(e) => {
        warn!(%user, error = %e, "shelf load failed");
        self.locked().phase = LoadPhase::Unloaded;
        Err(e)
      }
    }
  }

  /// Flip membership of `volume` on `shelf`: add if absent, remove if
  /// present. The flip is applied locally before the remote write is
  /// dispatched, so [`contains`](Self::contains) reflects it immediately.
  ///
  /// Requires the loaded state; fails with [`Error::NotAuthenticated`]
  /// otherwise. On [`Error::RemoteWriteFailed`] the local flip is
  /// reverted and the error propagates so the caller can offer a retry.
  ///
  /// Returns the new (optimistic, and on `Ok` confirmed) membership.
  pub async fn toggle(
    &self,
    user: &UserId,
    volume: &VolumeId,
    shelf: Shelf,
  ) -> Result<bool> {
    let (added, generation) = {
      let mut state = self.locked();
      if state.phase != LoadPhase::Loaded {
        return Err(Error::NotAuthenticated);
      }
      let added = state.sets.toggle(shelf, volume);
      let generation = state
        .generations
        .entry((shelf, volume.clone()))
        .and_modify(|g| *g += 1)
        .or_insert(1);
      (added, *generation)
    };
    debug!(%user, %shelf, %volume, added, "optimistic toggle");

    let write = if added {
      self.store.add_to_shelf(user, shelf, volume).await
    } else {
      self.store.remove_from_shelf(user, shelf, volume).await
    };

    if let Err(e) = write {
      warn!(%user, %shelf, %volume, error = %e, "shelf write failed");
      let mut state = self.locked();
      let current = state
        .generations
        .get(&(shelf, volume.clone()))
        .copied()
        .unwrap_or(0);
      // Only revert if no newer toggle owns this pair.
      if current == generation {
        state.sets.toggle(shelf, volume);
      }
      return Err(e);
    }

    Ok(added)
  }

  /// Pure local membership read; never blocks on the network.
  pub fn contains(&self, volume: &VolumeId, shelf: Shelf) -> bool {
    self.locked().sets.contains(shelf, volume)
  }

  /// Snapshot of all four lists for derivation.
  pub fn snapshot(&self) -> ShelfSets { self.locked().sets.clone() }

  /// Discard all per-subject state, returning to `Unloaded`.
  pub fn reset(&self) {
    let mut state = self.locked();
    *state = ShelfState::default();
  }
}
