//! The four independent membership categories.
//!
//! A shelf owns a duplicate-free, insertion-ordered list of volume ids
//! scoped to one user. A volume may sit on any subset of shelves at once;
//! there is no mutual exclusion between categories.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::book::VolumeId;

/// The closed set of membership categories.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Shelf {
  Favorites,
  Read,
  Queued,
  Wishlist,
}

/// All four shelf lists for one user, fetched from the remote store as a
/// single document read.
///
/// Lists preserve insertion order — shelf views iterate in the order books
/// were added. Membership checks are linear, which is fine at the sizes a
/// personal shelf reaches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelfSets {
  #[serde(default)]
  pub favorites: Vec<VolumeId>,
  #[serde(default)]
  pub read:      Vec<VolumeId>,
  #[serde(default)]
  pub queued:    Vec<VolumeId>,
  #[serde(default)]
  pub wishlist:  Vec<VolumeId>,
}

impl ShelfSets {
  pub fn ids(&self, shelf: Shelf) -> &[VolumeId] {
    match shelf {
      Shelf::Favorites => &self.favorites,
      Shelf::Read => &self.read,
      Shelf::Queued => &self.queued,
      Shelf::Wishlist => &self.wishlist,
    }
  }

  fn ids_mut(&mut self, shelf: Shelf) -> &mut Vec<VolumeId> {
    match shelf {
      Shelf::Favorites => &mut self.favorites,
      Shelf::Read => &mut self.read,
      Shelf::Queued => &mut self.queued,
      Shelf::Wishlist => &mut self.wishlist,
    }
  }

  pub fn contains(&self, shelf: Shelf, volume: &VolumeId) -> bool {
    self.ids(shelf).contains(volume)
  }

  /// Add `volume` to `shelf`. Returns `false` (and changes nothing) if it
  /// was already present — set semantics, no duplicates.
  pub fn insert(&mut self, shelf: Shelf, volume: VolumeId) -> bool {
    let ids = self.ids_mut(shelf);
    if ids.contains(&volume) {
      return false;
    }
    ids.push(volume);
    true
  }

  /// Remove `volume` from `shelf`. Returns `false` if it was not present.
  pub fn remove(&mut self, shelf: Shelf, volume: &VolumeId) -> bool {
    let ids = self.ids_mut(shelf);
    match ids.iter().position(|id| id == volume) {
      Some(i) => {
        ids.remove(i);
        true
      }
      None => false,
    }
  }

  /// Flip membership: add if absent, remove if present. Returns the new
  /// membership state.
  pub fn toggle(&mut self, shelf: Shelf, volume: &VolumeId) -> bool {
    if self.remove(shelf, volume) {
      false
    } else {
      self.insert(shelf, volume.clone());
      true
    }
  }

  /// Every volume id on any shelf, in shelf-then-insertion order, deduped.
  pub fn all_ids(&self) -> Vec<VolumeId> {
    let mut out: Vec<VolumeId> = Vec::new();
    for shelf in <Shelf as strum::IntoEnumIterator>::iter() {
      for id in self.ids(shelf) {
        if !out.contains(id) {
          out.push(id.clone());
        }
      }
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_is_idempotent() {
    let mut sets = ShelfSets::default();
    assert!(sets.insert(Shelf::Favorites, "b1".into()));
    assert!(!sets.insert(Shelf::Favorites, "b1".into()));
    assert_eq!(sets.favorites.len(), 1);
  }

  #[test]
  fn toggle_round_trips() {
    let mut sets = ShelfSets::default();
    let id: VolumeId = "b1".into();
    assert!(sets.toggle(Shelf::Wishlist, &id));
    assert!(sets.contains(Shelf::Wishlist, &id));
    assert!(!sets.toggle(Shelf::Wishlist, &id));
    assert!(!sets.contains(Shelf::Wishlist, &id));
  }

  #[test]
  fn shelves_are_independent() {
    let mut sets = ShelfSets::default();
    let id: VolumeId = "b1".into();
    sets.toggle(Shelf::Read, &id);
    sets.toggle(Shelf::Queued, &id);
    assert!(sets.contains(Shelf::Read, &id));
    assert!(sets.contains(Shelf::Queued, &id));
    assert!(!sets.contains(Shelf::Favorites, &id));
  }

  #[test]
  fn all_ids_unions_and_dedupes() {
    let mut sets = ShelfSets::default();
    sets.insert(Shelf::Favorites, "a".into());
    sets.insert(Shelf::Read, "a".into());
    sets.insert(Shelf::Read, "b".into());
    assert_eq!(sets.all_ids(), vec!["a".into(), "b".into()]);
  }
}
