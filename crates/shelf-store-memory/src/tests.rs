//! Tests for `MemoryStore` — shelf document semantics and review feeds.

use shelf_core::{
  Error, Rating, Review, Shelf, UserId, VolumeId, store::ProfileStore,
};

use crate::MemoryStore;

fn user() -> UserId { "user-1".into() }

fn review(user: &str, volume: &str, rating: u8) -> Review {
  Review::new(
    user.into(),
    volume.into(),
    Rating::new(rating).unwrap(),
    None,
  )
}

// ─── Shelf documents ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_shelves_creates_empty_document() {
  let store = MemoryStore::new();
  let sets = store.fetch_shelves(&user()).await.unwrap();
  assert!(sets.favorites.is_empty());
  assert!(sets.wishlist.is_empty());
}

#[tokio::test]
async fn add_then_fetch_round_trips() {
  let store = MemoryStore::new();
  let id: VolumeId = "b1".into();
  store.add_to_shelf(&user(), Shelf::Read, &id).await.unwrap();

  let sets = store.fetch_shelves(&user()).await.unwrap();
  assert!(sets.contains(Shelf::Read, &id));
  assert!(!sets.contains(Shelf::Queued, &id));
}

#[tokio::test]
async fn duplicate_add_is_a_noop() {
  let store = MemoryStore::new();
  let id: VolumeId = "b1".into();
  store.add_to_shelf(&user(), Shelf::Read, &id).await.unwrap();
  store.add_to_shelf(&user(), Shelf::Read, &id).await.unwrap();

  let sets = store.fetch_shelves(&user()).await.unwrap();
  assert_eq!(sets.read.len(), 1);
}

#[tokio::test]
async fn remove_absent_is_a_noop() {
  let store = MemoryStore::new();
  let id: VolumeId = "b1".into();
  store
    .remove_from_shelf(&user(), Shelf::Wishlist, &id)
    .await
    .unwrap();
  let sets = store.fetch_shelves(&user()).await.unwrap();
  assert!(sets.wishlist.is_empty());
}

#[tokio::test]
async fn documents_are_per_user() {
  let store = MemoryStore::new();
  let id: VolumeId = "b1".into();
  store
    .add_to_shelf(&"alice".into(), Shelf::Favorites, &id)
    .await
    .unwrap();

  let bob = store.fetch_shelves(&"bob".into()).await.unwrap();
  assert!(bob.favorites.is_empty());
}

#[tokio::test]
async fn induced_write_failure() {
  let store = MemoryStore::new();
  store.set_fail_writes(true).await;

  let id: VolumeId = "b1".into();
  let err = store
    .add_to_shelf(&user(), Shelf::Read, &id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RemoteWriteFailed(_)));

  store.set_fail_writes(false).await;
  store.add_to_shelf(&user(), Shelf::Read, &id).await.unwrap();
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reviews_for_user_are_newest_first() {
  let store = MemoryStore::new();
  let mut older = review("alice", "b1", 3);
  older.created_at -= chrono::Duration::seconds(60);
  let newer = review("alice", "b2", 5);

  store.submit_review(&older).await.unwrap();
  store.submit_review(&newer).await.unwrap();
  store.submit_review(&review("bob", "b1", 1)).await.unwrap();

  let mine = store.reviews_for_user(&"alice".into()).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert_eq!(mine[0].id, newer.id);
  assert_eq!(mine[1].id, older.id);
}

#[tokio::test]
async fn subscription_sees_existing_and_new_reviews() {
  let store = MemoryStore::new();
  let volume: VolumeId = "b1".into();
  store.submit_review(&review("alice", "b1", 4)).await.unwrap();

  let mut rx = store.subscribe_reviews(&volume).await.unwrap();
  assert_eq!(rx.borrow_and_update().len(), 1);

  store.submit_review(&review("bob", "b1", 2)).await.unwrap();
  rx.changed().await.unwrap();
  let latest = rx.borrow_and_update().clone();
  assert_eq!(latest.len(), 2);
  // Newest first.
  assert!(latest[0].created_at >= latest[1].created_at);
}

#[tokio::test]
async fn resubscribing_after_drop_sees_reviews_submitted_in_between() {
  let store = MemoryStore::new();
  let volume: VolumeId = "b1".into();

  // Open and immediately drop a subscription, leaving the feed entry
  // behind with no live receivers.
  drop(store.subscribe_reviews(&volume).await.unwrap());

  store.submit_review(&review("alice", "b1", 4)).await.unwrap();

  let mut rx = store.subscribe_reviews(&volume).await.unwrap();
  assert_eq!(rx.borrow_and_update().len(), 1);
}

#[tokio::test]
async fn subscription_is_scoped_to_one_volume() {
  let store = MemoryStore::new();
  let mut rx = store.subscribe_reviews(&"b1".into()).await.unwrap();
  assert!(rx.borrow_and_update().is_empty());

  store.submit_review(&review("alice", "b2", 5)).await.unwrap();
  // No update for b1; the channel still holds the empty list.
  assert!(!rx.has_changed().unwrap());
}
