//! Memoizing catalog lookup cache.
//!
//! Every volume id referenced anywhere in the system is materialized into a
//! full [`Book`] through this one cache, so the catalog is asked about each
//! id at most once per outcome: a successful fetch is cached forever (the
//! cache is unbounded and never evicts), a failed fetch leaves no entry and
//! is retried on the next [`resolve`](Resolver::resolve) call.
//!
//! Concurrent resolves that overlap do not duplicate work: the first caller
//! to miss an id registers an in-flight marker under the cache lock and
//! dispatches the fetch; later callers find the marker and await its watch
//! channel instead.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shelf_core::{Book, VolumeId, catalog::CatalogSource};
use tokio::{sync::watch, task::JoinSet};
use tracing::{debug, warn};

/// The outcome of one `resolve` call. Partial success is the norm: `books`
/// holds what resolved, `failed` lists what did not. Ids absent from both
/// were never requested.
#[derive(Debug, Default)]
pub struct Resolution {
  pub books:  HashMap<VolumeId, Arc<Book>>,
  pub failed: Vec<VolumeId>,
}

#[derive(Default)]
struct CacheState {
  books:     HashMap<VolumeId, Arc<Book>>,
  /// One watch channel per fetch currently in flight. The sender flips the
  /// value to `true` when the fetch settles, successfully or not.
  in_flight: HashMap<VolumeId, watch::Receiver<bool>>,
}

/// Memoizing resolver over a [`CatalogSource`].
pub struct Resolver<C> {
  catalog: Arc<C>,
  state:   Mutex<CacheState>,
}

impl<C> Resolver<C>
where
  C: CatalogSource + 'static,
{
  pub fn new(catalog: Arc<C>) -> Self {
    Self { catalog, state: Mutex::default() }
  }

  /// The lock is only ever held across plain map operations, so a poisoned
  /// lock can only mean a panic between two consistent states; recover the
  /// guard rather than cascading the panic.
  fn locked(&self) -> MutexGuard<'_, CacheState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Non-blocking read of an already-resolved entry.
  pub fn peek(&self, id: &VolumeId) -> Option<Arc<Book>> {
    self.locked().books.get(id).cloned()
  }

  /// Number of successfully cached records.
  pub fn cached_count(&self) -> usize { self.locked().books.len() }

  /// Materialize records for `ids`. Fetches only cache misses, one fetch
  /// per missing id, distinct ids concurrently. Returns the resolvable
  /// subset and reports the rest in [`Resolution::failed`]; a failed id
  /// raises no error and is retried on the next call.
  pub async fn resolve(&self, ids: &[VolumeId]) -> Resolution {
    let mut books = HashMap::new();
    let mut to_fetch: Vec<(VolumeId, watch::Sender<bool>)> = Vec::new();
    let mut to_await: Vec<(VolumeId, watch::Receiver<bool>)> = Vec::new();

    {
      let mut state = self.locked();
      let mut seen = HashSet::new();
      for id in ids {
        if !seen.insert(id) {
          continue;
        }
        if let Some(book) = state.books.get(id) {
          books.insert(id.clone(), Arc::clone(book));
        } else if let Some(rx) = state.in_flight.get(id) {
          // Another call owns this fetch; wait for it instead of
          // dispatching a duplicate.
          to_await.push((id.clone(), rx.clone()));
        } else {
          let (tx, rx) = watch::channel(false);
          state.in_flight.insert(id.clone(), rx);
          to_fetch.push((id.clone(), tx));
        }
      }
    }

    let mut failed = Vec::new();

    if !to_fetch.is_empty() {
      debug!(count = to_fetch.len(), "dispatching catalog fetches");
      let mut fetches = JoinSet::new();
      for (id, tx) in to_fetch {
        let catalog = Arc::clone(&self.catalog);
        fetches
          .spawn(async move { (tx, catalog.fetch_by_id(&id).await, id) });
      }

      while let Some(joined) = fetches.join_next().await {
        let Ok((tx, result, id)) = joined else {
          // A panicked fetch task: its in-flight entry is cleaned up by
          // the waiters below observing the dropped sender.
          continue;
        };
        let mut state = self.locked();
        state.in_flight.remove(&id);
        match result {
          Ok(book) => {
            let book = Arc::new(book);
            state.books.insert(id.clone(), Arc::clone(&book));
            books.insert(id, book);
          }
          Err(e) => {
            warn!(%id, error = %e, "catalog fetch failed");
            failed.push(id);
          }
        }
        drop(state);
        let _ = tx.send(true);
      }
    }

    for (id, mut rx) in to_await {
      // Err means the owning task dropped the sender without settling;
      // either way the fetch is over and the cache holds the answer, or
      // nothing.
      let settled = rx.wait_for(|done| *done).await;
      let mut state = self.locked();
      if settled.is_err() {
        // Clear the orphaned marker so the id is fetched again next call.
        state.in_flight.remove(&id);
      }
      match state.books.get(&id) {
        Some(book) => {
          books.insert(id, Arc::clone(book));
        }
        None => failed.push(id),
      }
    }

    Resolution { books, failed }
  }
}
