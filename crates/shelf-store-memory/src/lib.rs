//! In-memory backend for the Shelf profile store.
//!
//! Holds per-user shelf documents and the append-only review collection in
//! process memory, with [`tokio::sync::watch`]-based review feeds. This is
//! the backend the tests and the CLI run against; a hosted document store
//! implements the same [`ProfileStore`](shelf_core::store::ProfileStore)
//! surface.

mod store;

pub use store::MemoryStore;

#[cfg(test)]
mod tests;
