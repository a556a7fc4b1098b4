//! The Shelf synchronization core.
//!
//! Four pieces, leaf first:
//!
//! - [`Resolver`]: memoizing volume-id → [`Book`](shelf_core::Book) lookup
//!   over a [`CatalogSource`](shelf_core::catalog::CatalogSource), with
//!   at-most-one in-flight fetch per id.
//! - [`Shelves`]: the four per-user membership lists, remote-backed with
//!   optimistic local toggles and revert-on-failure reconciliation.
//! - [`ReviewLedger`]: append-only review submission plus live,
//!   coalescing per-volume feeds that mirror into a local snapshot.
//! - [`dashboard`]: pure derivations (referenced-id union, statistics,
//!   recent activity, shelf views) over the other three; no state of its
//!   own.
//!
//! [`SyncSession`] ties them to one authenticated subject and owns the
//! reset-on-subject-change procedure.

pub mod dashboard;
mod ledger;
mod resolver;
mod session;
mod shelves;

pub use dashboard::{ActivityEntry, ReviewStats};
pub use ledger::{ReviewFeed, ReviewLedger};
pub use resolver::{Resolution, Resolver};
pub use session::SyncSession;
pub use shelves::{LoadPhase, Shelves};
