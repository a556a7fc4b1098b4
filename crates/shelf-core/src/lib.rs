//! Core types and trait definitions for the Shelf book-discovery core.
//!
//! This crate is deliberately free of HTTP dependencies. All other crates
//! depend on it; it depends on nothing proprietary. The two traits at the
//! bottom of the stack — [`catalog::CatalogSource`] and
//! [`store::ProfileStore`] — are the seams behind which the external book
//! catalog and the remote per-user document store live.

pub mod book;
pub mod catalog;
pub mod error;
pub mod review;
pub mod shelf;
pub mod store;
pub mod user;

pub use book::{Book, VolumeId};
pub use error::{Error, Result};
pub use review::{Rating, Review};
pub use shelf::{Shelf, ShelfSets};
pub use user::UserId;
