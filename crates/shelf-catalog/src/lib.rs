//! HTTP client for a Google-Books-volumes-style catalog API.
//!
//! Implements [`shelf_core::catalog::CatalogSource`] over REST. The wire
//! shape lives in [`dto`]; everything downstream of this crate sees only
//! [`shelf_core::Book`].

mod client;
mod dto;

pub use client::{CatalogClient, CatalogConfig};
