//! Rust client library for the Up Banking Developer API.
//!
//! This crate provides a typed client for the
//! [Up Banking](https://developer.up.com.au/) Developer API together with
//! the pure logic needed to present paginated, filterable resource lists:
//! cursor pagination, free-text and relationship filtering, incremental
//! list reconciliation, and view-state derivation.

pub mod error;
pub mod feed;
pub mod filter;
pub mod models;
pub mod reconcile;
pub mod settings;
pub mod view_state;

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
