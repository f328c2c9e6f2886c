//! Spendbook keeps per-user transaction ledgers, monthly budget limits, and
//! weekly spending summaries on a local SQLite store.
//!
//! The crate is the storage and domain core of a personal-finance backend:
//! an HTTP layer (or any other host) authenticates a user, then drives the
//! [`service`] types with the authenticated username. Amounts are exact
//! decimals end to end, and positive amounts are spending.

pub mod budget;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod spending;

pub use error::{Error, Result};
