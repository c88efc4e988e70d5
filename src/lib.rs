//! # Client Ledger
//!
//! Core library of a personal bookkeeping app for a single user: recurring
//! client obligations (monthly service fees), ad-hoc expenses, and per-month
//! payment records, persisted locally and keyed by the active user's email.
//!
//! The crate is split into two layers:
//!
//! - [`storage`]: a keyed persistence store over a pluggable local key-value
//!   backend, plus a single-slot "last identity" remembrance
//! - [`domain`]: the typed entities and the [`domain::LedgerStore`] state
//!   container that owns every mutation entry point
//!
//! Persistence is fail-soft by design: a failed read loads as an empty ledger
//! and a failed write is logged and reported as a boolean, so the in-memory
//! session keeps working either way.

pub mod domain;
pub mod storage;

pub use domain::errors::LedgerError;
pub use domain::ledger_store::LedgerStore;
pub use domain::models;
pub use storage::file_store::FileStore;
pub use storage::ledger_repository::LedgerRepository;
pub use storage::traits::KeyValueStore;
