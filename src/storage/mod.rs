//! # Storage Module
//!
//! Keyed persistence for the ledger. The domain layer never touches the
//! filesystem directly: it talks to a [`LedgerRepository`], which derives
//! storage keys from the user identity and serializes the ledger blob through
//! a pluggable [`KeyValueStore`] backend. The default backend is
//! [`FileStore`], one file per key with atomic writes.
//!
//! Every operation here is fail-soft. A missing, unreadable, or corrupt value
//! loads as "absent"; a failed write is logged and reported as `false`. The
//! in-memory session must keep working regardless of what the disk does.
//!
//! [`LedgerRepository`]: ledger_repository::LedgerRepository
//! [`KeyValueStore`]: traits::KeyValueStore
//! [`FileStore`]: file_store::FileStore

pub mod file_store;
pub mod ledger_repository;
pub mod persist;
pub mod traits;

pub use file_store::FileStore;
pub use ledger_repository::LedgerRepository;
pub use persist::PersistWorker;
pub use traits::KeyValueStore;
