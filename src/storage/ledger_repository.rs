//! Keyed persistence for the ledger blob.
//!
//! Maps a user identity (email) to a serialized [`PersistedLedger`] in the
//! key-value store, and keeps a separate single-slot remembrance of the last
//! identity used.
//!
//! ## Key layout
//!
//! ```text
//! ledger              ← anonymous/default partition (no identity yet)
//! ledger:<email>      ← one ledger per identity
//! last-identity       ← the identity to hydrate on next startup
//! ```
//!
//! Every operation is fail-soft: reads collapse all failure modes into
//! "absent" and writes report a boolean. A corrupt or unreadable slot must
//! never block the user from starting fresh, and a failed write must never
//! crash the in-memory session.

use std::sync::Arc;

use log::{debug, error, warn};

use crate::domain::models::PersistedLedger;

use super::traits::KeyValueStore;

/// Prefix for per-identity ledger keys; also the bare key of the anonymous
/// partition.
const LEDGER_NAMESPACE: &str = "ledger";

/// Slot remembering the last identity a ledger was loaded or saved for.
/// Deliberately outside the `ledger` namespace so it can never collide with a
/// derived ledger key.
const LAST_IDENTITY_KEY: &str = "last-identity";

/// Repository mapping `(namespace, identity)` to a serialized ledger blob.
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Derive the storage key for an identity: `ledger:<email>` for a known
    /// identity, the bare namespace for the anonymous partition. Distinct
    /// identities always derive distinct keys.
    pub fn storage_key(identity: &str) -> String {
        if identity.is_empty() {
            LEDGER_NAMESPACE.to_string()
        } else {
            format!("{}:{}", LEDGER_NAMESPACE, identity)
        }
    }

    /// Load the ledger stored for `identity`. Missing, unreadable, and
    /// unparseable slots all come back as `None`.
    pub fn load(&self, identity: &str) -> Option<PersistedLedger> {
        let key = Self::storage_key(identity);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No ledger stored under '{}'", key);
                return None;
            }
            Err(err) => {
                warn!("Failed to read ledger under '{}': {:#}", key, err);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(ledger) => Some(ledger),
            Err(err) => {
                warn!(
                    "Stored ledger under '{}' is not valid, treating as absent: {}",
                    key, err
                );
                None
            }
        }
    }

    /// Save the ledger for `identity`. `None` deletes the slot ("forget this
    /// identity's data"). Returns `false` on any serialization or I/O
    /// failure.
    pub fn save(&self, payload: Option<&PersistedLedger>, identity: &str) -> bool {
        let key = Self::storage_key(identity);
        let result = match payload {
            None => self.store.remove(&key),
            Some(ledger) => match serde_json::to_string(ledger) {
                Ok(raw) => self.store.set(&key, &raw),
                Err(err) => {
                    error!("Failed to serialize ledger for '{}': {}", key, err);
                    return false;
                }
            },
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to write ledger under '{}': {:#}", key, err);
                false
            }
        }
    }

    /// The identity last remembered via [`save_last_identity`], if any.
    ///
    /// [`save_last_identity`]: Self::save_last_identity
    pub fn load_last_identity(&self) -> Option<String> {
        match self.store.get(LAST_IDENTITY_KEY) {
            Ok(identity) => identity,
            Err(err) => {
                warn!("Failed to read last identity: {:#}", err);
                None
            }
        }
    }

    /// Remember `identity` as the one to hydrate on next startup. An empty
    /// identity clears the slot. Returns `false` on I/O failure.
    pub fn save_last_identity(&self, identity: &str) -> bool {
        let result = if identity.is_empty() {
            self.store.remove(LAST_IDENTITY_KEY)
        } else {
            self.store.set(LAST_IDENTITY_KEY, identity)
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to write last identity: {:#}", err);
                false
            }
        }
    }
}
