//! The ledger aggregate: everything the app holds in memory for one identity,
//! and the subset of it that is persisted.

use serde::{Deserialize, Serialize};

use super::client::Client;
use super::expense::Expense;

/// Profile scalar fields. Empty string means unset; `email` doubles as the
/// persistence partition key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub profession: String,
}

/// The in-memory aggregate root: clients, expenses, profile, and the
/// session-transient fields that never reach disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Clients in insertion order.
    pub clients: Vec<Client>,
    /// Expenses in insertion order.
    pub expenses: Vec<Expense>,
    /// UI filter string; transient.
    pub client_term: String,
    pub profile: UserProfile,
    /// True while a load is in flight; transient.
    pub is_loading: bool,
}

impl AppState {
    /// Replace the durable portion of the state with a loaded ledger. The
    /// transient fields are left alone.
    pub fn apply_persisted(&mut self, ledger: PersistedLedger) {
        self.clients = ledger.clients;
        self.expenses = ledger.expenses;
        self.profile = ledger.profile;
    }
}

/// The serialized ledger blob: the durable subset of [`AppState`], one per
/// identity. Round-trips losslessly through JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedLedger {
    pub clients: Vec<Client>,
    pub expenses: Vec<Expense>,
    pub profile: UserProfile,
}

impl From<&AppState> for PersistedLedger {
    fn from(state: &AppState) -> Self {
        PersistedLedger {
            clients: state.clients.clone(),
            expenses: state.expenses.clone(),
            profile: state.profile.clone(),
        }
    }
}
