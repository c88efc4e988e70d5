//! Domain models for the ledger: clients with per-month payment records,
//! expenses, and the aggregate state that is persisted per identity.

pub mod app_state;
pub mod client;
pub mod expense;

pub use app_state::{AppState, PersistedLedger, UserProfile};
pub use client::{Client, MonthKey, PaymentRecord, PaymentStatus, Weekday};
pub use expense::Expense;

/// Render a monetary amount for display. Display strings are always derived
/// from the numeric value at read time, never stored.
pub fn format_amount(value: f64) -> String {
    format!("${:.2}", value)
}
