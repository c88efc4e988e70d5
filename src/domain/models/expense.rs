//! Domain model for an expense.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A one-time or recurring outlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub value: f64,
    pub date: NaiveDate,
    /// Raw classification key, e.g. "transport".
    pub category: Option<String>,
    /// Display label for the category, settable independently of the key.
    pub category_label: Option<String>,
    /// Consumed by the scheduling layer; not interpreted here.
    #[serde(default)]
    pub is_recurring: bool,
}

impl Expense {
    /// Generate a unique ID for an expense.
    pub fn generate_id() -> String {
        format!("expense::{}", Uuid::new_v4())
    }

    pub fn value_formatted(&self) -> String {
        super::format_amount(self.value)
    }
}
