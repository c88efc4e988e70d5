//! Domain model for a client with a recurring obligation.
//!
//! A client owes a fixed amount per period (`value`, due on `due_day` of each
//! month) and carries a `payments` map recording, month by month, whether that
//! obligation was paid. Absence of a month entry means "unrecorded", which is
//! not the same as "unpaid".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::LedgerError;

/// Day of the week an obligation recurs on. Serialized as the lowercase
/// three-letter name ("mon", "tue", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }
}

/// A `YYYY-MM` month string partitioning a client's payment history.
///
/// Construction validates the shape (four-digit year, dash, month 01-12), so a
/// `payments` map keyed by `MonthKey` only ever holds well-formed months. Keys
/// order lexicographically, which for this shape is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// The month a given date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(raw: &str) -> bool {
        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return false;
        }
        if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
            return false;
        }
        matches!(raw[5..].parse::<u32>(), Ok(month) if (1..=12).contains(&month))
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if Self::validate(raw) {
            Ok(MonthKey(raw.to_string()))
        } else {
            Err(LedgerError::validation(format!(
                "Invalid month key '{}'. Use YYYY-MM.",
                raw
            )))
        }
    }
}

impl TryFrom<String> for MonthKey {
    type Error = LedgerError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a month's obligation has been settled. Closed set; there is no
/// partial-payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

/// Status of one client's obligation for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub status: PaymentStatus,
    /// When the payment was recorded as made. Only meaningful while `status`
    /// is `Paid`.
    pub date: Option<DateTime<Utc>>,
    /// Amount actually paid, snapshotted from the client's `value` at pay
    /// time. May differ from the current `value` after a price change.
    pub value: Option<f64>,
    /// Refreshed on every write to this record.
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    pub fn value_formatted(&self) -> Option<String> {
        self.value.map(super::format_amount)
    }
}

/// A person or entity with a recurring obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    /// Display variant of the phone number.
    pub phone: Option<String>,
    /// Phone number exactly as entered.
    pub phone_raw: Option<String>,
    /// Weekdays the obligation recurs on; may be empty.
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    /// Single time-of-day applying to every recurrence day.
    pub time: Option<NaiveTime>,
    /// Per-day override times; an entry here wins over `time` for that day.
    #[serde(default)]
    pub day_times: BTreeMap<Weekday, NaiveTime>,
    /// Amount owed per period.
    pub value: f64,
    /// Day of month the payment is due, 1-31. Months shorter than the due day
    /// are clamped by the consumer, not here.
    pub due_day: u32,
    /// Per-month payment records, keyed by `YYYY-MM`.
    #[serde(default)]
    pub payments: BTreeMap<MonthKey, PaymentRecord>,
    #[serde(default)]
    pub notify_payment: bool,
    #[serde(default)]
    pub notify_schedule: bool,
}

impl Client {
    /// Generate a unique ID for a client.
    pub fn generate_id() -> String {
        format!("client::{}", Uuid::new_v4())
    }

    /// Resolve the scheduled time for a given day: the per-day override if one
    /// exists, otherwise the client-wide `time`.
    pub fn time_for_day(&self, day: Weekday) -> Option<NaiveTime> {
        self.day_times.get(&day).copied().or(self.time)
    }

    pub fn value_formatted(&self) -> String {
        super::format_amount(self.value)
    }
}
