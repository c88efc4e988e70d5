//! Mutation command types.
//!
//! These structs carry caller input into the [`LedgerStore`] mutation entry
//! points. Update commands are partial: only `Some` fields are touched, and a
//! client's `id` and `payments` are not expressible here at all, so an update
//! can never overwrite them.
//!
//! [`LedgerStore`]: crate::domain::ledger_store::LedgerStore

pub mod client {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::NaiveTime;

    use crate::domain::models::client::Weekday;

    /// Input for creating a new client. The id and the (empty) payments map
    /// are generated by the store.
    #[derive(Debug, Clone, Default)]
    pub struct AddClientCommand {
        pub name: String,
        pub location: Option<String>,
        pub phone: Option<String>,
        pub phone_raw: Option<String>,
        pub days: BTreeSet<Weekday>,
        pub time: Option<NaiveTime>,
        pub day_times: BTreeMap<Weekday, NaiveTime>,
        pub value: f64,
        pub due_day: u32,
        pub notify_payment: bool,
        pub notify_schedule: bool,
    }

    /// Partial update for an existing client. `None` fields are left
    /// untouched; a blank string for an optional contact field clears it.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateClientCommand {
        pub client_id: String,
        pub name: Option<String>,
        pub location: Option<String>,
        pub phone: Option<String>,
        pub phone_raw: Option<String>,
        pub days: Option<BTreeSet<Weekday>>,
        pub time: Option<NaiveTime>,
        pub day_times: Option<BTreeMap<Weekday, NaiveTime>>,
        pub value: Option<f64>,
        pub due_day: Option<u32>,
        pub notify_payment: Option<bool>,
        pub notify_schedule: Option<bool>,
    }
}

pub mod expense {
    use chrono::NaiveDate;

    /// Input for creating a new expense. The id is generated by the store.
    #[derive(Debug, Clone)]
    pub struct AddExpenseCommand {
        pub title: String,
        pub value: f64,
        pub date: NaiveDate,
        pub category: Option<String>,
        pub category_label: Option<String>,
        pub is_recurring: bool,
    }
}

pub mod profile {
    /// Partial update for the user profile. `None` fields are left untouched.
    /// Changing `email` switches the persistence partition; see
    /// [`LedgerStore::set_user_profile`].
    ///
    /// [`LedgerStore::set_user_profile`]: crate::domain::ledger_store::LedgerStore::set_user_profile
    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub age: Option<String>,
        pub profession: Option<String>,
    }
}
