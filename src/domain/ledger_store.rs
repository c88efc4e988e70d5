//! The ledger state store.
//!
//! [`LedgerStore`] owns the canonical in-memory [`AppState`] and every
//! mutation entry point. Each mutation updates the aggregate synchronously,
//! then snapshots the whole ledger and hands it to the persist worker under
//! the identity current at that moment; there is no delta persistence.
//! Reads see mutations immediately and never wait on a pending save.
//!
//! The store is an explicit container: the application root constructs one
//! and passes it by reference to whatever needs to read or mutate the
//! ledger. On construction it hydrates from the best-known identity: the
//! profile email if already set, otherwise the last remembered identity,
//! otherwise the anonymous partition.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};

use crate::domain::commands::client::{AddClientCommand, UpdateClientCommand};
use crate::domain::commands::expense::AddExpenseCommand;
use crate::domain::commands::profile::UpdateProfileCommand;
use crate::domain::errors::LedgerError;
use crate::domain::models::{
    AppState, Client, Expense, MonthKey, PaymentRecord, PaymentStatus, PersistedLedger,
};
use crate::storage::file_store::FileStore;
use crate::storage::ledger_repository::LedgerRepository;
use crate::storage::persist::PersistWorker;
use crate::storage::traits::KeyValueStore;

/// Trim a caller-supplied optional text field; blank input clears it.
fn normalize_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct LedgerStore {
    state: AppState,
    repository: LedgerRepository,
    writer: PersistWorker,
}

impl LedgerStore {
    /// Create a store over an arbitrary key-value backend and hydrate it.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let repository = LedgerRepository::new(Arc::clone(&store));
        let writer = PersistWorker::spawn(LedgerRepository::new(store));
        let mut ledger = Self {
            state: AppState::default(),
            repository,
            writer,
        };
        ledger.hydrate();
        ledger
    }

    /// Open a file-backed store rooted at `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let store = FileStore::new(data_dir)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Open a file-backed store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let store = FileStore::new_default()?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Block until every persist queued so far has completed. Mutations never
    /// need this; it is for shutdown and tests.
    pub fn flush(&self) {
        self.writer.flush();
    }

    fn hydrate(&mut self) {
        self.state.is_loading = true;
        let identity = if self.state.profile.email.is_empty() {
            self.repository.load_last_identity().unwrap_or_default()
        } else {
            self.state.profile.email.clone()
        };
        debug!("Hydrating ledger for identity '{}'", identity);
        if let Some(ledger) = self.repository.load(&identity) {
            self.state.apply_persisted(ledger);
        }
        if self.state.profile.email.is_empty() {
            self.state.profile.email = identity;
        }
        self.state.is_loading = false;
    }

    /// Snapshot the aggregate and queue a write under the current identity.
    fn schedule_persist(&self) {
        let snapshot = PersistedLedger::from(&self.state);
        self.writer
            .enqueue(self.state.profile.email.clone(), Some(snapshot));
    }

    pub fn set_client_term(&mut self, term: String) {
        self.state.client_term = term;
        self.schedule_persist();
    }

    pub fn set_user_profession(&mut self, profession: String) {
        self.state.profile.profession = profession.trim().to_string();
        self.schedule_persist();
    }

    /// Merge the provided profile fields; omitted fields are left untouched.
    /// When the email changes, the store switches persistence partitions: the
    /// new identity is remembered, the old in-memory ledger is discarded, and
    /// the ledger stored for the new identity (if any) is loaded in its
    /// place.
    pub fn set_user_profile(&mut self, update: UpdateProfileCommand) {
        let previous_email = self.state.profile.email.clone();
        let profile = &mut self.state.profile;
        if let Some(name) = update.name {
            profile.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            profile.email = email.trim().to_string();
        }
        if let Some(phone) = update.phone {
            profile.phone = phone.trim().to_string();
        }
        if let Some(age) = update.age {
            profile.age = age.trim().to_string();
        }
        if let Some(profession) = update.profession {
            profile.profession = profession.trim().to_string();
        }

        if self.state.profile.email != previous_email {
            self.switch_identity();
        }
        self.schedule_persist();
    }

    fn switch_identity(&mut self) {
        let identity = self.state.profile.email.clone();
        info!("Identity changed, reloading ledger for '{}'", identity);
        self.repository.save_last_identity(&identity);

        // Discard-and-reload: the previous in-memory ledger is not merged
        // into the new identity. A save already queued for the old identity
        // still completes against its original key.
        let merged_profile = self.state.profile.clone();
        self.state.is_loading = true;
        if let Some(ledger) = self.repository.load(&identity) {
            self.state.apply_persisted(ledger);
        } else {
            self.state.clients.clear();
            self.state.expenses.clear();
            self.state.profile = merged_profile;
        }
        self.state.is_loading = false;
    }

    pub fn add_client(&mut self, command: AddClientCommand) -> Result<Client, LedgerError> {
        self.validate_add_client(&command)?;

        let client = Client {
            id: Client::generate_id(),
            name: command.name.trim().to_string(),
            location: command.location.and_then(normalize_text),
            phone: command.phone.and_then(normalize_text),
            phone_raw: command.phone_raw.and_then(normalize_text),
            days: command.days,
            time: command.time,
            day_times: command.day_times,
            value: command.value,
            due_day: command.due_day,
            payments: BTreeMap::new(),
            notify_payment: command.notify_payment,
            notify_schedule: command.notify_schedule,
        };
        info!("Added client '{}' ({})", client.name, client.id);

        self.state.clients.push(client.clone());
        self.schedule_persist();
        Ok(client)
    }

    /// Merge the provided fields into the matching client. The client's `id`
    /// and `payments` are not part of the update surface and are never
    /// touched.
    pub fn update_client(&mut self, command: UpdateClientCommand) -> Result<Client, LedgerError> {
        self.validate_update_client(&command)?;

        let client = match self
            .state
            .clients
            .iter_mut()
            .find(|client| client.id == command.client_id)
        {
            Some(client) => client,
            None => return Err(LedgerError::not_found("client", command.client_id)),
        };

        if let Some(name) = command.name {
            client.name = name.trim().to_string();
        }
        if let Some(location) = command.location {
            client.location = normalize_text(location);
        }
        if let Some(phone) = command.phone {
            client.phone = normalize_text(phone);
        }
        if let Some(phone_raw) = command.phone_raw {
            client.phone_raw = normalize_text(phone_raw);
        }
        if let Some(days) = command.days {
            client.days = days;
        }
        if let Some(time) = command.time {
            client.time = Some(time);
        }
        if let Some(day_times) = command.day_times {
            client.day_times = day_times;
        }
        if let Some(value) = command.value {
            client.value = value;
        }
        if let Some(due_day) = command.due_day {
            client.due_day = due_day;
        }
        if let Some(notify_payment) = command.notify_payment {
            client.notify_payment = notify_payment;
        }
        if let Some(notify_schedule) = command.notify_schedule {
            client.notify_schedule = notify_schedule;
        }

        let updated = client.clone();
        debug!("Updated client {}", updated.id);
        self.schedule_persist();
        Ok(updated)
    }

    /// Remove the client and its entire payment history. Irreversible.
    pub fn delete_client(&mut self, client_id: &str) -> Result<(), LedgerError> {
        let before = self.state.clients.len();
        self.state.clients.retain(|client| client.id != client_id);
        if self.state.clients.len() == before {
            return Err(LedgerError::not_found("client", client_id));
        }
        info!("Deleted client {}", client_id);
        self.schedule_persist();
        Ok(())
    }

    /// Toggle the payment record of one client for one month.
    ///
    /// No record, or a `pending` one, becomes `paid` with the payment date
    /// and a snapshot of the client's current `value`. A `paid` record
    /// reverts to `pending` with date and value cleared. `updated_at` is
    /// refreshed on every write.
    pub fn toggle_payment(
        &mut self,
        client_id: &str,
        month: MonthKey,
    ) -> Result<PaymentRecord, LedgerError> {
        let client = match self
            .state
            .clients
            .iter_mut()
            .find(|client| client.id == client_id)
        {
            Some(client) => client,
            None => return Err(LedgerError::not_found("client", client_id)),
        };

        let now = Utc::now();
        let record = match client.payments.get(&month) {
            Some(existing) if existing.status == PaymentStatus::Paid => PaymentRecord {
                status: PaymentStatus::Pending,
                date: None,
                value: None,
                updated_at: now,
            },
            _ => PaymentRecord {
                status: PaymentStatus::Paid,
                date: Some(now),
                value: Some(client.value),
                updated_at: now,
            },
        };
        debug!(
            "Toggled payment for client {} month {}: now {:?}",
            client_id, month, record.status
        );

        client.payments.insert(month, record.clone());
        self.schedule_persist();
        Ok(record)
    }

    pub fn add_expense(&mut self, command: AddExpenseCommand) -> Result<Expense, LedgerError> {
        self.validate_add_expense(&command)?;

        let expense = Expense {
            id: Expense::generate_id(),
            title: command.title.trim().to_string(),
            value: command.value,
            date: command.date,
            category: command.category.and_then(normalize_text),
            category_label: command.category_label.and_then(normalize_text),
            is_recurring: command.is_recurring,
        };
        info!("Added expense '{}' ({})", expense.title, expense.id);

        self.state.expenses.push(expense.clone());
        self.schedule_persist();
        Ok(expense)
    }

    pub fn delete_expense(&mut self, expense_id: &str) -> Result<(), LedgerError> {
        let before = self.state.expenses.len();
        self.state
            .expenses
            .retain(|expense| expense.id != expense_id);
        if self.state.expenses.len() == before {
            return Err(LedgerError::not_found("expense", expense_id));
        }
        info!("Deleted expense {}", expense_id);
        self.schedule_persist();
        Ok(())
    }

    fn validate_add_client(&self, command: &AddClientCommand) -> Result<(), LedgerError> {
        if command.name.trim().is_empty() {
            return Err(LedgerError::validation("Client name cannot be empty"));
        }
        Self::validate_client_value(command.value)?;
        Self::validate_due_day(command.due_day)
    }

    fn validate_update_client(&self, command: &UpdateClientCommand) -> Result<(), LedgerError> {
        if let Some(ref name) = command.name {
            if name.trim().is_empty() {
                return Err(LedgerError::validation("Client name cannot be empty"));
            }
        }
        if let Some(value) = command.value {
            Self::validate_client_value(value)?;
        }
        if let Some(due_day) = command.due_day {
            Self::validate_due_day(due_day)?;
        }
        Ok(())
    }

    fn validate_add_expense(&self, command: &AddExpenseCommand) -> Result<(), LedgerError> {
        if command.title.trim().is_empty() {
            return Err(LedgerError::validation("Expense title cannot be empty"));
        }
        if !command.value.is_finite() || command.value < 0.0 {
            return Err(LedgerError::validation("Expense value cannot be negative"));
        }
        Ok(())
    }

    fn validate_client_value(value: f64) -> Result<(), LedgerError> {
        if !value.is_finite() || value < 0.0 {
            return Err(LedgerError::validation("Client value cannot be negative"));
        }
        Ok(())
    }

    fn validate_due_day(due_day: u32) -> Result<(), LedgerError> {
        if !(1..=31).contains(&due_day) {
            return Err(LedgerError::validation("Due day must be between 1 and 31"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Weekday;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn open_store(temp_dir: &TempDir) -> LedgerStore {
        LedgerStore::open(temp_dir.path()).expect("Failed to open store")
    }

    fn month(raw: &str) -> MonthKey {
        raw.parse().unwrap()
    }

    fn ana() -> AddClientCommand {
        AddClientCommand {
            name: "Ana".to_string(),
            value: 100.0,
            due_day: 5,
            days: BTreeSet::from([Weekday::Mon]),
            ..AddClientCommand::default()
        }
    }

    fn fuel() -> AddExpenseCommand {
        AddExpenseCommand {
            title: "Fuel".to_string(),
            value: 42.5,
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            category: Some("transport".to_string()),
            category_label: Some("Transport".to_string()),
            is_recurring: false,
        }
    }

    #[test]
    fn test_add_client_on_empty_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let client = store.add_client(ana()).unwrap();

        assert!(!client.id.is_empty());
        assert!(client.payments.is_empty());
        assert_eq!(store.state().clients.len(), 1);
        assert_eq!(store.state().clients[0], client);
    }

    #[test]
    fn test_add_client_normalizes_text_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let client = store
            .add_client(AddClientCommand {
                name: "  Ana  ".to_string(),
                location: Some("   ".to_string()),
                phone: Some(" (11) 99999-0000 ".to_string()),
                ..ana()
            })
            .unwrap();

        assert_eq!(client.name, "Ana");
        assert_eq!(client.location, None);
        assert_eq!(client.phone, Some("(11) 99999-0000".to_string()));
    }

    #[test]
    fn test_add_client_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let no_name = store.add_client(AddClientCommand {
            name: " ".to_string(),
            ..ana()
        });
        assert!(matches!(no_name, Err(LedgerError::Validation(_))));

        let negative_value = store.add_client(AddClientCommand {
            value: -1.0,
            ..ana()
        });
        assert!(matches!(negative_value, Err(LedgerError::Validation(_))));

        let due_day_low = store.add_client(AddClientCommand {
            due_day: 0,
            ..ana()
        });
        assert!(matches!(due_day_low, Err(LedgerError::Validation(_))));

        let due_day_high = store.add_client(AddClientCommand {
            due_day: 32,
            ..ana()
        });
        assert!(matches!(due_day_high, Err(LedgerError::Validation(_))));

        assert!(store.state().clients.is_empty());
    }

    #[test]
    fn test_toggle_payment_marks_month_paid() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();

        let record = store.toggle_payment(&client.id, month("2024-03")).unwrap();

        assert_eq!(record.status, PaymentStatus::Paid);
        assert_eq!(record.value, Some(100.0));
        assert!(record.date.is_some());

        let stored = &store.state().clients[0].payments[&month("2024-03")];
        assert_eq!(stored, &record);
    }

    #[test]
    fn test_toggle_payment_twice_reverts_to_pending() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();

        let paid = store.toggle_payment(&client.id, month("2024-03")).unwrap();
        let reverted = store.toggle_payment(&client.id, month("2024-03")).unwrap();

        assert_eq!(reverted.status, PaymentStatus::Pending);
        assert_eq!(reverted.date, None);
        assert_eq!(reverted.value, None);
        assert!(reverted.updated_at >= paid.updated_at);

        // The toggle is its own inverse from here: a third call pays again.
        let paid_again = store.toggle_payment(&client.id, month("2024-03")).unwrap();
        assert_eq!(paid_again.status, PaymentStatus::Paid);
        assert_eq!(paid_again.value, Some(100.0));
    }

    #[test]
    fn test_toggle_payment_snapshots_value_at_pay_time() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();

        store.toggle_payment(&client.id, month("2024-03")).unwrap();
        store
            .update_client(UpdateClientCommand {
                client_id: client.id.clone(),
                value: Some(150.0),
                ..UpdateClientCommand::default()
            })
            .unwrap();
        store.toggle_payment(&client.id, month("2024-04")).unwrap();

        let payments = &store.state().clients[0].payments;
        assert_eq!(payments[&month("2024-03")].value, Some(100.0));
        assert_eq!(payments[&month("2024-04")].value, Some(150.0));
    }

    #[test]
    fn test_toggle_payment_unknown_client() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let result = store.toggle_payment("client::missing", month("2024-03"));
        assert_eq!(
            result,
            Err(LedgerError::not_found("client", "client::missing"))
        );
    }

    #[test]
    fn test_update_client_merges_only_provided_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();
        store.toggle_payment(&client.id, month("2024-03")).unwrap();

        let updated = store
            .update_client(UpdateClientCommand {
                client_id: client.id.clone(),
                value: Some(150.0),
                ..UpdateClientCommand::default()
            })
            .unwrap();

        assert_eq!(updated.id, client.id);
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.value, 150.0);
        assert_eq!(updated.days, BTreeSet::from([Weekday::Mon]));
        // Payment history is outside the update surface.
        assert!(updated.payments.contains_key(&month("2024-03")));
    }

    #[test]
    fn test_update_client_clears_blank_contact_fields() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store
            .add_client(AddClientCommand {
                location: Some("Downtown".to_string()),
                ..ana()
            })
            .unwrap();

        let updated = store
            .update_client(UpdateClientCommand {
                client_id: client.id.clone(),
                location: Some(String::new()),
                ..UpdateClientCommand::default()
            })
            .unwrap();

        assert_eq!(updated.location, None);
    }

    #[test]
    fn test_update_client_validation_and_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();

        let negative = store.update_client(UpdateClientCommand {
            client_id: client.id.clone(),
            value: Some(-5.0),
            ..UpdateClientCommand::default()
        });
        assert!(matches!(negative, Err(LedgerError::Validation(_))));
        assert_eq!(store.state().clients[0].value, 100.0);

        let missing = store.update_client(UpdateClientCommand {
            client_id: "client::missing".to_string(),
            value: Some(1.0),
            ..UpdateClientCommand::default()
        });
        assert_eq!(
            missing,
            Err(LedgerError::not_found("client", "client::missing"))
        );
    }

    #[test]
    fn test_delete_client_removes_payment_history() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let client = store.add_client(ana()).unwrap();
        store.toggle_payment(&client.id, month("2024-03")).unwrap();

        store.delete_client(&client.id).unwrap();

        assert!(store.state().clients.is_empty());
        let result = store.toggle_payment(&client.id, month("2024-03"));
        assert_eq!(result, Err(LedgerError::not_found("client", client.id)));
    }

    #[test]
    fn test_delete_client_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);
        let result = store.delete_client("client::missing");
        assert_eq!(
            result,
            Err(LedgerError::not_found("client", "client::missing"))
        );
    }

    #[test]
    fn test_add_and_delete_expense() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let expense = store.add_expense(fuel()).unwrap();
        assert!(!expense.id.is_empty());
        assert_eq!(store.state().expenses.len(), 1);

        store.delete_expense(&expense.id).unwrap();
        assert!(store.state().expenses.is_empty());

        let missing = store.delete_expense(&expense.id);
        assert_eq!(missing, Err(LedgerError::not_found("expense", expense.id)));
    }

    #[test]
    fn test_add_expense_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let no_title = store.add_expense(AddExpenseCommand {
            title: "  ".to_string(),
            ..fuel()
        });
        assert!(matches!(no_title, Err(LedgerError::Validation(_))));

        let negative = store.add_expense(AddExpenseCommand {
            value: -1.0,
            ..fuel()
        });
        assert!(matches!(negative, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_set_user_profile_merges_partial() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.set_user_profile(UpdateProfileCommand {
            name: Some("Maria".to_string()),
            age: Some("34".to_string()),
            ..UpdateProfileCommand::default()
        });
        store.set_user_profile(UpdateProfileCommand {
            phone: Some("11988887777".to_string()),
            ..UpdateProfileCommand::default()
        });

        let profile = &store.state().profile;
        assert_eq!(profile.name, "Maria");
        assert_eq!(profile.age, "34");
        assert_eq!(profile.phone, "11988887777");
    }

    #[test]
    fn test_mutations_are_visible_before_persist_completes() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        let client = store.add_client(ana()).unwrap();
        // No flush: the in-memory state is already current.
        assert_eq!(store.state().clients[0].id, client.id);
    }

    #[test]
    fn test_anonymous_ledger_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&temp_dir);
            store.add_client(ana()).unwrap();
            store.add_expense(fuel()).unwrap();
            store.flush();
        }

        let reopened = open_store(&temp_dir);
        assert_eq!(reopened.state().clients.len(), 1);
        assert_eq!(reopened.state().clients[0].name, "Ana");
        assert_eq!(reopened.state().expenses.len(), 1);
        assert!(!reopened.state().is_loading);
    }

    #[test]
    fn test_restart_hydrates_last_identity() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&temp_dir);
            store.set_user_profile(UpdateProfileCommand {
                email: Some("maria@example.com".to_string()),
                name: Some("Maria".to_string()),
                ..UpdateProfileCommand::default()
            });
            store.add_client(ana()).unwrap();
            store.flush();
        }

        let reopened = open_store(&temp_dir);
        assert_eq!(reopened.state().profile.email, "maria@example.com");
        assert_eq!(reopened.state().profile.name, "Maria");
        assert_eq!(reopened.state().clients.len(), 1);
    }

    #[test]
    fn test_client_term_is_transient() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&temp_dir);
            store.set_client_term("ana".to_string());
            store.add_client(ana()).unwrap();
            assert_eq!(store.state().client_term, "ana");
            store.flush();
        }

        let reopened = open_store(&temp_dir);
        assert_eq!(reopened.state().client_term, "");
    }

    #[test]
    fn test_profession_is_persisted() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = open_store(&temp_dir);
            store.set_user_profession("Hairdresser".to_string());
            store.flush();
        }

        let reopened = open_store(&temp_dir);
        assert_eq!(reopened.state().profile.profession, "Hairdresser");
    }

    #[test]
    fn test_email_change_switches_partition() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open_store(&temp_dir);

        store.set_user_profile(UpdateProfileCommand {
            email: Some("a@b.com".to_string()),
            ..UpdateProfileCommand::default()
        });
        store.add_client(ana()).unwrap();

        // Switching identities discards the in-memory ledger.
        store.set_user_profile(UpdateProfileCommand {
            email: Some("c@d.com".to_string()),
            ..UpdateProfileCommand::default()
        });
        assert!(store.state().clients.is_empty());

        store
            .add_client(AddClientCommand {
                name: "Bruno".to_string(),
                ..ana()
            })
            .unwrap();
        store.flush();

        // Each identity's blob holds its own clients.
        let repository =
            LedgerRepository::new(Arc::new(FileStore::new(temp_dir.path()).unwrap()));
        let first = repository.load("a@b.com").unwrap();
        let second = repository.load("c@d.com").unwrap();
        assert_eq!(first.clients.len(), 1);
        assert_eq!(first.clients[0].name, "Ana");
        assert_eq!(second.clients.len(), 1);
        assert_eq!(second.clients[0].name, "Bruno");

        // Switching back reloads the first ledger.
        store.set_user_profile(UpdateProfileCommand {
            email: Some("a@b.com".to_string()),
            ..UpdateProfileCommand::default()
        });
        assert_eq!(store.state().clients.len(), 1);
        assert_eq!(store.state().clients[0].name, "Ana");
    }

    #[test]
    fn test_failing_store_degrades_silently() {
        struct FailingStore;

        impl KeyValueStore for FailingStore {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Err(anyhow!("read failed"))
            }

            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                Err(anyhow!("write failed"))
            }

            fn remove(&self, _key: &str) -> Result<()> {
                Err(anyhow!("delete failed"))
            }
        }

        let mut store = LedgerStore::new(Arc::new(FailingStore));

        // Persistence is broken, the session keeps working.
        let client = store.add_client(ana()).unwrap();
        store.toggle_payment(&client.id, month("2024-03")).unwrap();
        store.flush();

        assert_eq!(store.state().clients.len(), 1);
        assert!(store.state().clients[0].payments[&month("2024-03")].is_paid());
    }
}
