use super::types::*;

/// Everything the assistant knows about the device, apps and the current run
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LedgerState {
    pub connection: DeviceConnection,
    pub apps: Vec<App>,
    pub migrating_items: Vec<MigratingItem>,
    pub migration_result: MigrationResult,
    pub is_synchronizing: bool,
    pub synchronization_completed: bool,
    pub is_migrating: bool,
}

// Action enum for state mutations
#[derive(Clone, Debug)]
pub enum LedgerAction {
    // Device
    SetConnection(DeviceConnection),
    ClearConnection,

    // Synchronization
    SetSynchronizing(bool),
    StartSynchronization(Vec<App>),
    SetAppAccounts {
        app_id: String,
        accounts: Vec<Address>,
    },
    SetAppError {
        app_id: String,
        error: AccountError,
    },
    SetSynchronizationCompleted(bool),
    ClearSynchronization,

    // Migration
    SetMigrating(bool),
    AddMigratingItem(MigratingItem),
    UpdateTransaction {
        app_id: String,
        account: String,
        transaction: Transaction,
    },
    RecordMigrationSuccess {
        app_id: String,
        account: String,
    },
    RecordMigrationFailure {
        app_id: String,
        account: String,
        error: AccountError,
    },
}

impl LedgerState {
    pub fn reduce_in_place(&mut self, action: LedgerAction) {
        match action {
            LedgerAction::SetConnection(connection) => {
                self.connection = connection;
            }
            LedgerAction::ClearConnection => {
                self.connection = DeviceConnection::default();
            }

            LedgerAction::SetSynchronizing(value) => {
                self.is_synchronizing = value;
            }
            LedgerAction::StartSynchronization(apps) => {
                self.apps = apps;
                self.synchronization_completed = false;
            }
            LedgerAction::SetAppAccounts { app_id, accounts } => {
                if let Some(app) = self.app_mut(&app_id) {
                    app.accounts = accounts;
                    app.status = AppStatus::Synchronized;
                    app.error = None;
                }
            }
            LedgerAction::SetAppError { app_id, error } => {
                if let Some(app) = self.app_mut(&app_id) {
                    app.status = AppStatus::Error;
                    app.error = Some(error);
                }
            }
            LedgerAction::SetSynchronizationCompleted(value) => {
                self.synchronization_completed = value;
            }
            LedgerAction::ClearSynchronization => {
                self.apps.clear();
                self.migrating_items.clear();
                self.migration_result = MigrationResult::default();
                self.synchronization_completed = false;
                self.is_synchronizing = false;
            }

            LedgerAction::SetMigrating(value) => {
                self.is_migrating = value;
            }
            LedgerAction::AddMigratingItem(item) => {
                self.migrating_items
                    .retain(|existing| !(existing.app_id == item.app_id && existing.account == item.account));
                self.migrating_items.push(item);
            }
            LedgerAction::UpdateTransaction {
                app_id,
                account,
                transaction,
            } => {
                if let Some(item) = self
                    .migrating_items
                    .iter_mut()
                    .find(|i| i.app_id == app_id && i.account == account)
                {
                    item.transaction = transaction.clone();
                }
                if let Some(address) = self.account_mut(&app_id, &account) {
                    address.is_loading = !transaction.status.is_final();
                    address.transaction = Some(transaction);
                }
            }
            LedgerAction::RecordMigrationSuccess { app_id, account } => {
                self.migration_result.success += 1;
                if let Some(address) = self.account_mut(&app_id, &account) {
                    address.migrated = true;
                    address.is_loading = false;
                    address.error = None;
                }
                if let Some(app) = self.app_mut(&app_id) {
                    if !app.accounts.is_empty() && app.accounts.iter().all(|a| a.migrated || !a.has_balance()) {
                        app.status = AppStatus::Migrated;
                    }
                }
            }
            LedgerAction::RecordMigrationFailure {
                app_id,
                account,
                error,
            } => {
                self.migration_result.fails += 1;
                if let Some(address) = self.account_mut(&app_id, &account) {
                    address.is_loading = false;
                    address.error = Some(error);
                }
            }
        }
    }

    pub fn app(&self, app_id: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.id == app_id)
    }

    fn app_mut(&mut self, app_id: &str) -> Option<&mut App> {
        self.apps.iter_mut().find(|a| a.id == app_id)
    }

    fn account_mut(&mut self, app_id: &str, account: &str) -> Option<&mut Address> {
        self.app_mut(app_id).and_then(|app| app.account_mut(account))
    }

    pub fn total_accounts(&self) -> usize {
        self.apps.iter().map(|a| a.accounts.len()).sum()
    }

    /// Share of migrating items that reached a final status
    pub fn migration_percentage(&self) -> f64 {
        if self.migrating_items.is_empty() {
            return 0.0;
        }
        let done = self
            .migrating_items
            .iter()
            .filter(|i| i.transaction.status.is_final())
            .count();
        done as f64 / self.migrating_items.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Bip44Path;
    use crate::services::errors::LedgerErrorKind;

    fn funded(address: &str) -> Address {
        let mut account = Address::new(address, "0x00", Bip44Path::new(434, 0));
        account.balance = Some(AccountBalance {
            free: "1".to_string(),
            reserved: "0".to_string(),
            locked: "0".to_string(),
            decimals: 12,
        });
        account
    }

    fn synchronized_state() -> LedgerState {
        let mut state = LedgerState::default();
        state.reduce_in_place(LedgerAction::StartSynchronization(vec![App::loading(
            "kusama", "Kusama", "KSM", 12,
        )]));
        state.reduce_in_place(LedgerAction::SetAppAccounts {
            app_id: "kusama".to_string(),
            accounts: vec![funded("A"), funded("B")],
        });
        state
    }

    #[test]
    fn test_counters_only_grow_during_run() {
        let mut state = synchronized_state();
        state.reduce_in_place(LedgerAction::RecordMigrationSuccess {
            app_id: "kusama".to_string(),
            account: "A".to_string(),
        });
        state.reduce_in_place(LedgerAction::RecordMigrationFailure {
            app_id: "kusama".to_string(),
            account: "B".to_string(),
            error: AccountError::from_kind(ErrorSource::Migration, LedgerErrorKind::TransactionRejected),
        });

        assert_eq!(state.migration_result, MigrationResult { success: 1, fails: 1 });
        let app = state.app("kusama").unwrap();
        assert_eq!(app.status, AppStatus::Synchronized);
        assert!(app.accounts[0].migrated);
        assert_eq!(app.accounts[1].error.as_ref().unwrap().source, ErrorSource::Migration);
    }

    #[test]
    fn test_app_migrated_when_all_accounts_done() {
        let mut state = synchronized_state();
        for account in ["A", "B"] {
            state.reduce_in_place(LedgerAction::RecordMigrationSuccess {
                app_id: "kusama".to_string(),
                account: account.to_string(),
            });
        }
        assert_eq!(state.app("kusama").unwrap().status, AppStatus::Migrated);
    }

    #[test]
    fn test_clear_synchronization_resets_run() {
        let mut state = synchronized_state();
        state.reduce_in_place(LedgerAction::AddMigratingItem(MigratingItem {
            app_id: "kusama".to_string(),
            app_name: "Kusama".to_string(),
            account: "A".to_string(),
            destination: None,
            transaction: Transaction::new(TransactionStatus::IsLoading),
        }));
        state.reduce_in_place(LedgerAction::RecordMigrationSuccess {
            app_id: "kusama".to_string(),
            account: "A".to_string(),
        });

        state.reduce_in_place(LedgerAction::ClearSynchronization);
        assert!(state.apps.is_empty());
        assert!(state.migrating_items.is_empty());
        assert_eq!(state.migration_result, MigrationResult::default());
        assert!(!state.synchronization_completed);
    }

    #[test]
    fn test_update_transaction_tracks_loading() {
        let mut state = synchronized_state();
        state.reduce_in_place(LedgerAction::AddMigratingItem(MigratingItem {
            app_id: "kusama".to_string(),
            app_name: "Kusama".to_string(),
            account: "A".to_string(),
            destination: Some("D".to_string()),
            transaction: Transaction::new(TransactionStatus::IsLoading),
        }));

        state.reduce_in_place(LedgerAction::UpdateTransaction {
            app_id: "kusama".to_string(),
            account: "A".to_string(),
            transaction: Transaction::new(TransactionStatus::Pending),
        });
        assert!(state.app("kusama").unwrap().accounts[0].is_loading);
        assert_eq!(state.migration_percentage(), 0.0);

        state.reduce_in_place(LedgerAction::UpdateTransaction {
            app_id: "kusama".to_string(),
            account: "A".to_string(),
            transaction: Transaction::new(TransactionStatus::Success),
        });
        assert!(!state.app("kusama").unwrap().accounts[0].is_loading);
        assert_eq!(state.migration_percentage(), 100.0);
    }
}
