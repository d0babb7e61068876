use serde::{Deserialize, Serialize};

use super::types::TransactionStatus;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const HISTORY_KEY: &str = "ledger_migration_history";
const MAX_HISTORY: usize = 50;

/// One migrated account, kept so the user can find the transaction later
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MigrationRecord {
    pub app_id: String,
    pub account: String,
    pub destination: String,
    pub status: TransactionStatus,
    pub tx_hash: Option<String>,
    pub block_number: Option<u64>,
    pub timestamp: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MigrationHistory {
    pub records: Vec<MigrationRecord>,
}

impl MigrationHistory {
    /// Appends `record`, dropping the oldest entries past the cap
    pub fn push(&mut self, record: MigrationRecord) {
        self.records.push(record);
        if self.records.len() > MAX_HISTORY {
            let excess = self.records.len() - MAX_HISTORY;
            self.records.drain(..excess);
        }
    }

    pub fn for_account<'a>(&'a self, account: &'a str) -> impl Iterator<Item = &'a MigrationRecord> {
        self.records.iter().filter(move |r| r.account == account)
    }
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorageManager;

#[cfg(target_arch = "wasm32")]
impl LocalStorageManager {
    pub fn get_history() -> MigrationHistory {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::get(HISTORY_KEY).unwrap_or_default()
    }

    pub fn append_record(record: MigrationRecord) -> Result<(), gloo_storage::errors::StorageError> {
        use gloo_storage::{LocalStorage, Storage};
        let mut history = Self::get_history();
        history.push(record);
        LocalStorage::set(HISTORY_KEY, &history)
    }

    pub fn clear_history() {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::delete(HISTORY_KEY);
    }
}

/// Persists a record in browser storage
#[cfg(target_arch = "wasm32")]
pub fn remember(record: MigrationRecord) {
    if let Err(e) = LocalStorageManager::append_record(record) {
        crate::console_warn!("[Storage] Failed to save migration record: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remember(record: MigrationRecord) {
    crate::console_debug!("[Storage] Migration record for {} not persisted", record.account);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account: &str) -> MigrationRecord {
        MigrationRecord {
            app_id: "kusama".to_string(),
            account: account.to_string(),
            destination: "dest".to_string(),
            status: TransactionStatus::Success,
            tx_hash: Some("0x01".to_string()),
            block_number: Some(7),
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = MigrationHistory::default();
        for i in 0..(MAX_HISTORY + 5) {
            history.push(record(&format!("acct-{}", i)));
        }
        assert_eq!(history.records.len(), MAX_HISTORY);
        assert_eq!(history.records[0].account, "acct-5");
    }

    #[test]
    fn test_records_serialize() {
        let mut history = MigrationHistory::default();
        history.push(record("a"));
        history.push(record("b"));
        let json = serde_json::to_string(&history).unwrap();
        let restored: MigrationHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.for_account("b").count(), 1);
    }
}
