use dioxus::prelude::*;

use super::use_ledger_store::{use_ledger_store, AppStore};
use crate::migration::{migratable_apps, App, MigratingItem, MigrationResult};

#[derive(Clone, PartialEq)]
pub struct UseMigration {
    store: AppStore,
    pub migratable_apps: Vec<App>,
    pub migrating_items: Vec<MigratingItem>,
    pub success: u32,
    pub fails: u32,
    pub is_migrating: bool,
    pub synchronization_completed: bool,
}

impl UseMigration {
    pub fn migratable_account_count(&self) -> usize {
        self.migratable_apps.iter().map(|a| a.accounts.len()).sum()
    }

    pub async fn migrate_all(&self) {
        self.store.migrate_all().await;
    }

    /// Like [`migrate_all`](Self::migrate_all), returning what this run counted
    pub async fn migrate_all_counted(&self) -> MigrationResult {
        self.store.migrate_all().await
    }

    pub async fn restart_synchronization(&self) {
        self.store.restart_synchronization().await;
    }
}

pub fn use_migration() -> UseMigration {
    let context = use_ledger_store();
    let state = context.state.read();

    UseMigration {
        store: context.store.clone(),
        migratable_apps: migratable_apps(&state.apps),
        migrating_items: state.migrating_items.clone(),
        success: state.migration_result.success,
        fails: state.migration_result.fails,
        is_migrating: state.is_migrating,
        synchronization_completed: state.synchronization_completed,
    }
}
