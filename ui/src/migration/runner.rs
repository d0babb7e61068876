//! Sequential bulk migration

use super::eligibility::migratable_apps;
use super::progress::MigrationEvent;
use super::state::LedgerAction;
use super::storage::{remember, MigrationRecord};
use super::store::LedgerStore;
use super::types::{
    AccountError, Address, App, ErrorSource, MigratingItem, MigrationResult as MigrationCounters, Transaction,
    TransactionStatus,
};
use crate::chain::{ChainApi, Inclusion};
use crate::chain::scale::to_hex;
use crate::ledger::LedgerDevice;
use crate::notifications::NewNotification;
use crate::services::errors::{MigrationError, MigrationResult};
use crate::utils::platform::now_ms;
use crate::{console_info, console_warn};

impl<D: LedgerDevice, C: ChainApi> LedgerStore<D, C> {
    /// Migrates every eligible account, one at a time, in app then
    /// account order. Returns the counters of this run only.
    pub async fn migrate_all(&self) -> MigrationCounters {
        let snapshot = self.snapshot();
        if snapshot.is_migrating {
            console_warn!("[Migrate] Already running");
            return MigrationCounters::default();
        }
        let earlier = snapshot.migration_result;

        let queue: Vec<(App, Address)> = migratable_apps(&snapshot.apps)
            .into_iter()
            .flat_map(|app| {
                let accounts = app.accounts.clone();
                accounts.into_iter().map(move |account| (app.clone(), account))
            })
            .collect();

        if queue.is_empty() {
            console_info!("[Migrate] Nothing to migrate");
            return MigrationCounters::default();
        }

        self.dispatch(LedgerAction::SetMigrating(true));
        self.emit(MigrationEvent::Started { total: queue.len() });

        for (app, account) in queue {
            if !account.has_balance() {
                self.emit(MigrationEvent::ItemSkipped {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                    reason: "empty balance".to_string(),
                });
                continue;
            }
            self.migrate_one(&app, &account).await;
        }

        self.dispatch(LedgerAction::SetMigrating(false));

        let result = self.snapshot().migration_result.since(earlier);
        self.emit(MigrationEvent::Completed { result });
        if result.total() == 0 {
            return result;
        }
        if result.fails == 0 {
            self.notify(
                NewNotification::success(
                    "Migration finished",
                    format!("{} accounts moved to the Polkadot app.", result.success),
                )
                .auto_hide(8000),
            );
        } else {
            self.notify(NewNotification::warning(
                "Migration finished with errors",
                format!(
                    "{} succeeded, {} failed. Failed accounts can be retried.",
                    result.success, result.fails
                ),
            ));
        }
        result
    }

    async fn migrate_one(&self, app: &App, account: &Address) {
        self.emit(MigrationEvent::ItemBegun {
            app_id: app.id.clone(),
            account: account.address.clone(),
        });
        self.dispatch(LedgerAction::AddMigratingItem(MigratingItem {
            app_id: app.id.clone(),
            app_name: app.name.clone(),
            account: account.address.clone(),
            destination: account.destination.clone(),
            transaction: Transaction::new(TransactionStatus::IsLoading),
        }));

        match self.run_migration(app, account).await {
            Ok(transaction) => {
                console_info!("[Migrate] {} on {}: {}", account.address, app.id, transaction.status.label());
                remember(MigrationRecord {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                    destination: account.destination.clone().unwrap_or_default(),
                    status: transaction.status,
                    tx_hash: transaction.hash.clone(),
                    block_number: transaction.block_number,
                    timestamp: now_ms(),
                });
                self.emit(MigrationEvent::ItemCompleted {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                    success: true,
                    message: transaction.status_message.clone(),
                });
                self.update_transaction(app, account, transaction);
                self.dispatch(LedgerAction::RecordMigrationSuccess {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                });
            }
            Err(e) => {
                let message = e.to_string();
                self.emit(MigrationEvent::ItemCompleted {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                    success: false,
                    message: Some(message.clone()),
                });
                self.update_transaction(
                    app,
                    account,
                    Transaction::new(TransactionStatus::Error).with_message(message.clone()),
                );
                self.dispatch(LedgerAction::RecordMigrationFailure {
                    app_id: app.id.clone(),
                    account: account.address.clone(),
                    error: AccountError::new(ErrorSource::Migration, e.ledger_kind(), message),
                });
            }
        }
    }

    fn update_transaction(&self, app: &App, account: &Address, transaction: Transaction) {
        self.emit(MigrationEvent::ItemStatus {
            app_id: app.id.clone(),
            account: account.address.clone(),
            status: transaction.status,
        });
        self.dispatch(LedgerAction::UpdateTransaction {
            app_id: app.id.clone(),
            account: account.address.clone(),
            transaction,
        });
    }

    /// Build, sign, submit and watch one transfer-all; the returned
    /// transaction carries the final status
    async fn run_migration(&self, app: &App, account: &Address) -> MigrationResult<Transaction> {
        let chain = self
            .config()
            .chain(&app.id)
            .cloned()
            .ok_or_else(|| MigrationError::Configuration {
                field: "chain".to_string(),
                value: app.id.clone(),
            })?;
        let destination = account.destination.clone().ok_or_else(|| MigrationError::MigrationStep {
            step: "destination".to_string(),
            reason: format!("no universal address derived for {}", account.address),
        })?;

        let prepared = self
            .inner
            .chain
            .prepare_migration(&chain, &account.address, &destination)
            .await?;

        self.update_transaction(
            app,
            account,
            Transaction::new(TransactionStatus::IsLoading).with_message("Review and approve on your Ledger"),
        );
        let signature = self
            .inner
            .device
            .sign(&account.path, &prepared.signing_payload(), &prepared.metadata_proof)
            .await?;

        let signer = prepared.signer;
        let submitted = self.inner.chain.submit_migration(&chain, prepared, &signature).await?;
        let mut pending = Transaction::new(TransactionStatus::Pending).with_message("Waiting for inclusion");
        pending.hash = Some(submitted.tx_hash_hex());
        self.update_transaction(app, account, pending.clone());

        let mut done = pending;
        match self.inner.chain.wait_for_inclusion(&chain, &submitted).await? {
            Inclusion::InBlock {
                block_hash,
                block_number,
            } => {
                done.block_hash = Some(to_hex(&block_hash));
                done.block_number = Some(block_number);
                done.status = TransactionStatus::InBlock;
                done.status_message = Some(format!("Included in block #{}", block_number));
                self.update_transaction(app, account, done.clone());

                if !self.inner.chain.confirm_dispatch(&chain, &signer, &block_hash).await? {
                    return Err(MigrationError::MigrationStep {
                        step: "dispatch".to_string(),
                        reason: format!(
                            "transfer failed on chain in block #{} ({})",
                            block_number,
                            submitted.tx_hash_hex()
                        ),
                    });
                }
                done.status = TransactionStatus::Success;
            }
            Inclusion::NotSeen { last_checked } => {
                done.status = TransactionStatus::Warning;
                done.status_message = Some(format!(
                    "Not seen in a block up to #{}; check the explorer before retrying",
                    last_checked
                ));
            }
        }
        Ok(done)
    }
}
