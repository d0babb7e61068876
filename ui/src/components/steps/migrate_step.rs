use dioxus::prelude::*;

use crate::components::buttons::{Button, ButtonVariant};
use crate::components::display::{AppCard, MigrationProgressDialog};
use crate::hooks::{use_ledger_store, use_migration, use_transaction_status, TabController, UseMigration};
use crate::migration::tx_status::StatusCallback;
use crate::migration::{Transaction, TransactionStatus};
use crate::services::errors::MigrationError;
use crate::services::icons::IconStore;

/// Runs the bulk migration and reports its outcome as one transaction
async fn run_bulk_migration(
    migration: UseMigration,
    on_status: StatusCallback,
) -> Result<(u32, u32), MigrationError> {
    on_status(Transaction::new(TransactionStatus::Pending).with_message("Migrating accounts"));
    let result = migration.migrate_all_counted().await;
    let (success, fails) = (result.success, result.fails);
    let status = if fails == 0 {
        TransactionStatus::Success
    } else {
        TransactionStatus::Warning
    };
    on_status(Transaction::new(status).with_message(format!("{} migrated, {} failed", success, fails)));
    Ok((success, fails))
}

#[derive(Props, PartialEq, Clone)]
pub struct MigrateStepProps {
    pub tabs: Signal<TabController>,
}

#[component]
pub fn MigrateStep(props: MigrateStepProps) -> Element {
    let mut tabs = props.tabs;
    let context = use_ledger_store();
    let migration = use_migration();
    let icons = use_context::<Signal<IconStore>>();
    let tx = use_transaction_status();
    let mut show_progress = use_signal(|| false);

    let percentage = context.state.read().migration_percentage();
    let result = context.state.read().migration_result;
    let accounts = migration.migratable_account_count();
    let run_summary = {
        let tracker = tx.tracker.read();
        let message = tracker.status_message.clone().unwrap_or_default();
        match tracker.duration_ms() {
            Some(ms) => format!("{} in {:.0}s", message, ms / 1000.0),
            None => message,
        }
    };

    let on_migrate = {
        let migration = migration.clone();
        move |_: MouseEvent| {
            let migration = migration.clone();
            show_progress.set(true);
            tx.clear_tx();
            spawn(async move {
                tx.run_transaction(run_bulk_migration, migration).await;
            });
        }
    };

    rsx! {
        div {
            class: "wizard-step migrate-step",

            h2 { class: "step-title", "Migrate to the Polkadot app" }

            p {
                class: "step-summary",
                "{accounts} accounts will be moved to addresses of the Polkadot app. Approve each transfer on your Ledger."
            }

            div {
                class: "app-grid",
                for app in migration.migratable_apps.iter() {
                    AppCard { key: "{app.id}", app: app.clone(), icons: icons }
                }
            }

            if tx.is_tx_finished() {
                div {
                    class: if tx.is_tx_failed() { "migration-summary failed" } else { "migration-summary" },
                    "{run_summary}"
                }
            }

            div {
                class: "button-section",
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: migration.is_migrating,
                    onclick: move |_: MouseEvent| {
                        tabs.write().previous();
                    },
                    "Back"
                }
                Button {
                    loading: migration.is_migrating,
                    disabled: accounts == 0,
                    onclick: on_migrate,
                    if result.fails > 0 { "Retry failed" } else { "Migrate all" }
                }
            }

            if show_progress() {
                MigrationProgressDialog {
                    items: migration.migrating_items.clone(),
                    result: result,
                    percentage: percentage,
                    is_migrating: migration.is_migrating,
                    on_close: move |_| show_progress.set(false),
                }
            }
        }
    }
}
