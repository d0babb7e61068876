use dioxus::prelude::*;

use crate::components::buttons::{Button, ButtonVariant};
use crate::components::display::{AppCard, LoadingIndicator};
use crate::hooks::{use_ledger_store, use_migration, use_transaction_status, TabController, TabGate, WizardTab};
use crate::services::icons::IconStore;

#[derive(Props, PartialEq, Clone)]
pub struct SynchronizeStepProps {
    pub tabs: Signal<TabController>,
}

#[component]
pub fn SynchronizeStep(props: SynchronizeStepProps) -> Element {
    let mut tabs = props.tabs;
    let context = use_ledger_store();
    let migration = use_migration();
    let icons = use_context::<Signal<IconStore>>();
    let tx = use_transaction_status();

    let state = context.state.read();
    let apps = state.apps.clone();
    let is_synchronizing = state.is_synchronizing;
    let total_accounts = state.total_accounts();
    let gate = TabGate::from_state(&state);
    drop(state);

    let eligible = migration.migratable_account_count();

    let on_restart = {
        let migration = migration.clone();
        move |_: MouseEvent| {
            let migration = migration.clone();
            spawn(async move {
                tx.update_synchronization(migration.restart_synchronization()).await;
            });
        }
    };

    rsx! {
        div {
            class: "wizard-step synchronize-step",

            h2 { class: "step-title", "Synchronize accounts" }

            if is_synchronizing {
                LoadingIndicator { message: "Reading accounts and balances from your Ledger...".to_string() }
            } else if migration.synchronization_completed {
                p {
                    class: "step-summary",
                    "Found {total_accounts} accounts, {eligible} ready to migrate."
                }
            }

            div {
                class: "app-grid",
                for app in apps {
                    AppCard { key: "{app.id}", app: app.clone(), icons: icons }
                }
            }

            div {
                class: "button-section",
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: is_synchronizing || tx.is_synchronizing() || !gate.device_ready,
                    onclick: on_restart,
                    "Synchronize again"
                }
                Button {
                    disabled: !gate.allows(WizardTab::Migrate) || eligible == 0,
                    onclick: move |_: MouseEvent| {
                        tabs.write().go_to(WizardTab::Migrate, gate);
                    },
                    "Continue"
                }
            }
        }
    }
}
