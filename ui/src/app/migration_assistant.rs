use dioxus::prelude::*;

use crate::components::steps::{ConnectStep, MigrateStep, SynchronizeStep};
use crate::components::Toast;
use crate::hooks::{use_ledger_provider, use_notifications_provider, use_tabs, TabGate, WizardTab};
use crate::services::config::get_global_config;
use crate::services::icons::IconStore;
use crate::utils::platform::page_origin;
use crate::{console_info, console_warn};

const MIGRATION_ASSISTANT_CSS: Asset = asset!("/assets/styling/migration_assistant.css");

fn icon_base_url(path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", page_origin().unwrap_or_default(), path)
    } else {
        path.to_string()
    }
}

#[component]
pub fn MigrationAssistant() -> Element {
    let notifications = use_notifications_provider();
    let context = use_ledger_provider(notifications.queue);
    let mut icons = use_context_provider(|| Signal::new(IconStore::new()));
    let mut tabs = use_tabs();

    use_future(move || async move {
        let config = get_global_config();
        if let Err(e) = config.validate() {
            console_warn!("[Assistant] Invalid configuration: {}", e);
        }

        let app_ids: Vec<String> = config.chains.iter().map(|c| c.id.clone()).collect();
        let mut store = icons.peek().clone();
        store
            .load_initial_icons(&icon_base_url(&config.endpoints.icon_base_path), &app_ids)
            .await;
        console_info!("[Assistant] {} of {} app icons loaded", store.len(), app_ids.len());
        icons.set(store);
    });

    // Losing the device or clearing results sends the wizard back
    let ledger_state = context.state;
    use_effect(move || {
        let gate = TabGate::from_state(&ledger_state.read());
        tabs.write().settle(gate);
    });

    #[cfg(target_arch = "wasm32")]
    use_effect(|| {
        let history = crate::migration::storage::LocalStorageManager::get_history();
        if !history.records.is_empty() {
            console_info!("[Assistant] {} earlier migrations on record", history.records.len());
        }
    });

    let gate = TabGate::from_state(&ledger_state.read());
    let active = tabs.read().active();
    let tab_items: Vec<(WizardTab, usize, &'static str, &'static str, bool)> = WizardTab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == active {
                "wizard-tab active"
            } else if gate.allows(tab) {
                "wizard-tab"
            } else {
                "wizard-tab locked"
            };
            (tab, tab.index() + 1, tab.label(), class, gate.allows(tab))
        })
        .collect();

    rsx! {
        document::Link { rel: "stylesheet", href: MIGRATION_ASSISTANT_CSS }

        div {
            class: "migration-assistant-container",

            h1 { class: "migration-title", "Ledger Migration Assistant" }

            nav {
                class: "wizard-tabs",
                for (tab, number, label, class, allowed) in tab_items {
                    button {
                        key: "{number}",
                        class: class,
                        disabled: !allowed,
                        onclick: move |_| {
                            tabs.write().go_to(tab, gate);
                        },
                        span { class: "tab-index", "{number}" }
                        "{label}"
                    }
                }
            }

            {match active {
                WizardTab::Connect => rsx! { ConnectStep { tabs: tabs } },
                WizardTab::Synchronize => rsx! { SynchronizeStep { tabs: tabs } },
                WizardTab::Migrate => rsx! { MigrateStep { tabs: tabs } },
            }}

            Toast {}
        }
    }
}
