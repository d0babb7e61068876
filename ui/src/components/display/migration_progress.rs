use dioxus::prelude::*;

use super::TransactionStatusBadge;
use crate::migration::{MigratingItem, MigrationResult};
use crate::utils::format::truncate_address;

#[derive(Props, PartialEq, Clone)]
pub struct MigrationProgressDialogProps {
    pub items: Vec<MigratingItem>,
    pub result: MigrationResult,
    pub percentage: f64,
    pub is_migrating: bool,
    pub on_close: EventHandler<()>,
}

#[component]
pub fn MigrationProgressDialog(props: MigrationProgressDialogProps) -> Element {
    let percentage = props.percentage;
    let on_close = props.on_close;

    rsx! {
        div {
            class: "dialog-backdrop",
            div {
                class: "dialog migration-progress",

                h3 { class: "dialog-title", "Migration progress" }

                div {
                    class: "progress-bar-container",
                    div {
                        class: "progress-bar-background",
                        div {
                            class: "progress-bar-fill",
                            style: format!("width: {}%", percentage),
                        }
                    }
                    span { class: "progress-percentage", "{percentage:.0}%" }
                }

                div {
                    class: "progress-counters",
                    span { class: "counter-success", "✅ {props.result.success} migrated" }
                    span { class: "counter-fails", "❌ {props.result.fails} failed" }
                }

                ul {
                    class: "progress-items",
                    for item in props.items.iter() {
                        li {
                            key: "{item.app_id}-{item.account}",
                            class: "progress-item",
                            span { class: "progress-app", "{item.app_name}" }
                            span { class: "progress-account", {truncate_address(&item.account, 6)} }
                            TransactionStatusBadge { transaction: item.transaction.clone() }
                            if let Some(message) = &item.transaction.status_message {
                                span { class: "progress-message", "{message}" }
                            }
                        }
                    }
                }

                button {
                    class: "button button-secondary button-md",
                    disabled: props.is_migrating,
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }
        }
    }
}
