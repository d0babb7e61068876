use dioxus::prelude::*;

use super::{AppIcon, TransactionStatusBadge};
use crate::migration::{Address, App, AppStatus};
use crate::services::icons::IconStore;
use crate::utils::format::{format_token_amount, truncate_address};

fn app_status_label(status: &AppStatus) -> &'static str {
    match status {
        AppStatus::Loading => "Synchronizing",
        AppStatus::Synchronized => "Ready",
        AppStatus::Error => "Failed",
        AppStatus::Migrated => "Migrated",
    }
}

/// Balance line shown for an account, e.g. "12.5 KSM"
pub fn balance_text(account: &Address, ticker: &str) -> String {
    match &account.balance {
        Some(balance) => format!(
            "{} {}",
            format_token_amount(balance.total_planck(), balance.decimals),
            ticker
        ),
        None if account.is_loading => "…".to_string(),
        None => "-".to_string(),
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct AppCardProps {
    pub app: App,
    pub icons: Signal<IconStore>,
}

#[component]
pub fn AppCard(props: AppCardProps) -> Element {
    let app = &props.app;
    let status = app_status_label(&app.status);

    rsx! {
        div {
            class: "app-card",
            div {
                class: "app-card-header",
                AppIcon { app_id: app.id.clone(), ticker: app.ticker.clone(), icons: props.icons }
                h3 { class: "app-name", "{app.name}" }
                span { class: "app-status", "{status}" }
            }

            if let Some(error) = &app.error {
                div { class: "app-error", "{error.description}" }
            }

            if app.accounts.is_empty() && app.error.is_none() && app.status != AppStatus::Loading {
                div { class: "app-empty", "No accounts with funds" }
            }

            ul {
                class: "account-list",
                for account in app.accounts.iter() {
                    AccountRow {
                        key: "{account.address}",
                        account: account.clone(),
                        ticker: app.ticker.clone(),
                    }
                }
            }
        }
    }
}

#[component]
pub fn AccountRow(account: Address, ticker: String) -> Element {
    let balance = balance_text(&account, &ticker);
    let source = truncate_address(&account.address, 6);
    let destination = account
        .destination
        .as_deref()
        .map(|d| truncate_address(d, 6))
        .unwrap_or_default();
    let path = account.path.to_string();
    let error = account
        .error
        .as_ref()
        .map(|e| (e.kind.title(), e.description.clone()));

    rsx! {
        li {
            class: if account.migrated { "account-row migrated" } else { "account-row" },
            div {
                class: "account-addresses",
                span { class: "account-address", title: "{account.address}", "{source}" }
                span { class: "account-arrow", "→" }
                span { class: "account-destination", "{destination}" }
            }
            span { class: "account-path", "{path}" }
            span { class: "account-balance", "{balance}" }
            if let Some((title, description)) = error {
                span { class: "account-error", title: "{description}", "{title}" }
            }
            if let Some(transaction) = &account.transaction {
                TransactionStatusBadge { transaction: transaction.clone() }
            }
        }
    }
}
