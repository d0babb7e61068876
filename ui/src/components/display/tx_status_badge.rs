use dioxus::prelude::*;

use crate::migration::{Transaction, TransactionStatus};

pub fn status_class(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::IsLoading | TransactionStatus::Pending => "tx-badge tx-running",
        TransactionStatus::InBlock => "tx-badge tx-in-block",
        TransactionStatus::Finalized | TransactionStatus::Success => "tx-badge tx-success",
        TransactionStatus::Warning => "tx-badge tx-warning",
        TransactionStatus::Failed | TransactionStatus::Error => "tx-badge tx-failed",
    }
}

#[component]
pub fn TransactionStatusBadge(transaction: Transaction) -> Element {
    let class = status_class(transaction.status);
    let label = transaction.status.label();

    rsx! {
        span {
            class: class,
            title: transaction.status_message.clone().unwrap_or_default(),
            "{label}"
        }
    }
}
