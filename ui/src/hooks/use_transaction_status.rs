use std::future::Future;

use dioxus::prelude::*;

use crate::migration::tx_status::{self, StatusCallback, TrackerCell, TransactionTracker};
use crate::migration::TransactionStatus;
use crate::services::errors::MigrationError;

impl TrackerCell for Signal<TransactionTracker> {
    fn update(&self, f: impl FnOnce(&mut TransactionTracker)) {
        let mut signal = *self;
        f(&mut signal.write());
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct UseTransactionStatus {
    pub tracker: Signal<TransactionTracker>,
}

impl UseTransactionStatus {
    pub async fn run_transaction<F, Fut, A, T>(&self, f: F, args: A) -> Option<T>
    where
        F: FnOnce(A, StatusCallback) -> Fut,
        Fut: Future<Output = Result<T, MigrationError>>,
    {
        tx_status::run_transaction(self.tracker, f, args).await
    }

    pub async fn update_synchronization<Fut, T>(&self, f: Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        tx_status::update_synchronization(self.tracker, f).await
    }

    pub fn clear_tx(&self) {
        tx_status::clear_tx(&self.tracker);
    }

    pub fn status(&self) -> Option<TransactionStatus> {
        self.tracker.read().status
    }

    pub fn is_tx_finished(&self) -> bool {
        self.tracker.read().is_tx_finished
    }

    pub fn is_tx_failed(&self) -> bool {
        self.tracker.read().is_tx_failed()
    }

    pub fn is_synchronizing(&self) -> bool {
        self.tracker.read().is_synchronizing
    }
}

pub fn use_transaction_status() -> UseTransactionStatus {
    UseTransactionStatus {
        tracker: use_signal(TransactionTracker::default),
    }
}
