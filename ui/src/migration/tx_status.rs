//! Status tracking for a single user-triggered transaction

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use super::types::{Transaction, TransactionStatus};
use crate::services::errors::MigrationError;
use crate::utils::platform::now_ms;

/// Coarse lifecycle derived from the raw status reports
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TxState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum TxEvent {
    Started,
    StatusChanged(Transaction),
    Completed,
    Errored(String),
    Cleared,
}

impl TxState {
    pub fn apply(self, event: &TxEvent) -> TxState {
        match (self, event) {
            (_, TxEvent::Cleared) => TxState::Idle,
            (_, TxEvent::Started) => TxState::Running,
            (_, TxEvent::Errored(reason)) => TxState::Failed(reason.clone()),
            (_, TxEvent::StatusChanged(tx)) if tx.status.is_failure() => TxState::Failed(
                tx.status_message
                    .clone()
                    .unwrap_or_else(|| tx.status.label().to_string()),
            ),
            (TxState::Succeeded, TxEvent::StatusChanged(_)) => TxState::Succeeded,
            (_, TxEvent::StatusChanged(_)) => TxState::Running,
            (TxState::Running, TxEvent::Completed) => TxState::Succeeded,
            (state, TxEvent::Completed) => state,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TxState::Running)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransactionTracker {
    pub state: TxState,
    pub status: Option<TransactionStatus>,
    pub status_message: Option<String>,
    pub hash: Option<String>,
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
    pub started_at: Option<f64>,
    pub finished_at: Option<f64>,
    pub is_tx_finished: bool,
    pub is_synchronizing: bool,
}

impl TransactionTracker {
    pub fn apply(&mut self, event: TxEvent, now: f64) {
        match &event {
            TxEvent::Started => {
                self.status = Some(TransactionStatus::IsLoading);
                self.status_message = None;
                self.hash = None;
                self.block_hash = None;
                self.block_number = None;
                self.started_at = Some(now);
                self.finished_at = None;
                self.is_tx_finished = false;
            }
            TxEvent::StatusChanged(tx) => {
                self.status = Some(tx.status);
                self.status_message = tx.status_message.clone();
                // keep earlier hashes when a later report omits them
                if tx.hash.is_some() {
                    self.hash = tx.hash.clone();
                }
                if tx.block_hash.is_some() {
                    self.block_hash = tx.block_hash.clone();
                }
                if tx.block_number.is_some() {
                    self.block_number = tx.block_number;
                }
            }
            TxEvent::Completed => {
                self.is_tx_finished = true;
                self.finished_at = Some(now);
            }
            TxEvent::Errored(message) => {
                self.status = Some(TransactionStatus::Error);
                self.status_message = Some(message.clone());
                self.is_tx_finished = true;
                self.finished_at = Some(now);
            }
            TxEvent::Cleared => {
                let is_synchronizing = self.is_synchronizing;
                *self = TransactionTracker {
                    is_synchronizing,
                    ..Default::default()
                };
                return;
            }
        }
        self.state = std::mem::take(&mut self.state).apply(&event);
    }

    pub fn is_tx_failed(&self) -> bool {
        self.status.map(|s| s.is_failure()).unwrap_or(false)
    }

    pub fn is_tx_running(&self) -> bool {
        self.state.is_running() && !self.is_tx_finished
    }

    pub fn duration_ms(&self) -> Option<f64> {
        Some(self.finished_at? - self.started_at?)
    }
}

/// Shared mutable access to a tracker; the UI backs it with a signal
pub trait TrackerCell: Clone + 'static {
    fn update(&self, f: impl FnOnce(&mut TransactionTracker));
}

impl TrackerCell for Rc<RefCell<TransactionTracker>> {
    fn update(&self, f: impl FnOnce(&mut TransactionTracker)) {
        f(&mut self.borrow_mut());
    }
}

/// Callback a transaction function reports status changes through
pub type StatusCallback = Rc<dyn Fn(Transaction)>;

/// Runs `f(args, on_status)` while recording its progress into `cell`
pub async fn run_transaction<C, F, Fut, A, T>(cell: C, f: F, args: A) -> Option<T>
where
    C: TrackerCell,
    F: FnOnce(A, StatusCallback) -> Fut,
    Fut: Future<Output = Result<T, MigrationError>>,
{
    cell.update(|t| t.apply(TxEvent::Started, now_ms()));

    let reporter = cell.clone();
    let on_status: StatusCallback =
        Rc::new(move |tx| reporter.update(|t| t.apply(TxEvent::StatusChanged(tx), now_ms())));

    match f(args, on_status).await {
        Ok(value) => {
            cell.update(|t| t.apply(TxEvent::Completed, now_ms()));
            Some(value)
        }
        Err(e) => {
            let message = e.to_string();
            cell.update(|t| t.apply(TxEvent::Errored(message), now_ms()));
            None
        }
    }
}

/// Flags the tracker as synchronizing for the duration of `f`
pub async fn update_synchronization<C, Fut, T>(cell: C, f: Fut) -> T
where
    C: TrackerCell,
    Fut: Future<Output = T>,
{
    cell.update(|t| t.is_synchronizing = true);
    let result = f.await;
    cell.update(|t| t.is_synchronizing = false);
    result
}

pub fn clear_tx<C: TrackerCell>(cell: &C) {
    cell.update(|t| t.apply(TxEvent::Cleared, now_ms()));
}
