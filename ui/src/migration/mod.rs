//! Ledger account migration
//!
//! # Architecture
//!
//! [`LedgerStore`] owns a [`LedgerState`] and is the only place it changes:
//!
//! - **Connection**: opens the device and checks the Polkadot app is running
//! - **Synchronization**: derives accounts per legacy app with their universal
//!   destinations and fetches balances
//! - **Migration**: signs and submits one `transfer_all` per eligible
//!   account, tracking each transaction until it lands in a block

pub mod eligibility;
pub mod progress;
pub mod runner;
pub mod state;
pub mod storage;
pub mod store;
pub mod synchronization;
pub mod tx_status;
pub mod types;

pub use eligibility::{is_migratable, migratable_apps};
pub use progress::*;
pub use state::{LedgerAction, LedgerState};
pub use store::{LedgerStore, SubscriptionId};
pub use tx_status::{TransactionTracker, TxEvent, TxState};
pub use types::*;

#[cfg(test)]
mod store_test;
