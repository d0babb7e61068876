//! Dioxus hooks over the ledger store
//!
//! [`use_ledger_provider`] creates the store once at the top of the wizard;
//! the other hooks read it from context and expose the slice each step needs.

pub mod use_connection;
pub mod use_ledger_store;
pub mod use_migration;
pub mod use_notifications;
pub mod use_tabs;
pub mod use_transaction_status;

pub use use_connection::{connect_device, use_connection, UseConnection};
pub use use_ledger_store::{use_ledger_provider, use_ledger_store, AppDevice, AppStore, LedgerContext, SignalNotifier};
pub use use_migration::{use_migration, UseMigration};
pub use use_notifications::{use_notifications, use_notifications_provider, UseNotifications};
pub use use_tabs::{use_tabs, TabController, TabGate, WizardTab};
pub use use_transaction_status::{use_transaction_status, UseTransactionStatus};
