//! Ledger migration assistant: state store, device and chain clients, and
//! the Dioxus components of the web app.

pub mod app;
pub use app::{Landing, MigrationAssistant};

pub mod chain;
pub mod components;
pub mod hooks;
pub mod ledger;
pub mod migration;
pub mod notifications;
pub mod services;
pub mod utils;
