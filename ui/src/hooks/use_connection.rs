use dioxus::prelude::*;

use super::use_ledger_store::{use_ledger_store, AppStore};
use crate::chain::ChainApi;
use crate::ledger::LedgerDevice;
use crate::migration::LedgerStore;

/// Connects and, when the Polkadot app is open, synchronizes right away.
/// Resolves to whether synchronization was started.
pub async fn connect_device<D: LedgerDevice, C: ChainApi>(store: &LedgerStore<D, C>) -> bool {
    let result = store.connect_ledger().await;
    if result.connected && result.is_app_open {
        store.synchronize_accounts().await;
        true
    } else {
        false
    }
}

#[derive(Clone, PartialEq)]
pub struct UseConnection {
    store: AppStore,
    pub is_ledger_connected: bool,
    pub is_app_open: bool,
    pub app_name: Option<String>,
}

impl UseConnection {
    pub async fn connect_device(&self) -> bool {
        connect_device(&self.store).await
    }

    pub async fn disconnect_device(&self) {
        self.store.disconnect_ledger().await;
    }
}

pub fn use_connection() -> UseConnection {
    let context = use_ledger_store();
    let connection = context.state.read().connection.clone();

    UseConnection {
        store: context.store,
        is_ledger_connected: connection.is_connected(),
        is_app_open: connection.is_app_open,
        app_name: connection.app_name,
    }
}
