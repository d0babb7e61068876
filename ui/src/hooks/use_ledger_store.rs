use std::rc::Rc;

use dioxus::prelude::*;

use crate::chain::SubstrateChainApi;
use crate::ledger::{DefaultOpener, LedgerHardware};
use crate::migration::{LedgerState, LedgerStore};
use crate::notifications::{NewNotification, NotificationQueue, Notifier};
use crate::services::config::get_global_config;
use crate::utils::platform::now_ms;

pub type AppDevice = LedgerHardware<DefaultOpener>;
pub type AppStore = LedgerStore<AppDevice, SubstrateChainApi>;

/// The store plus a signal mirroring its state for rendering
#[derive(Clone, PartialEq)]
pub struct LedgerContext {
    pub store: AppStore,
    pub state: Signal<LedgerState>,
}

/// Pushes store notifications into the toast queue signal
pub struct SignalNotifier(pub Signal<NotificationQueue>);

impl Notifier for SignalNotifier {
    fn notify(&self, notification: NewNotification) {
        let mut queue = self.0;
        queue.write().push(notification, now_ms());
    }
}

/// Creates the store once for the component tree below the caller
pub fn use_ledger_provider(notifications: Signal<NotificationQueue>) -> LedgerContext {
    use_context_provider(move || {
        let config = get_global_config();
        let store = AppStore::new(
            LedgerHardware::new(DefaultOpener::default()),
            SubstrateChainApi::from_config(&config),
            config,
            Rc::new(SignalNotifier(notifications)),
        );

        let state = Signal::new(store.snapshot());
        store.subscribe(move |snapshot| {
            let mut state = state;
            state.set(snapshot.clone());
        });

        LedgerContext { store, state }
    })
}

pub fn use_ledger_store() -> LedgerContext {
    use_context::<LedgerContext>()
}
