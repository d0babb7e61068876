//! The single controller owning assistant state
//!
//! Every mutation goes through [`LedgerStore::dispatch`], which reduces the
//! action in place and then notifies subscribers with a fresh snapshot.
//! No `RefCell` borrow is held across an `.await`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::progress::{LoggingEventHandler, MigrationEvent, MigrationEventHandler};
use super::state::{LedgerAction, LedgerState};
use super::types::{ConnectionResult, DeviceConnection};
use crate::chain::ChainApi;
use crate::ledger::LedgerDevice;
use crate::notifications::{NewNotification, Notifier};
use crate::services::config::AssistantConfig;
use crate::{console_info, console_warn};

pub type SubscriptionId = u64;

type Listener = Rc<dyn Fn(&LedgerState)>;

pub(crate) struct StoreInner<D, C> {
    pub(crate) state: RefCell<LedgerState>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<SubscriptionId>,
    pub(crate) device: D,
    pub(crate) chain: C,
    pub(crate) config: AssistantConfig,
    pub(crate) notifier: Rc<dyn Notifier>,
    pub(crate) events: Rc<dyn MigrationEventHandler>,
}

/// Cheap to clone; clones share the same state
pub struct LedgerStore<D: LedgerDevice, C: ChainApi> {
    pub(crate) inner: Rc<StoreInner<D, C>>,
}

impl<D: LedgerDevice, C: ChainApi> Clone for LedgerStore<D, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: LedgerDevice, C: ChainApi> PartialEq for LedgerStore<D, C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<D: LedgerDevice, C: ChainApi> LedgerStore<D, C> {
    pub fn new(device: D, chain: C, config: AssistantConfig, notifier: Rc<dyn Notifier>) -> Self {
        Self::with_event_handler(device, chain, config, notifier, Rc::new(LoggingEventHandler))
    }

    pub fn with_event_handler(
        device: D,
        chain: C,
        config: AssistantConfig,
        notifier: Rc<dyn Notifier>,
        events: Rc<dyn MigrationEventHandler>,
    ) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(LedgerState::default()),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(1),
                device,
                chain,
                config,
                notifier,
                events,
            }),
        }
    }

    pub fn snapshot(&self) -> LedgerState {
        self.inner.state.borrow().clone()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }

    pub fn subscribe(&self, listener: impl Fn(&LedgerState) + 'static) -> SubscriptionId {
        let id = self.inner.next_subscription.get();
        self.inner.next_subscription.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    pub fn dispatch(&self, action: LedgerAction) {
        self.inner.state.borrow_mut().reduce_in_place(action);

        // Listeners may read the store or subscribe again, so nothing stays borrowed
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    pub(crate) fn notify(&self, notification: NewNotification) {
        self.inner.notifier.notify(notification);
    }

    pub(crate) fn emit(&self, event: MigrationEvent) {
        self.inner.events.handle_event(event);
    }

    /// Opens the device and reports whether the generic app is running
    pub async fn connect_ledger(&self) -> ConnectionResult {
        match self.inner.device.connect().await {
            Ok(status) => {
                self.dispatch(LedgerAction::SetConnection(DeviceConnection {
                    has_transport: true,
                    has_generic_app: true,
                    is_app_open: status.is_app_open,
                    app_name: Some(status.app.name.clone()),
                    app_version: status.version.as_ref().map(|v| v.to_string()),
                    error: None,
                }));

                if !status.is_app_open {
                    console_warn!("[Store] Device runs '{}' instead of the Polkadot app", status.app.name);
                    self.notify(NewNotification::warning(
                        "Open the Polkadot app",
                        format!(
                            "Your Ledger is running '{}'. Open the Polkadot app on the device and connect again.",
                            status.app.name
                        ),
                    ));
                }

                ConnectionResult {
                    connected: true,
                    is_app_open: status.is_app_open,
                }
            }
            Err(kind) => {
                console_warn!("[Store] Connection failed: {}", kind);
                self.notify(NewNotification::error(kind.title(), kind.description()));
                self.dispatch(LedgerAction::SetConnection(DeviceConnection {
                    error: Some(kind),
                    ..Default::default()
                }));
                ConnectionResult::default()
            }
        }
    }

    pub async fn disconnect_ledger(&self) {
        self.inner.device.disconnect().await;
        self.dispatch(LedgerAction::ClearConnection);
        console_info!("[Store] Ledger disconnected");
    }

    pub fn clear_synchronization(&self) {
        self.dispatch(LedgerAction::ClearSynchronization);
    }
}
