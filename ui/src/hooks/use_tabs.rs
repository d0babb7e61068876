use dioxus::prelude::*;

use crate::migration::LedgerState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WizardTab {
    #[default]
    Connect,
    Synchronize,
    Migrate,
}

impl WizardTab {
    pub const ALL: [WizardTab; 3] = [WizardTab::Connect, WizardTab::Synchronize, WizardTab::Migrate];

    pub fn index(self) -> usize {
        match self {
            WizardTab::Connect => 0,
            WizardTab::Synchronize => 1,
            WizardTab::Migrate => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardTab::Connect => "Connect Device",
            WizardTab::Synchronize => "Synchronize Accounts",
            WizardTab::Migrate => "Migrate",
        }
    }

    fn next(self) -> Option<WizardTab> {
        WizardTab::ALL.get(self.index() + 1).copied()
    }

    fn previous(self) -> Option<WizardTab> {
        self.index().checked_sub(1).map(|i| WizardTab::ALL[i])
    }
}

/// What the wizard needs to know to unlock later tabs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TabGate {
    pub device_ready: bool,
    pub synchronization_completed: bool,
}

impl TabGate {
    pub fn from_state(state: &LedgerState) -> Self {
        Self {
            device_ready: state.connection.is_connected() && state.connection.is_app_open,
            synchronization_completed: state.synchronization_completed,
        }
    }

    pub fn allows(self, tab: WizardTab) -> bool {
        match tab {
            WizardTab::Connect => true,
            WizardTab::Synchronize => self.device_ready,
            WizardTab::Migrate => self.device_ready && self.synchronization_completed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TabController {
    active: WizardTab,
}

impl TabController {
    pub fn active(&self) -> WizardTab {
        self.active
    }

    /// Switches to `tab` if the gate allows it
    pub fn go_to(&mut self, tab: WizardTab, gate: TabGate) -> bool {
        if !gate.allows(tab) {
            return false;
        }
        self.active = tab;
        true
    }

    pub fn next(&mut self, gate: TabGate) -> bool {
        match self.active.next() {
            Some(tab) => self.go_to(tab, gate),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.active.previous() {
            Some(tab) => {
                self.active = tab;
                true
            }
            None => false,
        }
    }

    /// Falls back to the furthest tab still allowed, e.g. after a disconnect
    pub fn settle(&mut self, gate: TabGate) {
        while !gate.allows(self.active) {
            if !self.previous() {
                break;
            }
        }
    }

    pub fn reset(&mut self) {
        self.active = WizardTab::Connect;
    }
}

pub fn use_tabs() -> Signal<TabController> {
    use_signal(TabController::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY: TabGate = TabGate {
        device_ready: true,
        synchronization_completed: false,
    };

    const SYNCED: TabGate = TabGate {
        device_ready: true,
        synchronization_completed: true,
    };

    #[test]
    fn test_synchronize_requires_ready_device() {
        let mut tabs = TabController::default();
        assert!(!tabs.next(TabGate::default()));
        assert_eq!(tabs.active(), WizardTab::Connect);

        assert!(tabs.next(READY));
        assert_eq!(tabs.active(), WizardTab::Synchronize);
    }

    #[test]
    fn test_migrate_requires_finished_synchronization() {
        let mut tabs = TabController::default();
        assert!(!tabs.go_to(WizardTab::Migrate, READY));
        assert!(tabs.go_to(WizardTab::Migrate, SYNCED));
        assert!(!tabs.next(SYNCED));
        assert_eq!(tabs.active(), WizardTab::Migrate);
    }

    #[test]
    fn test_settle_after_disconnect() {
        let mut tabs = TabController::default();
        tabs.go_to(WizardTab::Migrate, SYNCED);

        tabs.settle(READY);
        assert_eq!(tabs.active(), WizardTab::Synchronize);

        tabs.settle(TabGate::default());
        assert_eq!(tabs.active(), WizardTab::Connect);
    }

    #[test]
    fn test_previous_stops_at_first_tab() {
        let mut tabs = TabController::default();
        assert!(!tabs.previous());
        tabs.go_to(WizardTab::Synchronize, READY);
        assert!(tabs.previous());
        assert_eq!(tabs.active(), WizardTab::Connect);
    }
}
