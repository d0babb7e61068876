use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use async_trait::async_trait;

use super::*;
use crate::chain::extrinsic::{SigningContext, UnsignedExtrinsic};
use crate::chain::ss58;
use crate::chain::{ChainApi, Inclusion, PreparedMigration, SubmittedMigration};
use crate::ledger::{AppInfo, Bip44Path, DerivedAddress, DeviceStatus, LedgerDevice};
use crate::notifications::{NotificationKind, NotificationQueue};
use crate::services::config::{AssistantConfig, ChainConfig, UNIVERSAL_SLIP44};
use crate::services::errors::{LedgerErrorKind, MigrationError, MigrationResult as ChainResult};

#[derive(Default)]
struct DeviceScript {
    connect_error: RefCell<Option<LedgerErrorKind>>,
    app_name: RefCell<String>,
    connected: Cell<bool>,
    fail_coins: RefCell<HashSet<u32>>,
    /// (coin type, account index) pairs whose derivation fails
    fail_paths: RefCell<HashSet<(u32, u32)>>,
    reject_accounts: RefCell<HashSet<u32>>,
    signed: RefCell<Vec<Bip44Path>>,
    /// Payload length and proof of every sign request
    proofs: RefCell<Vec<(usize, Vec<u8>)>>,
}

#[derive(Clone, Default)]
struct FakeDevice(Rc<DeviceScript>);

fn account_id(coin: u32, index: u32) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[0] = coin as u8;
    id[1] = (coin >> 8) as u8;
    id[2] = index as u8;
    id[31] = 1;
    id
}

fn address_of(coin: u32, index: u32, prefix: u16) -> String {
    ss58::encode(&account_id(coin, index), prefix)
}

#[async_trait(?Send)]
impl LedgerDevice for FakeDevice {
    async fn connect(&self) -> Result<DeviceStatus, LedgerErrorKind> {
        if let Some(kind) = self.0.connect_error.borrow().clone() {
            return Err(kind);
        }
        self.0.connected.set(true);
        let name = self.0.app_name.borrow().clone();
        Ok(DeviceStatus {
            is_app_open: name.starts_with("Polkadot"),
            app: AppInfo {
                name,
                version: "100.0.0".to_string(),
            },
            version: None,
        })
    }

    async fn disconnect(&self) {
        self.0.connected.set(false);
    }

    fn is_connected(&self) -> bool {
        self.0.connected.get()
    }

    async fn get_address(
        &self,
        path: &Bip44Path,
        ss58_prefix: u16,
        _show: bool,
    ) -> Result<DerivedAddress, LedgerErrorKind> {
        if self.0.fail_coins.borrow().contains(&path.coin_type)
            || self.0.fail_paths.borrow().contains(&(path.coin_type, path.account))
        {
            return Err(LedgerErrorKind::DerivationFailed);
        }
        let pub_key = account_id(path.coin_type, path.account);
        Ok(DerivedAddress {
            pub_key,
            address: ss58::encode(&pub_key, ss58_prefix),
        })
    }

    async fn sign(
        &self,
        path: &Bip44Path,
        payload: &[u8],
        metadata_proof: &[u8],
    ) -> Result<Vec<u8>, LedgerErrorKind> {
        self.0.proofs.borrow_mut().push((payload.len(), metadata_proof.to_vec()));
        if self.0.reject_accounts.borrow().contains(&path.account) {
            return Err(LedgerErrorKind::TransactionRejected);
        }
        self.0.signed.borrow_mut().push(path.clone());
        Ok(vec![0u8; 65])
    }
}

#[derive(Default)]
struct ChainScript {
    empty: RefCell<HashSet<String>>,
    balance_errors: RefCell<HashSet<String>>,
    never_included: Cell<bool>,
    /// Signers whose transfer lands in a block but fails to dispatch
    dispatch_failures: RefCell<HashSet<String>>,
    submitted: RefCell<Vec<String>>,
}

#[derive(Clone, Default)]
struct FakeChain(Rc<ChainScript>);

#[async_trait(?Send)]
impl ChainApi for FakeChain {
    async fn fetch_balance(&self, chain: &ChainConfig, address: &str) -> ChainResult<AccountBalance> {
        if self.0.balance_errors.borrow().contains(address) {
            return Err(MigrationError::Subscan {
                status: 500,
                message: "upstream down".to_string(),
            });
        }
        if self.0.empty.borrow().contains(address) {
            return Ok(AccountBalance::zero(chain.decimals));
        }
        Ok(AccountBalance {
            free: "2.5".to_string(),
            reserved: "0".to_string(),
            locked: "0".to_string(),
            decimals: chain.decimals,
        })
    }

    async fn prepare_migration(
        &self,
        chain: &ChainConfig,
        from: &str,
        to: &str,
    ) -> ChainResult<PreparedMigration> {
        let (_, signer) = ss58::decode(from)?;
        let (_, dest) = ss58::decode(to)?;
        Ok(PreparedMigration {
            chain_id: chain.id.clone(),
            signer,
            unsigned: UnsignedExtrinsic::new(
                dest.to_vec(),
                SigningContext {
                    nonce: 0,
                    tip: 0,
                    spec_version: 1,
                    transaction_version: 1,
                    genesis_hash: [0; 32],
                    metadata_hash_extension: chain.metadata_hash_extension,
                },
            ),
            metadata_proof: chain.id.as_bytes().to_vec(),
        })
    }

    async fn submit_migration(
        &self,
        chain: &ChainConfig,
        prepared: PreparedMigration,
        _signature: &[u8],
    ) -> ChainResult<SubmittedMigration> {
        self.0
            .submitted
            .borrow_mut()
            .push(ss58::encode(&prepared.signer, chain.ss58_prefix));
        Ok(SubmittedMigration {
            tx_hash: [7; 32],
            submitted_at: 100,
        })
    }

    async fn wait_for_inclusion(
        &self,
        _chain: &ChainConfig,
        submitted: &SubmittedMigration,
    ) -> ChainResult<Inclusion> {
        if self.0.never_included.get() {
            return Ok(Inclusion::NotSeen {
                last_checked: submitted.submitted_at + 10,
            });
        }
        Ok(Inclusion::InBlock {
            block_hash: [8; 32],
            block_number: submitted.submitted_at + 1,
        })
    }

    async fn confirm_dispatch(
        &self,
        chain: &ChainConfig,
        signer: &[u8; 32],
        _block_hash: &[u8; 32],
    ) -> ChainResult<bool> {
        let address = ss58::encode(signer, chain.ss58_prefix);
        Ok(!self.0.dispatch_failures.borrow().contains(&address))
    }
}

struct Recorder(Rc<RefCell<Vec<MigrationEvent>>>);

impl MigrationEventHandler for Recorder {
    fn handle_event(&self, event: MigrationEvent) {
        self.0.borrow_mut().push(event);
    }
}

struct Harness {
    store: LedgerStore<FakeDevice, FakeChain>,
    device: FakeDevice,
    chain: FakeChain,
    notifications: Rc<RefCell<NotificationQueue>>,
    events: Rc<RefCell<Vec<MigrationEvent>>>,
}

fn config() -> AssistantConfig {
    let mut config = AssistantConfig::default();
    config.chains.retain(|c| c.id == "kusama" || c.id == "acala");
    config.derivation.accounts_per_app = 2;
    config
}

fn harness() -> Harness {
    let device = FakeDevice::default();
    *device.0.app_name.borrow_mut() = "Polkadot".to_string();
    let chain = FakeChain::default();
    let notifications = Rc::new(RefCell::new(NotificationQueue::new()));
    let events = Rc::new(RefCell::new(Vec::new()));

    let store = LedgerStore::with_event_handler(
        device.clone(),
        chain.clone(),
        config(),
        notifications.clone(),
        Rc::new(Recorder(events.clone())),
    );

    Harness {
        store,
        device,
        chain,
        notifications,
        events,
    }
}

fn kusama() -> ChainConfig {
    config().chain("kusama").unwrap().clone()
}

fn acala() -> ChainConfig {
    config().chain("acala").unwrap().clone()
}

fn kusama_address(index: u32) -> String {
    let chain = kusama();
    address_of(chain.slip44, index, chain.ss58_prefix)
}

fn acala_address(index: u32) -> String {
    let chain = acala();
    address_of(chain.slip44, index, chain.ss58_prefix)
}

#[tokio::test]
async fn test_connect_with_app_open() {
    let h = harness();
    let result = h.store.connect_ledger().await;

    assert_eq!(
        result,
        ConnectionResult {
            connected: true,
            is_app_open: true
        }
    );
    let connection = h.store.snapshot().connection;
    assert!(connection.is_connected());
    assert!(connection.is_app_open);
    assert_eq!(connection.app_name.as_deref(), Some("Polkadot"));
    assert!(h.notifications.borrow().visible().is_none());
}

#[tokio::test]
async fn test_connect_failure_notifies_with_error_kind() {
    let h = harness();
    *h.device.0.connect_error.borrow_mut() = Some(LedgerErrorKind::DeviceLocked);

    let result = h.store.connect_ledger().await;
    assert_eq!(result, ConnectionResult::default());

    let state = h.store.snapshot();
    assert!(!state.connection.is_connected());
    assert_eq!(state.connection.error, Some(LedgerErrorKind::DeviceLocked));

    let queue = h.notifications.borrow();
    let toast = queue.visible().unwrap();
    assert_eq!(toast.kind, NotificationKind::Error);
    assert_eq!(toast.title, LedgerErrorKind::DeviceLocked.title());
}

#[tokio::test]
async fn test_connect_with_other_app_open() {
    let h = harness();
    *h.device.0.app_name.borrow_mut() = "Kusama".to_string();

    let result = h.store.connect_ledger().await;
    assert!(result.connected);
    assert!(!result.is_app_open);
    assert_eq!(
        h.notifications.borrow().visible().unwrap().kind,
        NotificationKind::Warning
    );
}

#[tokio::test]
async fn test_connect_device_synchronizes_when_app_open() {
    let h = harness();
    assert!(crate::hooks::connect_device(&h.store).await);

    let state = h.store.snapshot();
    assert!(state.synchronization_completed);
    assert_eq!(state.apps.len(), 2);
}

#[tokio::test]
async fn test_connect_device_without_app_does_not_synchronize() {
    let h = harness();
    *h.device.0.app_name.borrow_mut() = "Kusama".to_string();
    assert!(!crate::hooks::connect_device(&h.store).await);
    assert!(h.store.snapshot().apps.is_empty());

    *h.device.0.connect_error.borrow_mut() = Some(LedgerErrorKind::DeviceNotSelected);
    assert!(!crate::hooks::connect_device(&h.store).await);
    assert!(!h.store.snapshot().synchronization_completed);
}

#[tokio::test]
async fn test_synchronize_requires_ready_device() {
    let h = harness();
    h.store.synchronize_accounts().await;

    let state = h.store.snapshot();
    assert!(state.apps.is_empty());
    assert!(!state.synchronization_completed);
    assert!(h.notifications.borrow().visible().is_some());
}

#[tokio::test]
async fn test_synchronize_filters_empty_and_marks_failed_apps() {
    let h = harness();
    h.chain.0.empty.borrow_mut().insert(kusama_address(1));
    h.device.0.fail_coins.borrow_mut().insert(acala().slip44);

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;

    let state = h.store.snapshot();
    assert!(state.synchronization_completed);
    assert!(!state.is_synchronizing);

    let kusama_app = state.app("kusama").unwrap();
    assert_eq!(kusama_app.status, AppStatus::Synchronized);
    assert_eq!(kusama_app.accounts.len(), 1);

    let account = &kusama_app.accounts[0];
    assert_eq!(account.address, kusama_address(0));
    assert_eq!(account.path.to_string(), "m/44'/434'/0'/0'/0'");
    assert_eq!(
        account.destination.as_deref(),
        Some(address_of(UNIVERSAL_SLIP44, 0, kusama().ss58_prefix).as_str())
    );

    let acala_app = state.app("acala").unwrap();
    assert_eq!(acala_app.status, AppStatus::Error);
    let error = acala_app.error.as_ref().unwrap();
    assert_eq!(error.source, ErrorSource::Synchronization);
    assert_eq!(error.kind, LedgerErrorKind::DerivationFailed);
}

#[tokio::test]
async fn test_device_error_mid_app_keeps_earlier_accounts() {
    let h = harness();
    h.device.0.fail_paths.borrow_mut().insert((kusama().slip44, 1));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;

    let state = h.store.snapshot();
    let app = state.app("kusama").unwrap();
    assert_eq!(app.status, AppStatus::Error);
    assert_eq!(app.error.as_ref().unwrap().kind, LedgerErrorKind::DerivationFailed);
    assert_eq!(app.accounts.len(), 1);
    assert_eq!(app.accounts[0].address, kusama_address(0));

    // The account derived before the failure can still be migrated
    assert!(migratable_apps(&state.apps)
        .iter()
        .flat_map(|app| app.accounts.iter())
        .any(|a| a.address == kusama_address(0)));
    assert_eq!(state.app("acala").unwrap().status, AppStatus::Synchronized);
}

#[tokio::test]
async fn test_keep_empty_accounts_lists_everything() {
    let device = FakeDevice::default();
    *device.0.app_name.borrow_mut() = "Polkadot".to_string();
    let chain = FakeChain::default();
    chain.0.empty.borrow_mut().insert(kusama_address(0));
    chain.0.empty.borrow_mut().insert(kusama_address(1));

    let mut config = config();
    config.derivation.keep_empty_accounts = true;
    let store = LedgerStore::new(
        device,
        chain,
        config,
        Rc::new(RefCell::new(NotificationQueue::new())),
    );

    store.connect_ledger().await;
    store.synchronize_accounts().await;
    assert_eq!(store.snapshot().app("kusama").unwrap().accounts.len(), 2);
}

#[tokio::test]
async fn test_balance_failure_excludes_account_from_migration() {
    let h = harness();
    h.chain.0.balance_errors.borrow_mut().insert(kusama_address(1));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;

    let state = h.store.snapshot();
    let failed = state
        .app("kusama")
        .unwrap()
        .accounts
        .iter()
        .find(|a| a.address == kusama_address(1))
        .unwrap();
    assert_eq!(failed.error.as_ref().unwrap().source, ErrorSource::BalanceFetch);

    let migratable = migratable_apps(&state.apps);
    assert!(migratable
        .iter()
        .flat_map(|app| app.accounts.iter())
        .all(|a| a.address != kusama_address(1)));
}

#[tokio::test]
async fn test_migrate_all_counts_and_retries_failures() {
    let h = harness();
    h.device.0.reject_accounts.borrow_mut().insert(1);
    h.chain.0.empty.borrow_mut().insert(acala_address(0));
    h.chain.0.empty.borrow_mut().insert(acala_address(1));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;
    h.store.migrate_all().await;

    let state = h.store.snapshot();
    assert!(!state.is_migrating);
    assert_eq!(state.migration_result, MigrationResult { success: 1, fails: 1 });

    let app = state.app("kusama").unwrap();
    assert!(app.accounts[0].migrated);
    let rejected = &app.accounts[1];
    let error = rejected.error.as_ref().unwrap();
    assert_eq!(error.source, ErrorSource::Migration);
    assert_eq!(error.kind, LedgerErrorKind::TransactionRejected);
    assert_eq!(rejected.transaction.as_ref().unwrap().status, TransactionStatus::Error);

    let success = &state.migrating_items[0].transaction;
    assert_eq!(success.status, TransactionStatus::Success);
    assert_eq!(success.block_number, Some(101));
    assert!(success.hash.as_deref().unwrap().starts_with("0x0707"));

    let completed = h
        .events
        .borrow()
        .iter()
        .filter(|e| matches!(e, MigrationEvent::ItemCompleted { .. }))
        .count();
    assert_eq!(completed, 2);
    assert_eq!(
        h.notifications.borrow().visible().unwrap().kind,
        NotificationKind::Warning
    );

    // The rejected account is still eligible and a second run picks it up
    h.device.0.reject_accounts.borrow_mut().clear();
    h.notifications.borrow_mut().clear();
    let second = h.store.migrate_all().await;
    assert_eq!(second, MigrationResult { success: 1, fails: 0 });

    let toast = h.notifications.borrow().visible().cloned().unwrap();
    assert_eq!(toast.kind, NotificationKind::Success);
    assert!(toast.description.starts_with("1 accounts"));

    let state = h.store.snapshot();
    assert_eq!(state.migration_result, MigrationResult { success: 2, fails: 1 });
    assert_eq!(state.app("kusama").unwrap().status, AppStatus::Migrated);
    assert_eq!(h.chain.0.submitted.borrow().len(), 2);
    assert_eq!(h.device.0.signed.borrow().len(), 2);

    let proofs = h.device.0.proofs.borrow();
    assert_eq!(proofs.len(), 3);
    assert!(proofs.iter().all(|(len, proof)| *len > 0 && proof.as_slice() == b"kusama"));
}

#[tokio::test]
async fn test_migrate_all_with_nothing_left_stays_quiet() {
    let h = harness();
    h.chain.0.empty.borrow_mut().insert(acala_address(0));
    h.chain.0.empty.borrow_mut().insert(acala_address(1));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;
    h.store.migrate_all().await;
    assert_eq!(h.store.snapshot().app("kusama").unwrap().status, AppStatus::Migrated);

    h.notifications.borrow_mut().clear();
    let events_before = h.events.borrow().len();
    let rerun = h.store.migrate_all().await;

    assert_eq!(rerun, MigrationResult::default());
    assert!(h.notifications.borrow().visible().is_none());
    assert_eq!(h.events.borrow().len(), events_before);
    assert!(!h.store.snapshot().is_migrating);
}

#[tokio::test]
async fn test_included_but_failed_dispatch_counts_as_failure() {
    let h = harness();
    h.chain.0.empty.borrow_mut().insert(kusama_address(1));
    h.chain.0.empty.borrow_mut().insert(acala_address(0));
    h.chain.0.empty.borrow_mut().insert(acala_address(1));
    h.chain.0.dispatch_failures.borrow_mut().insert(kusama_address(0));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;
    let result = h.store.migrate_all().await;
    assert_eq!(result, MigrationResult { success: 0, fails: 1 });

    let state = h.store.snapshot();
    let account = &state.app("kusama").unwrap().accounts[0];
    assert!(!account.migrated);
    let error = account.error.as_ref().unwrap();
    assert_eq!(error.source, ErrorSource::Migration);
    assert!(error.description.contains("block #101"));
    assert_eq!(account.transaction.as_ref().unwrap().status, TransactionStatus::Error);
    assert_eq!(state.migrating_items[0].transaction.status, TransactionStatus::Error);

    // Still eligible, so a later run retries it
    assert!(migratable_apps(&state.apps)
        .iter()
        .flat_map(|app| app.accounts.iter())
        .any(|a| a.address == kusama_address(0)));

    h.chain.0.dispatch_failures.borrow_mut().clear();
    assert_eq!(h.store.migrate_all().await.success, 1);
    assert!(h.store.snapshot().app("kusama").unwrap().accounts[0].migrated);
}

#[tokio::test]
async fn test_migration_not_seen_is_a_warning() {
    let h = harness();
    h.chain.0.never_included.set(true);
    h.chain.0.empty.borrow_mut().insert(kusama_address(1));
    h.chain.0.empty.borrow_mut().insert(acala_address(0));
    h.chain.0.empty.borrow_mut().insert(acala_address(1));

    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;
    h.store.migrate_all().await;

    let state = h.store.snapshot();
    assert_eq!(state.migration_result.success, 1);
    assert_eq!(state.migrating_items.len(), 1);
    assert_eq!(state.migrating_items[0].transaction.status, TransactionStatus::Warning);
}

#[tokio::test]
async fn test_clear_and_restart_synchronization() {
    let h = harness();
    h.store.connect_ledger().await;
    h.store.synchronize_accounts().await;
    h.store.migrate_all().await;
    assert!(h.store.snapshot().migration_result.success > 0);

    h.store.clear_synchronization();
    let state = h.store.snapshot();
    assert!(state.apps.is_empty());
    assert!(state.migrating_items.is_empty());
    assert_eq!(state.migration_result, MigrationResult::default());

    h.store.restart_synchronization().await;
    assert_eq!(h.store.snapshot().apps.len(), 2);
}

#[tokio::test]
async fn test_subscribers_see_every_dispatch() {
    let h = harness();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let id = h.store.subscribe({
        let seen = seen.clone();
        move |state: &LedgerState| seen.borrow_mut().push(state.connection.is_connected())
    });

    h.store.connect_ledger().await;
    assert_eq!(*seen.borrow(), vec![true]);

    h.store.unsubscribe(id);
    h.store.disconnect_ledger().await;
    assert_eq!(seen.borrow().len(), 1);
    assert!(!h.store.snapshot().connection.is_connected());
    assert!(!h.device.is_connected());
}
