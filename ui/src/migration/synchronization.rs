use super::state::LedgerAction;
use super::store::LedgerStore;
use super::types::{AccountError, Address, App, ErrorSource};
use crate::chain::ChainApi;
use crate::ledger::{Bip44Path, DerivedAddress, LedgerDevice};
use crate::notifications::NewNotification;
use crate::services::config::ChainConfig;
use crate::services::errors::LedgerErrorKind;
use crate::{console_debug, console_info, console_warn};

/// What one app's synchronization produced; `error` ends the scan early
#[derive(Default)]
struct AppScan {
    accounts: Vec<Address>,
    error: Option<LedgerErrorKind>,
}

impl<D: LedgerDevice, C: ChainApi> LedgerStore<D, C> {
    /// Derives accounts for every configured app and fetches their balances
    pub async fn synchronize_accounts(&self) {
        let connection = self.snapshot().connection;
        if !connection.is_connected() || !connection.is_app_open {
            console_warn!("[Sync] Skipped, device not ready");
            self.notify(NewNotification::warning(
                "Device not ready",
                "Connect your Ledger and open the Polkadot app before synchronizing.",
            ));
            return;
        }

        let chains = self.config().chains.clone();
        let apps = chains
            .iter()
            .map(|c| App::loading(&c.id, &c.name, &c.ticker, c.decimals))
            .collect();

        self.dispatch(LedgerAction::SetSynchronizing(true));
        self.dispatch(LedgerAction::StartSynchronization(apps));

        let mut failed_apps = 0;
        for chain in &chains {
            let scan = self.synchronize_app(chain).await;
            console_info!("[Sync] {}: {} accounts", chain.id, scan.accounts.len());
            self.dispatch(LedgerAction::SetAppAccounts {
                app_id: chain.id.clone(),
                accounts: scan.accounts,
            });

            // Accounts derived before the failure stay listed
            if let Some(kind) = scan.error {
                failed_apps += 1;
                console_warn!("[Sync] {} failed: {}", chain.id, kind);
                self.dispatch(LedgerAction::SetAppError {
                    app_id: chain.id.clone(),
                    error: AccountError::from_kind(ErrorSource::Synchronization, kind),
                });
            }
        }

        self.dispatch(LedgerAction::SetSynchronizing(false));
        self.dispatch(LedgerAction::SetSynchronizationCompleted(true));

        if failed_apps > 0 {
            self.notify(NewNotification::warning(
                "Synchronization incomplete",
                format!("{} of {} apps could not be synchronized.", failed_apps, chains.len()),
            ));
        }
    }

    /// Clears previous results and synchronizes again
    pub async fn restart_synchronization(&self) {
        self.clear_synchronization();
        self.synchronize_accounts().await;
    }

    async fn synchronize_app(&self, chain: &ChainConfig) -> AppScan {
        let derivation = &self.config().derivation;
        let mut scan = AppScan::default();

        for index in 0..derivation.accounts_per_app {
            let path = Bip44Path::new(chain.slip44, index);
            let (source, destination) = match self.derive_pair(chain, path).await {
                Ok(pair) => pair,
                Err(kind) => {
                    scan.error = Some(kind);
                    break;
                }
            };

            let pub_key = source.pub_key_hex();
            let mut account = Address::new(source.address, pub_key, path);
            account.destination = Some(destination.address);

            match self.inner.chain.fetch_balance(chain, &account.address).await {
                Ok(balance) => account.balance = Some(balance),
                Err(e) => {
                    console_warn!("[Sync] Balance of {} failed: {}", account.address, e);
                    account.error = Some(AccountError::new(
                        ErrorSource::BalanceFetch,
                        e.ledger_kind(),
                        e.to_string(),
                    ));
                }
            }

            if account.has_balance() || account.error.is_some() || derivation.keep_empty_accounts {
                scan.accounts.push(account);
            } else {
                console_debug!("[Sync] {} is empty, not listed", account.address);
            }
        }

        scan
    }

    /// The legacy account at `path` and its universal-app counterpart
    async fn derive_pair(
        &self,
        chain: &ChainConfig,
        path: Bip44Path,
    ) -> Result<(DerivedAddress, DerivedAddress), LedgerErrorKind> {
        let source = self.inner.device.get_address(&path, chain.ss58_prefix, false).await?;
        let universal_path = path.with_coin_type(self.config().derivation.universal_slip44);
        let destination = self
            .inner
            .device
            .get_address(&universal_path, chain.ss58_prefix, false)
            .await?;
        Ok((source, destination))
    }
}
