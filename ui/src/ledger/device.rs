use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use super::generic_app::{AppInfo, AppVersion, DerivedAddress, GenericApp};
use super::path::Bip44Path;
use super::transport::TransportOpener;
use crate::services::errors::LedgerErrorKind;
use crate::{console_debug, console_info, console_warn};

/// Name prefix of the generic Polkadot app as reported by the dashboard
pub const GENERIC_APP_NAME: &str = "Polkadot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    pub app: AppInfo,
    pub version: Option<AppVersion>,
    pub is_app_open: bool,
}

/// Device operations the store relies on
#[async_trait(?Send)]
pub trait LedgerDevice {
    async fn connect(&self) -> Result<DeviceStatus, LedgerErrorKind>;

    async fn disconnect(&self);

    fn is_connected(&self) -> bool;

    async fn get_address(
        &self,
        path: &Bip44Path,
        ss58_prefix: u16,
        show: bool,
    ) -> Result<DerivedAddress, LedgerErrorKind>;

    /// Signs `payload`; `metadata_proof` lets the app decode it
    async fn sign(
        &self,
        path: &Bip44Path,
        payload: &[u8],
        metadata_proof: &[u8],
    ) -> Result<Vec<u8>, LedgerErrorKind>;
}

/// A physical device reached through `O`
pub struct LedgerHardware<O: TransportOpener> {
    opener: O,
    app: RefCell<Option<Rc<GenericApp<O::Transport>>>>,
}

impl<O: TransportOpener> LedgerHardware<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            app: RefCell::new(None),
        }
    }

    fn current(&self) -> Result<Rc<GenericApp<O::Transport>>, LedgerErrorKind> {
        self.app
            .borrow()
            .clone()
            .ok_or(LedgerErrorKind::DeviceDisconnected)
    }
}

#[async_trait(?Send)]
impl<O: TransportOpener> LedgerDevice for LedgerHardware<O> {
    async fn connect(&self) -> Result<DeviceStatus, LedgerErrorKind> {
        let existing = self.app.borrow().clone();
        let app = match existing {
            Some(app) => app,
            None => Rc::new(GenericApp::new(self.opener.open().await?)),
        };

        let info = match app.app_info().await {
            Ok(info) => info,
            Err(e) => {
                console_warn!("[Ledger] App info failed: {}", e);
                app.close().await;
                *self.app.borrow_mut() = None;
                return Err(e);
            }
        };

        let is_app_open = info.name.starts_with(GENERIC_APP_NAME);
        let version = if is_app_open {
            match app.get_version().await {
                Ok(version) => Some(version),
                Err(e) => {
                    console_debug!("[Ledger] Version query failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        console_info!(
            "[Ledger] Connected, running app '{}' {} (generic app open: {})",
            info.name,
            info.version,
            is_app_open
        );

        *self.app.borrow_mut() = Some(app);
        Ok(DeviceStatus {
            app: info,
            version,
            is_app_open,
        })
    }

    async fn disconnect(&self) {
        let app = self.app.borrow_mut().take();
        if let Some(app) = app {
            app.close().await;
            console_info!("[Ledger] Disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.app.borrow().is_some()
    }

    async fn get_address(
        &self,
        path: &Bip44Path,
        ss58_prefix: u16,
        show: bool,
    ) -> Result<DerivedAddress, LedgerErrorKind> {
        self.current()?.get_address(path, ss58_prefix, show).await
    }

    async fn sign(
        &self,
        path: &Bip44Path,
        payload: &[u8],
        metadata_proof: &[u8],
    ) -> Result<Vec<u8>, LedgerErrorKind> {
        self.current()?.sign(path, payload, metadata_proof).await
    }
}
