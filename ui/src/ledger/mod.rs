//! Ledger device access: APDU codec, HID framing, transports and the
//! generic Polkadot app client.

pub mod apdu;
pub mod device;
pub mod framing;
pub mod generic_app;
pub mod path;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod webhid;

pub use device::{DeviceStatus, LedgerDevice, LedgerHardware};
pub use generic_app::{AppInfo, AppVersion, DerivedAddress, GenericApp};
pub use path::Bip44Path;
pub use transport::{LedgerTransport, TransportOpener, UnsupportedOpener};

/// Opener used by the running app
#[cfg(target_arch = "wasm32")]
pub type DefaultOpener = webhid::WebHidOpener;

#[cfg(not(target_arch = "wasm32"))]
pub type DefaultOpener = UnsupportedOpener;

#[cfg(target_arch = "wasm32")]
pub use webhid::{WebHidOpener, WebHidTransport};
