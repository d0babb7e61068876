use thiserror::Error;

/// Known Ledger failure kinds, each with its own display text.
///
/// Built from APDU status words or transport failures; anything not
/// recognised lands in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerErrorKind {
    WebHidUnsupported,
    DeviceNotSelected,
    DeviceDisconnected,
    DeviceBusy,
    DeviceLocked,
    AppNotOpen,
    InstructionNotSupported,
    TransactionRejected,
    InvalidData,
    DerivationFailed,
    ExecutionError,
    Transport { message: String },
    Unknown { status_word: Option<u16> },
}

impl LedgerErrorKind {
    pub fn from_status_word(status_word: u16) -> Self {
        match status_word {
            0x9001 => LedgerErrorKind::DeviceBusy,
            0x5515 | 0x6982 => LedgerErrorKind::DeviceLocked,
            0x6e00 | 0x6e01 | 0x6511 => LedgerErrorKind::AppNotOpen,
            0x6d00 => LedgerErrorKind::InstructionNotSupported,
            0x6986 => LedgerErrorKind::TransactionRejected,
            0x6700 | 0x6984 | 0x6a80 | 0x6b00 => LedgerErrorKind::InvalidData,
            0x6802 => LedgerErrorKind::DerivationFailed,
            0x6400 | 0x6985 | 0x6f00 | 0x6f01 => LedgerErrorKind::ExecutionError,
            other => LedgerErrorKind::Unknown {
                status_word: Some(other),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LedgerErrorKind::WebHidUnsupported => "Browser not supported",
            LedgerErrorKind::DeviceNotSelected => "No device selected",
            LedgerErrorKind::DeviceDisconnected => "Device disconnected",
            LedgerErrorKind::DeviceBusy => "Device busy",
            LedgerErrorKind::DeviceLocked => "Device locked",
            LedgerErrorKind::AppNotOpen => "App not open",
            LedgerErrorKind::InstructionNotSupported => "Unsupported app version",
            LedgerErrorKind::TransactionRejected => "Transaction rejected",
            LedgerErrorKind::InvalidData => "Invalid data",
            LedgerErrorKind::DerivationFailed => "Key derivation failed",
            LedgerErrorKind::ExecutionError => "Device error",
            LedgerErrorKind::Transport { .. } => "Connection error",
            LedgerErrorKind::Unknown { .. } => "Unknown error",
        }
    }

    pub fn description(&self) -> String {
        match self {
            LedgerErrorKind::WebHidUnsupported => {
                "This browser cannot talk to Ledger devices. Use Chrome, Edge or Brave on desktop.".to_string()
            }
            LedgerErrorKind::DeviceNotSelected => {
                "Select your Ledger in the browser prompt to continue.".to_string()
            }
            LedgerErrorKind::DeviceDisconnected => {
                "The Ledger was unplugged. Reconnect it and try again.".to_string()
            }
            LedgerErrorKind::DeviceBusy => {
                "The device is processing another request. Wait a moment and retry.".to_string()
            }
            LedgerErrorKind::DeviceLocked => "Unlock your Ledger with its PIN and retry.".to_string(),
            LedgerErrorKind::AppNotOpen => {
                "Open the Polkadot app on your Ledger and retry.".to_string()
            }
            LedgerErrorKind::InstructionNotSupported => {
                "The Polkadot app on the device is outdated. Update it with Ledger Live.".to_string()
            }
            LedgerErrorKind::TransactionRejected => {
                "The request was rejected on the device.".to_string()
            }
            LedgerErrorKind::InvalidData => "The device rejected the request data.".to_string(),
            LedgerErrorKind::DerivationFailed => {
                "The device could not derive the requested key.".to_string()
            }
            LedgerErrorKind::ExecutionError => {
                "The device could not complete the request.".to_string()
            }
            LedgerErrorKind::Transport { message } => format!("Device communication failed: {}", message),
            LedgerErrorKind::Unknown {
                status_word: Some(sw),
            } => format!("The device answered with status 0x{:04x}.", sw),
            LedgerErrorKind::Unknown { status_word: None } => {
                "An unexpected error occurred.".to_string()
            }
        }
    }
}

impl std::fmt::Display for LedgerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    #[error("Ledger error: {0}")]
    Ledger(LedgerErrorKind),

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Subscan error ({status}): {message}")]
    Subscan { status: u16, message: String },

    #[error("RPC error: {method} - {message}")]
    Rpc { method: String, message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Configuration error: {field} = {value}")]
    Configuration { field: String, value: String },

    #[error("Migration step error: {step} - {reason}")]
    MigrationStep { step: String, reason: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl From<LedgerErrorKind> for MigrationError {
    fn from(kind: LedgerErrorKind) -> Self {
        MigrationError::Ledger(kind)
    }
}

impl From<reqwest::Error> for MigrationError {
    fn from(error: reqwest::Error) -> Self {
        MigrationError::Network {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(error: serde_json::Error) -> Self {
        MigrationError::Encoding {
            message: error.to_string(),
        }
    }
}

impl From<String> for MigrationError {
    fn from(message: String) -> Self {
        MigrationError::Unknown { message }
    }
}

impl From<&str> for MigrationError {
    fn from(message: &str) -> Self {
        MigrationError::Unknown {
            message: message.to_string(),
        }
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;

impl MigrationError {
    /// Device error kind behind this error, `Unknown` for non-device failures
    pub fn ledger_kind(&self) -> LedgerErrorKind {
        match self {
            MigrationError::Ledger(kind) => kind.clone(),
            _ => LedgerErrorKind::Unknown { status_word: None },
        }
    }

    /// Conditions the user can clear without changing anything in the app
    pub fn is_temporary(&self) -> bool {
        match self {
            MigrationError::Network { .. } => true,
            MigrationError::Subscan { status, .. } => *status == 429 || *status >= 500,
            MigrationError::Ledger(kind) => matches!(
                kind,
                LedgerErrorKind::DeviceBusy | LedgerErrorKind::DeviceLocked | LedgerErrorKind::AppNotOpen
            ),
            _ => false,
        }
    }

    /// Get error severity for logging/alerting purposes
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MigrationError::Configuration { .. } => ErrorSeverity::High,
            MigrationError::Encoding { .. } => ErrorSeverity::High,
            MigrationError::Ledger(LedgerErrorKind::TransactionRejected) => ErrorSeverity::Low,
            MigrationError::Network { .. } => ErrorSeverity::Low,
            _ => ErrorSeverity::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}
