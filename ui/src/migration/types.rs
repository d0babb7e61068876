// Core types for the migration assistant - no dioxus imports needed here
use serde::{Deserialize, Serialize};

use crate::ledger::Bip44Path;
use crate::services::errors::LedgerErrorKind;
use crate::utils::format::parse_token_amount;

/// Stage of the workflow an account error came from
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ErrorSource {
    Synchronization,
    BalanceFetch,
    Migration,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AccountError {
    pub source: ErrorSource,
    #[serde(skip, default = "unknown_kind")]
    pub kind: LedgerErrorKind,
    pub description: String,
}

fn unknown_kind() -> LedgerErrorKind {
    LedgerErrorKind::Unknown { status_word: None }
}

impl AccountError {
    pub fn new(source: ErrorSource, kind: LedgerErrorKind, description: impl Into<String>) -> Self {
        Self {
            source,
            kind,
            description: description.into(),
        }
    }

    /// Error whose text is the device error's own description
    pub fn from_kind(source: ErrorSource, kind: LedgerErrorKind) -> Self {
        let description = kind.description();
        Self::new(source, kind, description)
    }
}

/// Balances as decimal strings in token units
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AccountBalance {
    pub free: String,
    pub reserved: String,
    pub locked: String,
    pub decimals: u8,
}

impl AccountBalance {
    pub fn zero(decimals: u8) -> Self {
        Self {
            free: "0".to_string(),
            reserved: "0".to_string(),
            locked: "0".to_string(),
            decimals,
        }
    }

    fn planck(&self, value: &str) -> u128 {
        parse_token_amount(value, self.decimals).unwrap_or(0)
    }

    pub fn free_planck(&self) -> u128 {
        self.planck(&self.free)
    }

    pub fn total_planck(&self) -> u128 {
        self.free_planck().saturating_add(self.planck(&self.reserved))
    }

    pub fn is_empty(&self) -> bool {
        self.total_planck() == 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransactionStatus {
    IsLoading,
    Pending,
    InBlock,
    Finalized,
    Success,
    Failed,
    Error,
    Warning,
}

impl TransactionStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, TransactionStatus::Failed | TransactionStatus::Error)
    }

    /// Nothing more will happen to the transaction from our side
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Finalized
                | TransactionStatus::Success
                | TransactionStatus::Failed
                | TransactionStatus::Error
                | TransactionStatus::Warning
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::IsLoading => "Preparing",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::InBlock => "In block",
            TransactionStatus::Finalized => "Finalized",
            TransactionStatus::Success => "Success",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Error => "Error",
            TransactionStatus::Warning => "Warning",
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub status: TransactionStatus,
    pub status_message: Option<String>,
    pub hash: Option<String>,
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
}

impl Transaction {
    pub fn new(status: TransactionStatus) -> Self {
        Self {
            status,
            status_message: None,
            hash: None,
            block_hash: None,
            block_number: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }
}

/// One derived account of a legacy app
#[derive(Clone, PartialEq, Debug)]
pub struct Address {
    pub address: String,
    pub pub_key: String,
    pub path: Bip44Path,
    pub balance: Option<AccountBalance>,
    pub error: Option<AccountError>,
    pub is_loading: bool,
    /// Universal-app address receiving the funds
    pub destination: Option<String>,
    pub transaction: Option<Transaction>,
    pub migrated: bool,
}

impl Address {
    pub fn new(address: impl Into<String>, pub_key: impl Into<String>, path: Bip44Path) -> Self {
        Self {
            address: address.into(),
            pub_key: pub_key.into(),
            path,
            balance: None,
            error: None,
            is_loading: false,
            destination: None,
            transaction: None,
            migrated: false,
        }
    }

    pub fn has_balance(&self) -> bool {
        self.balance.as_ref().map(|b| !b.is_empty()).unwrap_or(false)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AppStatus {
    Loading,
    Synchronized,
    Error,
    Migrated,
}

/// A legacy Ledger app and the accounts found under it
#[derive(Clone, PartialEq, Debug)]
pub struct App {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub decimals: u8,
    pub status: AppStatus,
    pub accounts: Vec<Address>,
    pub error: Option<AccountError>,
}

impl App {
    pub fn loading(id: &str, name: &str, ticker: &str, decimals: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ticker: ticker.to_string(),
            decimals,
            status: AppStatus::Loading,
            accounts: Vec::new(),
            error: None,
        }
    }

    pub fn account_mut(&mut self, address: &str) -> Option<&mut Address> {
        self.accounts.iter_mut().find(|a| a.address == address)
    }
}

/// Progress-dialog row for one account being migrated
#[derive(Clone, PartialEq, Debug)]
pub struct MigratingItem {
    pub app_id: String,
    pub app_name: String,
    pub account: String,
    pub destination: Option<String>,
    pub transaction: Transaction,
}

/// Migration counters. The store keeps them across runs until the
/// synchronization is cleared.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MigrationResult {
    pub success: u32,
    pub fails: u32,
}

impl MigrationResult {
    pub fn total(&self) -> u32 {
        self.success + self.fails
    }

    /// What was counted after `earlier` was taken
    pub fn since(&self, earlier: MigrationResult) -> MigrationResult {
        MigrationResult {
            success: self.success.saturating_sub(earlier.success),
            fails: self.fails.saturating_sub(earlier.fails),
        }
    }
}

/// Device connection as the UI sees it
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DeviceConnection {
    pub has_transport: bool,
    pub has_generic_app: bool,
    pub is_app_open: bool,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub error: Option<LedgerErrorKind>,
}

impl DeviceConnection {
    pub fn is_connected(&self) -> bool {
        self.has_transport && self.has_generic_app
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ConnectionResult {
    pub connected: bool,
    pub is_app_open: bool,
}
