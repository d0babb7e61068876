//! Substrate chain access: SCALE and SS58 encoding, extrinsic building,
//! node RPC and inclusion tracking.

pub mod account;
pub mod extrinsic;
pub mod metadata;
pub mod rpc;
pub mod scale;
pub mod ss58;
pub mod substrate;
pub mod watcher;

pub use substrate::{ChainApi, PreparedMigration, SubmittedMigration, SubstrateChainApi};
pub use watcher::{Inclusion, WatchOptions};
