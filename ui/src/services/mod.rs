//! Infrastructure Services
//!
//! - **config**: chain list, derivation and migration settings
//! - **errors**: error types shared by the device, chain and store layers
//! - **subscan**: client for the Subscan proxy route
//! - **icons**: app icon store
//!
//! The services are WASM-first: async code carries no Send/Sync bounds.

pub mod config;
pub mod errors;
pub mod icons;
pub mod subscan;
