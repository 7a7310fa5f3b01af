//! Numeric normalization, on-chain verification and configuration
//! import/export for deploying Silo lending-market pairs.

pub mod address_book;
pub mod bindings;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod json;
pub mod verify;
pub mod versions;
pub mod wizard;

pub use config::setup_tracing;
pub use silo_fixed_point as fixed_point;
