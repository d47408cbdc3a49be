//! Proximity tag medium abstraction for SeedVault.
//!
//! This module provides a trait-based interface over the physical tag
//! reader/writer (NFC-style): capability probes, tap listeners, and
//! single-shot write/erase operations.
//!
//! # Design Principles
//! - The radio driver is replaceable: the vault only sees [`TagMedium`]
//! - Listener delivery is channel-based: a tap pushes records into an
//!   `mpsc` receiver, and dropping/stopping the listener is the only
//!   cancellation primitive
//! - Medium failures are [`seedvault_common::Error::Medium`], distinct from
//!   application-level errors

pub mod file;
pub mod medium;
pub mod mock;

pub use file::FileMedium;
pub use medium::{ScanOptions, TagInfo, TagMedium};
pub use mock::{MockMedium, WrittenRecord};
