//! Settings store abstraction for SeedVault.
//!
//! This module provides a trait-based interface for the key-value settings
//! store that backs the vault (in-memory for tests, a local JSON file for
//! real use).
//!
//! # Design Principles
//! - Backend isolation: no store-specific logic in vault or cipher modules
//! - Async operations: all I/O operations are async
//! - Absence is not an error: a missing key reads as `None`
//! - Whole-value writes: callers overwrite values atomically, never patch them

pub mod file;
pub mod memory;
pub mod settings;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use settings::SettingsStore;
