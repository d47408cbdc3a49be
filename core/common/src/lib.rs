//! Common utilities and types shared across SeedVault modules.
//!
//! This module provides the error taxonomy and the sensitive-string wrapper
//! used throughout the codebase.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::Secret;
