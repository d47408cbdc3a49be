//! Tag medium trait definition.

use async_trait::async_trait;
use tokio::sync::mpsc;

use seedvault_common::Result;

/// Identity of a physically discovered tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Driver-specific tag identifier.
    pub id: String,
}

/// Options for a payload listening session.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Deactivate the medium after the first tap is delivered.
    pub stop_after_first_read: bool,
    /// Hint text shown by drivers that present a system scan UI.
    pub scan_hint: Option<String>,
}

/// Abstract proximity tag reader/writer.
///
/// Tag presence is physically external: single-shot operations suspend until
/// a tag arrives (or the driver gives up), and listeners deliver zero or more
/// records per tap for as long as they stay active. Stopping a listener that
/// is not running is a no-op.
#[async_trait]
pub trait TagMedium: Send + Sync {
    /// Get the medium name (e.g., "nfc", "file", "mock").
    fn name(&self) -> &str;

    /// Whether the device has a tag radio at all.
    async fn available(&self) -> Result<bool>;

    /// Whether the tag radio is currently switched on.
    async fn enabled(&self) -> Result<bool>;

    /// Start listening for physical tag discovery.
    ///
    /// # Postconditions
    /// - Returns a receiver yielding one [`TagInfo`] per tap while active
    /// - The channel closes when the listener is stopped
    async fn start_tag_listener(&self) -> Result<mpsc::Receiver<TagInfo>>;

    /// Stop the tag discovery listener. Idempotent.
    async fn stop_tag_listener(&self) -> Result<()>;

    /// Start listening for decoded text payloads.
    ///
    /// # Postconditions
    /// - Returns a receiver yielding zero or more raw text records per tap
    /// - With `stop_after_first_read`, the medium deactivates itself after
    ///   the first tap and the channel closes
    ///
    /// # Errors
    /// - [`seedvault_common::Error::Medium`] if the radio is unavailable or disabled
    async fn start_payload_listener(&self, options: ScanOptions) -> Result<mpsc::Receiver<String>>;

    /// Stop the payload listener. Idempotent.
    async fn stop_payload_listener(&self) -> Result<()>;

    /// Write a single text record to a present tag.
    ///
    /// # Errors
    /// - [`seedvault_common::Error::Medium`] if the tag is removed too early,
    ///   unsupported, or the radio is disabled
    async fn write_text(&self, text: &str) -> Result<()>;

    /// Write a single URI record to a present tag.
    async fn write_uri(&self, uri: &str) -> Result<()>;

    /// Erase all records from a present tag.
    async fn erase(&self) -> Result<()>;
}
