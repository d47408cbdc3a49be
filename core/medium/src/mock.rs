//! Scripted tag medium for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::medium::{ScanOptions, TagInfo, TagMedium};
use seedvault_common::{Error, Result};

/// A record written to the mock medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrittenRecord {
    /// Text record content.
    Text(String),
    /// URI record content.
    Uri(String),
}

#[derive(Default)]
struct MockState {
    available: bool,
    enabled: bool,
    // One inner vec per physical tap; each string is one decoded record.
    taps: VecDeque<Vec<String>>,
    tag_ids: VecDeque<String>,
    writes: Vec<WrittenRecord>,
    erased: u32,
    fail_next_op: Option<String>,
    listening: bool,
}

/// Scripted tag medium.
///
/// Useful for testing and development. Taps are queued up front and drained
/// when a listener starts; writes and erases are recorded for inspection.
pub struct MockMedium {
    state: Mutex<MockState>,
}

impl MockMedium {
    /// Create a mock medium with the radio present and switched on.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                available: true,
                enabled: true,
                ..MockState::default()
            }),
        }
    }

    /// Create a mock medium whose radio is switched off.
    pub fn disabled() -> Self {
        Self {
            state: Mutex::new(MockState {
                available: true,
                enabled: false,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock poisoned")
    }

    /// Queue a tap delivering the given text records.
    pub fn queue_tap<I, S>(&self, records: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .taps
            .push_back(records.into_iter().map(Into::into).collect());
    }

    /// Queue a physical tag discovery with the given id.
    pub fn queue_tag(&self, id: impl Into<String>) {
        self.lock().tag_ids.push_back(id.into());
    }

    /// Make the next single-shot operation fail with a medium error.
    pub fn fail_next_op(&self, reason: impl Into<String>) {
        self.lock().fail_next_op = Some(reason.into());
    }

    /// Records written so far.
    pub fn writes(&self) -> Vec<WrittenRecord> {
        self.lock().writes.clone()
    }

    /// Number of erase operations performed.
    pub fn erase_count(&self) -> u32 {
        self.lock().erased
    }

    /// Whether a listener is currently registered.
    pub fn is_listening(&self) -> bool {
        self.lock().listening
    }

    fn check_radio(state: &MockState) -> Result<()> {
        if !state.available {
            return Err(Error::Medium("Tag radio not available".to_string()));
        }
        if !state.enabled {
            return Err(Error::Medium("Tag radio is disabled".to_string()));
        }
        Ok(())
    }

    fn take_failure(state: &mut MockState) -> Result<()> {
        if let Some(reason) = state.fail_next_op.take() {
            return Err(Error::Medium(reason));
        }
        Ok(())
    }
}

impl Default for MockMedium {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagMedium for MockMedium {
    fn name(&self) -> &str {
        "mock"
    }

    async fn available(&self) -> Result<bool> {
        Ok(self.lock().available)
    }

    async fn enabled(&self) -> Result<bool> {
        Ok(self.lock().enabled)
    }

    async fn start_tag_listener(&self) -> Result<mpsc::Receiver<TagInfo>> {
        let ids: Vec<String> = {
            let mut state = self.lock();
            Self::check_radio(&state)?;
            state.listening = true;
            state.tag_ids.drain(..).collect()
        };

        let (tx, rx) = mpsc::channel(ids.len().max(1));
        for id in ids {
            let _ = tx.send(TagInfo { id }).await;
        }
        Ok(rx)
    }

    async fn stop_tag_listener(&self) -> Result<()> {
        self.lock().listening = false;
        Ok(())
    }

    async fn start_payload_listener(&self, options: ScanOptions) -> Result<mpsc::Receiver<String>> {
        let records: Vec<String> = {
            let mut state = self.lock();
            Self::check_radio(&state)?;
            state.listening = !options.stop_after_first_read;

            if options.stop_after_first_read {
                state.taps.pop_front().unwrap_or_default()
            } else {
                state.taps.drain(..).flatten().collect()
            }
        };

        let (tx, rx) = mpsc::channel(records.len().max(1));
        for record in records {
            let _ = tx.send(record).await;
        }
        Ok(rx)
    }

    async fn stop_payload_listener(&self) -> Result<()> {
        self.lock().listening = false;
        Ok(())
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_radio(&state)?;
        Self::take_failure(&mut state)?;
        state.writes.push(WrittenRecord::Text(text.to_string()));
        Ok(())
    }

    async fn write_uri(&self, uri: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_radio(&state)?;
        Self::take_failure(&mut state)?;
        state.writes.push(WrittenRecord::Uri(uri.to_string()));
        Ok(())
    }

    async fn erase(&self) -> Result<()> {
        let mut state = self.lock();
        Self::check_radio(&state)?;
        Self::take_failure(&mut state)?;
        state.erased += 1;
        Ok(())
    }
}
