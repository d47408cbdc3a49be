//! User-interaction service trait.
//!
//! The vault treats dialogs and the clipboard as suspension points behind
//! this trait; the CLI supplies a console implementation, tests a scripted
//! one. Only one dialog is ever outstanding at a time.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use seedvault_common::{Error, Result};

/// What kind of input a prompt collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain visible text.
    Text,
    /// Masked passphrase entry.
    Password,
}

/// Options for a yes/no confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub ok_text: String,
    pub cancel_text: String,
}

impl ConfirmOptions {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        ok_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ok_text: ok_text.into(),
            cancel_text: cancel_text.into(),
        }
    }
}

/// Options for a single-field input dialog.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub title: String,
    pub message: String,
    pub ok_text: String,
    pub cancel_text: String,
    pub input: InputKind,
}

impl PromptOptions {
    pub fn password(
        title: impl Into<String>,
        message: impl Into<String>,
        ok_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ok_text: ok_text.into(),
            cancel_text: cancel_text.into(),
            input: InputKind::Password,
        }
    }
}

/// Result of a prompt dialog.
#[derive(Debug, Clone)]
pub struct PromptReply {
    /// Whether the user confirmed (false = cancelled/dismissed).
    pub confirmed: bool,
    /// The entered text; empty when cancelled.
    pub text: String,
}

impl PromptReply {
    /// A cancelled reply.
    pub fn cancelled() -> Self {
        Self {
            confirmed: false,
            text: String::new(),
        }
    }

    /// A confirmed reply with the given text.
    pub fn confirmed(text: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            text: text.into(),
        }
    }
}

/// Abstract user-interaction layer: dialogs and clipboard.
///
/// Every call suspends until the user responds or dismisses; a dismissed
/// dialog resolves to the declined/cancelled branch, never an error.
#[async_trait]
pub trait InteractionService: Send + Sync {
    /// Show an informational notice.
    async fn alert(&self, message: &str) -> Result<()>;

    /// Ask a yes/no question; `true` means the affirmative button.
    async fn confirm(&self, options: ConfirmOptions) -> Result<bool>;

    /// Collect a single text/passphrase input.
    async fn prompt(&self, options: PromptOptions) -> Result<PromptReply>;

    /// Copy text to the system clipboard.
    async fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

#[derive(Default)]
struct ScriptedState {
    confirm_replies: VecDeque<bool>,
    prompt_replies: VecDeque<PromptReply>,
    alerts: Vec<String>,
    confirms_seen: Vec<String>,
    clipboard: Vec<String>,
}

/// Scripted interaction service.
///
/// Useful for testing: dialog replies are queued up front and everything the
/// "user" saw is recorded for inspection. An unscripted confirm or prompt is
/// an error, so tests fail loudly instead of silently declining.
pub struct ScriptedInteraction {
    state: Mutex<ScriptedState>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptedState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.state.lock().expect("scripted state lock poisoned")
    }

    /// Queue a confirm dialog reply.
    pub fn push_confirm(&self, reply: bool) {
        self.lock().confirm_replies.push_back(reply);
    }

    /// Queue a prompt dialog reply.
    pub fn push_prompt(&self, reply: PromptReply) {
        self.lock().prompt_replies.push_back(reply);
    }

    /// All alert messages shown.
    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    /// Messages of all confirm dialogs shown.
    pub fn confirms_seen(&self) -> Vec<String> {
        self.lock().confirms_seen.clone()
    }

    /// Everything copied to the clipboard.
    pub fn clipboard(&self) -> Vec<String> {
        self.lock().clipboard.clone()
    }
}

impl Default for ScriptedInteraction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InteractionService for ScriptedInteraction {
    async fn alert(&self, message: &str) -> Result<()> {
        self.lock().alerts.push(message.to_string());
        Ok(())
    }

    async fn confirm(&self, options: ConfirmOptions) -> Result<bool> {
        let mut state = self.lock();
        state.confirms_seen.push(options.message);
        state
            .confirm_replies
            .pop_front()
            .ok_or_else(|| Error::Interaction("No scripted confirm reply".to_string()))
    }

    async fn prompt(&self, _options: PromptOptions) -> Result<PromptReply> {
        self.lock()
            .prompt_replies
            .pop_front()
            .ok_or_else(|| Error::Interaction("No scripted prompt reply".to_string()))
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        self.lock().clipboard.push(text.to_string());
        Ok(())
    }
}
