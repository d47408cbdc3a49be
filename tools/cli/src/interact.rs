//! Console interaction service.

use std::io::{self, Write as _};

use async_trait::async_trait;

use seedvault_common::{Error, Result};
use seedvault_vault::{
    ConfirmOptions, InputKind, InteractionService, PromptOptions, PromptReply,
};

/// Interaction service over stdin/stdout.
///
/// Confirmations are y/n questions, passphrase prompts go through rpassword
/// (no echo), and the clipboard is the system clipboard via arboard.
pub struct ConsoleInteraction;

impl ConsoleInteraction {
    fn read_line() -> Result<String> {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

#[async_trait]
impl InteractionService for ConsoleInteraction {
    async fn alert(&self, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }

    async fn confirm(&self, options: ConfirmOptions) -> Result<bool> {
        println!("\n{}", options.title);
        println!("{}", options.message);
        print!("{} [y] / {} [n]: ", options.ok_text, options.cancel_text);
        io::stdout().flush()?;

        let answer = Self::read_line()?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    async fn prompt(&self, options: PromptOptions) -> Result<PromptReply> {
        println!("\n{}", options.title);
        println!("{}", options.message);

        let text = match options.input {
            InputKind::Password => {
                rpassword::prompt_password(format!("{} (empty to cancel): ", options.ok_text))?
            }
            InputKind::Text => {
                print!("{} (empty to cancel): ", options.ok_text);
                io::stdout().flush()?;
                Self::read_line()?
            }
        };

        if text.is_empty() {
            Ok(PromptReply::cancelled())
        } else {
            Ok(PromptReply::confirmed(text))
        }
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| Error::Interaction(format!("Clipboard unavailable: {}", e)))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| Error::Interaction(format!("Clipboard write failed: {}", e)))?;
        Ok(())
    }
}
