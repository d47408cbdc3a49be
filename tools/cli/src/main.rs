//! SeedVault CLI - encrypted seed phrase vault with tag exchange.
//!
//! Seeds are encrypted with a per-entry passphrase and kept in a local
//! settings file; single entries can be written to / imported from a
//! simulated proximity tag (a local file standing in for the radio driver).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use seedvault_cipher::{mnemonic, PassphraseCipher};
use seedvault_medium::{FileMedium, ScanOptions, TagMedium};
use seedvault_store::FileStore;
use seedvault_vault::{
    ImportOutcome, InputKind, InteractionService, PromptOptions, SeedVault, TagExchange,
    VaultFlows,
};

mod interact;
use interact::ConsoleInteraction;

#[derive(Parser)]
#[command(name = "seedvault")]
#[command(about = "SeedVault - encrypted seed phrase vault with tag exchange")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Settings file backing the vault.
    #[arg(long, default_value = "seedvault.json")]
    store: PathBuf,

    /// File standing in for the physical tag.
    #[arg(long, default_value = "tag.txt")]
    tag: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vault entries (newest first).
    List,

    /// Encrypt and store a new seed phrase.
    Add {
        /// Generate a fresh BIP-39 mnemonic of this many words instead of
        /// typing one (12, 15, 18, 21 or 24).
        #[arg(long)]
        generate: Option<usize>,
    },

    /// Decrypt an entry and optionally copy it to the clipboard.
    Reveal {
        /// Entry position as shown by `list`.
        position: usize,
    },

    /// Remove an entry.
    Remove {
        /// Entry position as shown by `list`.
        position: usize,
    },

    /// Scan the tag and import its seed if it is new.
    Import {
        /// Keep the listener up after the first read.
        #[arg(long)]
        keep_listening: bool,
    },

    /// Write an entry to the tag.
    Export {
        /// Entry position as shown by `list`.
        position: usize,
    },

    /// Write a URI record to the tag.
    WriteUri { uri: String },

    /// Erase the tag.
    EraseTag,

    /// Show tag radio availability.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = Arc::new(FileStore::new(&cli.store).context("Cannot open settings store")?);
    let cipher = Arc::new(PassphraseCipher::new());
    let medium = FileMedium::new(&cli.tag);
    let interaction = ConsoleInteraction;

    let mut vault = SeedVault::load(cipher, store)
        .await
        .context("Cannot load vault")?;

    match cli.command {
        Commands::List => {
            if vault.is_empty() {
                println!("Vault is empty.");
            } else {
                for (position, entry) in vault.entries().iter().enumerate() {
                    println!("{:>3}  {}", position, entry.label);
                }
            }
        }

        Commands::Add { generate } => {
            let plaintext = match generate {
                Some(words) => {
                    let phrase = mnemonic::generate(words)?;
                    println!("Generated seed phrase (write it down!):\n\n  {}\n", phrase.expose());
                    phrase
                }
                None => {
                    let reply = interaction
                        .prompt(PromptOptions {
                            title: "New seed".to_string(),
                            message: "Enter the seed phrase to encrypt".to_string(),
                            ok_text: "Continue".to_string(),
                            cancel_text: "Cancel".to_string(),
                            input: InputKind::Text,
                        })
                        .await?;
                    if !reply.confirmed {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    reply.text.into()
                }
            };

            let created = VaultFlows::new(&mut vault, &interaction)
                .encrypt_new(plaintext.expose())
                .await?;
            match created {
                Some(_) => println!("Seed encrypted and stored as {}.", vault.entries()[0].label),
                None => println!("Cancelled."),
            }
        }

        Commands::Reveal { position } => {
            let handle = handle_at(&vault, position)?;
            let mut flows = VaultFlows::new(&mut vault, &interaction);
            flows.reveal(&handle).await?;
        }

        Commands::Remove { position } => {
            let handle = handle_at(&vault, position)?;
            let removed = vault.remove_entry(&handle).await?;
            println!("Removed {}.", removed.label);
        }

        Commands::Import { keep_listening } => {
            let options = ScanOptions {
                stop_after_first_read: !keep_listening,
                scan_hint: Some("Hold a tag near the reader".to_string()),
            };

            let mut exchange = TagExchange::new(&mut vault, &medium, &interaction);
            let outcomes = exchange.import(options).await?;

            if outcomes.is_empty() {
                println!("No tag payloads received.");
            }
            for outcome in outcomes {
                match outcome {
                    ImportOutcome::Imported { label } => println!("Imported '{}'.", label),
                    ImportOutcome::Duplicate { label } => {
                        println!("Already known as '{}'.", label)
                    }
                    ImportOutcome::Declined => println!("Import declined."),
                    ImportOutcome::Rejected { reason } => println!("Skipped tag read: {}", reason),
                }
            }
        }

        Commands::Export { position } => {
            let handle = handle_at(&vault, position)?;
            let mut exchange = TagExchange::new(&mut vault, &medium, &interaction);
            if !exchange.export(&handle).await? {
                println!("Cancelled.");
            }
        }

        Commands::WriteUri { uri } => {
            medium.write_uri(&uri).await?;
            println!("Wrote URI record.");
        }

        Commands::EraseTag => {
            medium.erase().await?;
            println!("Tag erased.");
        }

        Commands::Status => {
            println!("Medium:    {}", medium.name());
            println!("Available: {}", medium.available().await?);
            println!("Enabled:   {}", medium.enabled().await?);
        }
    }

    Ok(())
}

fn handle_at(vault: &SeedVault, position: usize) -> Result<seedvault_vault::EntryHandle> {
    match vault.handle_at(position) {
        Some(handle) => Ok(handle),
        None => bail!(
            "No entry at position {} (vault has {} entries)",
            position,
            vault.len()
        ),
    }
}
