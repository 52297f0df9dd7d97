//! 命令行定义与分发

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{domain::chain_config::ChainVariant, service::wallet_service::WalletService};

/// IronSeed HD wallet CLI
#[derive(Debug, Parser)]
#[command(name = "ironseed", about = "Multi-chain HD wallet key manager", version)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Seed phrase lifecycle
    Mnemonic {
        #[command(subcommand)]
        action: MnemonicCommand,
    },
    /// Derived wallets per chain
    Wallet {
        #[command(subcommand)]
        action: WalletCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum MnemonicCommand {
    /// Generate a new seed phrase, replacing the current one
    Generate,
    /// Import an existing seed phrase
    Import {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Show the current seed phrase
    Show {
        #[arg(long)]
        reveal: bool,
    },
    /// Remove the seed phrase and every stored wallet
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum WalletCommand {
    /// Derive and store the next wallet
    Add { chain: ChainVariant },
    /// Regenerate and list stored wallets
    List {
        chain: ChainVariant,
        #[arg(long)]
        show_secrets: bool,
    },
    /// Delete a wallet by its list position
    Delete { chain: ChainVariant, position: usize },
}

/// 执行一条命令，结果写入 `out`
pub fn execute<W: Write>(service: &mut WalletService, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Mnemonic { action } => execute_mnemonic(service, action, out),
        Commands::Wallet { action } => execute_wallet(service, action, out),
    }
}

fn execute_mnemonic<W: Write>(
    service: &mut WalletService,
    action: MnemonicCommand,
    out: &mut W,
) -> Result<()> {
    match action {
        MnemonicCommand::Generate => {
            let phrase = service
                .generate_mnemonic()
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            writeln!(out, "New seed phrase generated successfully!")?;
            writeln!(out, "{}", phrase.as_str())?;
        }
        MnemonicCommand::Import { words } => {
            let phrase = zeroize::Zeroizing::new(words.join(" "));
            service
                .try_import_mnemonic(&phrase)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            writeln!(out, "Seed phrase imported successfully!")?;
        }
        MnemonicCommand::Show { reveal } => match service.mnemonic_manager().mnemonic() {
            None => writeln!(out, "No seed phrase stored.")?,
            Some(mnemonic) if reveal => writeln!(out, "{}", mnemonic.phrase())?,
            Some(mnemonic) => writeln!(
                out,
                "Seed phrase stored ({} words). Use --reveal to display it.",
                mnemonic.word_count()
            )?,
        },
        MnemonicCommand::Clear => {
            service
                .clear_mnemonic()
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            writeln!(out, "Seed phrase and all wallets cleared")?;
        }
    }
    Ok(())
}

fn execute_wallet<W: Write>(
    service: &mut WalletService,
    action: WalletCommand,
    out: &mut W,
) -> Result<()> {
    match action {
        WalletCommand::Add { chain } => {
            let key = service.add_wallet(chain).map_err(|e| anyhow::anyhow!(e))?;
            writeln!(out, "{} wallet created successfully!", chain.display_name())?;
            writeln!(out, "{}\t{}", key.path, key.public_address)?;
        }
        WalletCommand::List {
            chain,
            show_secrets,
        } => {
            let report = service
                .regenerate_report(chain)
                .map_err(|e| anyhow::anyhow!(e.user_message()))
                .with_context(|| format!("Failed to load {} wallets", chain))?;

            if report.wallets.is_empty() {
                writeln!(out, "No {} wallets.", chain.display_name())?;
            }
            for wallet in &report.wallets {
                let key = &wallet.key;
                if show_secrets {
                    writeln!(out, "{}\t{}\t{}\t{}", wallet.position, key.path, key.public_address, key.secret())?;
                } else {
                    writeln!(out, "{}\t{}\t{}", wallet.position, key.path, key.public_address)?;
                }
            }
            if !report.is_complete() {
                writeln!(out, "{} stored path(s) could not be regenerated.", report.skipped.len())?;
            }
        }
        WalletCommand::Delete { chain, position } => {
            service
                .delete_wallet(chain, position)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            writeln!(out, "Wallet deleted successfully")?;
        }
    }
    Ok(())
}
