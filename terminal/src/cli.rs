//! Command line definition

use clap::{Parser, Subcommand};
use shared::dto::Network;
use std::path::PathBuf;

/// Manage the MediChain wallet session from the command line.
#[derive(Debug, Parser)]
#[command(name = "medichain", version, about)]
pub struct Cli {
    /// Network new sessions are bound to (overrides MEDICHAIN_NETWORK)
    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Session file (overrides MEDICHAIN_SESSION_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the current session
    Status,

    /// List detected wallet providers
    Wallets,

    /// Connect through a detected wallet provider
    Connect {
        /// Provider index as listed by `medichain wallets`
        index: usize,
    },

    /// Open a read-only session for a Sui address
    Manual {
        /// 0x followed by 64 hex characters
        address: String,
    },

    /// Switch to demo mode (no wallet, zero balance, no network calls)
    Demo,

    /// End the current session
    Disconnect,

    /// Fetch the balance of the current session once
    Balance,

    /// Keep polling and print every state change until Ctrl-C
    Watch,
}
