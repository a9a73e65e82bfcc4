//! # MediChain Terminal
//!
//! `medichain` command: inspect and drive the wallet session from a shell.
//!
//! ```text
//! medichain status
//! medichain manual 0x9f1c...e4b2
//! medichain watch
//! ```

mod cli;
mod commands;
mod debug;
mod session;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    let _log_guard = debug::init_logger();

    let result = commands::run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
    }
    result
}
