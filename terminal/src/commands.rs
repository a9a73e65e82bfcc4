//! Command handlers

use anyhow::{bail, Context, Result};
use tracing::info;

use lib_utils::get_env;
use lib_wallet::{ConnectionStatus, Transition, WalletConfig};

use crate::cli::{Cli, Command};
use crate::session::{render_line, render_state, Session};

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = WalletConfig::from_env().context("Failed to read configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    info!(
        command = ?cli.command,
        network = %config.network,
        session_file = %config.session_file.display(),
        "Running command"
    );

    let session = Session::open(&config);
    session
        .controller
        .on_notice(|notice| eprintln!("Notice: {}", notice));
    session.controller.restore().await?;

    match cli.command {
        Command::Status => status(&session).await,
        Command::Wallets => wallets(&session),
        Command::Connect { index } => connect(&session, index).await,
        Command::Manual { address } => manual(&session, &address).await,
        Command::Demo => demo(&session).await,
        Command::Disconnect => disconnect(&session).await,
        Command::Balance => balance(&session).await,
        Command::Watch => watch(&session).await,
    }
}

/// Command-line flags win over the environment. Switching network also
/// switches the full node unless one was configured explicitly.
fn apply_overrides(config: &mut WalletConfig, cli: &Cli) {
    if let Some(network) = cli.network {
        config.network = network;
        if get_env("MEDICHAIN_RPC_URL").is_err() {
            config.rpc_url = network.rpc_url().to_string();
        }
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.clone();
    }
}

async fn status(session: &Session) -> Result<()> {
    let since = session.connected_since().await;
    let state = session.controller.state();
    if state.status == ConnectionStatus::Connected {
        if let Err(e) = session.controller.refresh_balance().await {
            eprintln!("Balance unavailable: {}", e.user_message());
        }
    }
    print!("{}", render_state(&session.controller.state(), since));
    Ok(())
}

fn wallets(session: &Session) -> Result<()> {
    let providers = session.controller.detect_providers();
    if providers.is_empty() {
        println!("No wallet providers detected.");
        println!("Use `medichain manual <address>` for a read-only session or `medichain demo`.");
        return Ok(());
    }

    for (index, provider) in providers.iter().enumerate() {
        let signing = if provider.signer().is_some() { "can sign" } else { "read-only" };
        println!("{:>2}  {:<24} {:?}, {}", index, provider.name(), provider.tag(), signing);
    }
    Ok(())
}

async fn connect(session: &Session, index: usize) -> Result<()> {
    session.controller.detect_providers();

    match session.controller.request_connect(index).await? {
        Transition::Applied => {}
        Transition::Ignored => bail!(
            "Cannot connect while {}; run `medichain disconnect` first",
            session.controller.state().status
        ),
        Transition::Stale => bail!("Connection attempt was superseded"),
    }

    let state = session.controller.state();
    if let ConnectionStatus::Error(reason) = &state.status {
        bail!("Connection failed: {}", reason);
    }
    print!("{}", render_state(&state, session.connected_since().await));
    Ok(())
}

async fn manual(session: &Session, address: &str) -> Result<()> {
    if session.controller.request_manual_connect(address).await? == Transition::Ignored {
        bail!(
            "Cannot connect while {}; run `medichain disconnect` first",
            session.controller.state().status
        );
    }

    session.controller.refresh_balance().await.ok();
    print!(
        "{}",
        render_state(&session.controller.state(), session.connected_since().await)
    );
    Ok(())
}

async fn demo(session: &Session) -> Result<()> {
    session.controller.enter_demo_mode().await?;
    print!(
        "{}",
        render_state(&session.controller.state(), session.connected_since().await)
    );
    Ok(())
}

async fn disconnect(session: &Session) -> Result<()> {
    match session.controller.disconnect().await? {
        Transition::Ignored => println!("No active session."),
        _ => println!("Disconnected."),
    }
    Ok(())
}

async fn balance(session: &Session) -> Result<()> {
    match session.controller.refresh_balance().await? {
        Some(balance) => println!("{}", balance),
        None => bail!("No active session"),
    }
    Ok(())
}

async fn watch(session: &Session) -> Result<()> {
    let state = session.controller.state();
    if !state.status.is_connected() {
        bail!("No active session to watch");
    }

    println!("{}", render_line(&state));
    session
        .controller
        .on_state_change(|state| println!("{}", render_line(state)));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Watch stopped");
    Ok(())
}
