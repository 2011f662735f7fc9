//! PropChain wallet session CLI.
//!
//! Drives one session round against the configured EIP-1193 runtime and
//! prints the resulting snapshot. Commands: `status`, `connect`,
//! `disconnect`, `switch`, `verify`.

use eyre::bail;

use propchain_wallet_adapters::{
    AccountCacheAdapter, Eip1193Adapter, EntropyAdapter, WalletAdapterConfig,
};
use propchain_wallet_core::{truncate_address, ChainDescriptor, SessionSnapshot, WalletSession};

type CliSession = WalletSession<Eip1193Adapter, AccountCacheAdapter, EntropyAdapter>;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let command = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "status".to_owned());

    let config = WalletAdapterConfig::from_env();
    let session: CliSession = WalletSession::new(
        Eip1193Adapter::with_config(config.clone()),
        AccountCacheAdapter::with_config(&config),
        EntropyAdapter,
        config.target_chain_id,
    );

    session.bootstrap();

    match command.as_str() {
        "status" => {}
        "connect" => {
            if let Err(err) = session.connect() {
                tracing::warn!(%err, "connect failed");
            }
        }
        "disconnect" => {
            if let Err(err) = session.disconnect() {
                tracing::warn!(%err, "disconnect failed");
            }
        }
        "switch" => {
            if let Err(err) = session.switch_network() {
                tracing::warn!(%err, "network switch failed");
            }
        }
        "verify" => {
            // Ownership verification needs a connected account first.
            if let Err(err) = session.connect() {
                tracing::warn!(%err, "connect failed");
            } else if let Err(err) = session.verify_ownership() {
                tracing::warn!(%err, "ownership verification failed");
            }
        }
        other => bail!("unknown command: {other} (expected status|connect|disconnect|switch|verify)"),
    }

    session.pump_events()?;
    print_status(&session.snapshot()?);
    Ok(())
}

fn print_status(snapshot: &SessionSnapshot) {
    match snapshot.account {
        Some(account) => println!("account:      {}", truncate_address(&account.to_string(), 4)),
        None => println!("account:      (not connected)"),
    }
    match snapshot.chain_id {
        Some(chain_id) => println!("network:      {}", ChainDescriptor::display_name(chain_id)),
        None => println!("network:      (unknown)"),
    }
    println!(
        "target:       {}",
        ChainDescriptor::display_name(snapshot.target_chain_id)
    );
    println!("on target:    {}", snapshot.is_on_target_network);
    println!("verification: {}", snapshot.verification.status);
    if let Some(error) = &snapshot.error {
        println!("error:        {error}");
    }
    if let Some(error) = &snapshot.verification.error {
        println!("verify error: {error}");
    }
}
