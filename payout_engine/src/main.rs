//! Entry point for the Payout Engine binary.
//!
//! Running this binary starts an HTTP server exposing the payout,
//! payable and milestone calculators.  The bind address is taken from
//! `PAYOUT_BIND_ADDR` and an optional ledger of prior payments from
//! `PAYOUT_LEDGER_FILE`; see [`payout_engine::config`].  Log verbosity
//! follows `RUST_LOG` and defaults to `info`.

use payout_engine::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    payout_engine::api::serve(config).await
}
