//! Server configuration read from the environment.
//!
//! | variable             | default          |
//! |----------------------|------------------|
//! | `PAYOUT_BIND_ADDR`   | `127.0.0.1:3000` |
//! | `PAYOUT_LEDGER_FILE` | unset            |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, Result};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON array of prior payments used to seed the cumulative ledger.
    pub ledger_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_addr = lookup("PAYOUT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|err| {
            EngineError::Config(format!("PAYOUT_BIND_ADDR {raw_addr:?}: {err}"))
        })?;
        let ledger_file = lookup("PAYOUT_LEDGER_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            ledger_file,
        })
    }
}
