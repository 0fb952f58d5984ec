//! Server configuration from the environment
//!
//! Every variable has a development default except `DATABASE_URL`, and
//! `TOKEN_SECRET` in release builds.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose;
use catalog::CatalogConfig;
use identity::IdentityConfig;
use kernel::AccountAddress;
use ledger::LedgerConfig;
use purchase::{PurchaseConfig, RewardPolicy};

const TOKEN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub identity: IdentityConfig,
    pub ledger: LedgerConfig,
    pub catalog: CatalogConfig,
    pub purchase: PurchaseConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `lookup` returns the raw value of a variable; blank counts as unset
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        debug_build: bool,
    ) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:1234".to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let identity = {
            let mut config = match var("TOKEN_SECRET") {
                Some(secret) => IdentityConfig {
                    token_secret: decode_secret(&secret)?,
                    ..IdentityConfig::default()
                },
                None if debug_build => IdentityConfig::development(),
                None => bail!("TOKEN_SECRET must be set in production"),
            };
            if let Some(header) = var("TOKEN_HEADER") {
                config.token_header = header.trim().to_ascii_lowercase();
            }
            if let Some(secs) = number(&var, "TOKEN_TTL_SECS")? {
                config.token_ttl = Duration::from_secs(secs);
            }
            config.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);
            config
        };

        let ledger = {
            let mut config = if debug_build {
                LedgerConfig::development()
            } else {
                LedgerConfig::default()
            };
            if let Some(url) = var("LEDGER_RPC_URL") {
                config.rpc_url = url;
            }
            config.token_contract = var("TOKEN_CONTRACT")
                .map(|raw| AccountAddress::parse(&raw))
                .transpose()
                .context("TOKEN_CONTRACT must be a 0x account address")?;
            if let Some(ms) = number(&var, "RECEIPT_POLL_INTERVAL_MS")? {
                config.receipt_poll_interval = Duration::from_millis(ms);
            }
            if let Some(secs) = number(&var, "RPC_REQUEST_TIMEOUT_SECS")? {
                config.request_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = number(&var, "RECEIPT_TIMEOUT_SECS")? {
                config.receipt_timeout = Duration::from_secs(secs);
            }
            config
        };

        let catalog = {
            let mut config = CatalogConfig::default();
            if let Some(url) = var("IPFS_API_URL") {
                config.ipfs_api_url = url;
            }
            if let Some(bytes) = number(&var, "MAX_UPLOAD_BYTES")? {
                config.max_upload_bytes =
                    usize::try_from(bytes).context("MAX_UPLOAD_BYTES is too large")?;
            }
            config
        };

        let purchase = {
            let mut config = PurchaseConfig::default();
            if let Some(policy) = var("REWARD_POLICY") {
                config.reward_policy = policy
                    .parse::<RewardPolicy>()
                    .map_err(anyhow::Error::msg)
                    .context("REWARD_POLICY must be absolute or percent")?;
            }
            if let Some(secs) = number(&var, "SETTLEMENT_TIMEOUT_SECS")? {
                config.settlement_timeout = Duration::from_secs(secs);
            }
            config
        };

        Ok(Self {
            database_url,
            database_max_connections: number(&var, "DATABASE_MAX_CONNECTIONS")?
                .map(u32::try_from)
                .transpose()
                .context("DATABASE_MAX_CONNECTIONS is too large")?
                .unwrap_or(5),
            bind_addr,
            frontend_origins,
            identity,
            ledger,
            catalog,
            purchase,
        })
    }
}

fn number(var: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<u64>> {
    var(key)
        .map(|raw| raw.trim().parse::<u64>())
        .transpose()
        .with_context(|| format!("{key} must be a non-negative integer"))
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<Vec<u8>> {
    let secret = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("TOKEN_SECRET must be base64")?;
    if secret.len() != TOKEN_SECRET_LEN {
        bail!(
            "TOKEN_SECRET must decode to {TOKEN_SECRET_LEN} bytes (got {})",
            secret.len()
        );
    }
    Ok(secret)
}
