//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::{Context, anyhow};

use tokengate_auth::SigningKey;
use tokengate_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Administrator seeded at startup so the admin-only endpoints are reachable.
pub struct BootstrapAdmin {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    pub signing_key: SigningKey,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let signing_key = get("TOKENGATE_SIGNING_KEY")
            .ok_or_else(|| anyhow!("TOKENGATE_SIGNING_KEY must be set"))?;
        let signing_key = SigningKey::from_bytes(signing_key.into_bytes())
            .context("TOKENGATE_SIGNING_KEY is not usable")?;

        let bind_addr = get("TOKENGATE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("TOKENGATE_BIND_ADDR must be a socket address")?;

        let log_format = match get("TOKENGATE_LOG_FORMAT") {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|e| anyhow!("TOKENGATE_LOG_FORMAT: {e}"))?,
            None => LogFormat::default(),
        };

        let bootstrap_admin = match (
            get("TOKENGATE_BOOTSTRAP_ADMIN_USERNAME"),
            get("TOKENGATE_BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                username,
                email: get("TOKENGATE_BOOTSTRAP_ADMIN_EMAIL"),
                password,
            }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "TOKENGATE_BOOTSTRAP_ADMIN_USERNAME and TOKENGATE_BOOTSTRAP_ADMIN_PASSWORD must be set together"
                ));
            }
        };

        Ok(Self {
            bind_addr,
            log_format,
            signing_key,
            bootstrap_admin,
        })
    }
}
