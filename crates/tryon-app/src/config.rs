use std::env;
use std::time::Duration;

use anyhow::Context;
use tryon_core::upload::DEFAULT_MAX_UPLOAD_MB;

pub const DEFAULT_ENDPOINT: &str = "https://tryon.techrealm.pk/process-image";

#[derive(Debug, Clone, PartialEq)]
pub struct TryOnConfig {
    pub endpoint: String,
    /// No local timeout unless set; the transport's own limits still apply.
    pub timeout: Option<Duration>,
    pub max_upload_mb: u64,
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl TryOnConfig {
    /// Reads `.env` if present, then the `TRYON_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err).context("failed to read .env");
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let endpoint = lookup("TRYON_ENDPOINT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.endpoint);

        let timeout = lookup("TRYON_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("TRYON_TIMEOUT_SECS must be a number, got {value:?}"))
            })
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let max_upload_mb = lookup("TRYON_MAX_UPLOAD_MB")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("TRYON_MAX_UPLOAD_MB must be a number, got {value:?}"))
            })
            .transpose()?
            .unwrap_or(defaults.max_upload_mb);

        Ok(Self {
            endpoint,
            timeout,
            max_upload_mb,
        })
    }
}
