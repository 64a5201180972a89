mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::HubotError;
use crate::message::User;
use defaults::*;

/// Environment variable overriding `leave.instance`.
pub const ENV_CALAMARI_INSTANCE: &str = "CALAMARI_INSTANCE";
/// Environment variable overriding `leave.token`.
pub const ENV_CALAMARI_TOKEN: &str = "CALAMARI_TOKEN";

/// Top-level Hubot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hubot: HubotConfig,
    #[serde(default)]
    pub org: OrgConfig,
    #[serde(default)]
    pub leave: LeaveConfig,
    /// Static user directory, used when no host worker is attached (CLI).
    #[serde(default)]
    pub users: Vec<User>,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Slug of the user whispers are attributed to.
    #[serde(default = "default_bot_slug")]
    pub bot_slug: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily-rotated log files. Empty = log to stderr only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for HubotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            bot_slug: default_bot_slug(),
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// The organisation whose members Hubot answers about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(default = "default_org_slug")]
    pub slug: String,
    /// Members are identified by their address on this domain.
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

impl Default for OrgConfig {
    fn default() -> Self {
        Self {
            slug: default_org_slug(),
            email_domain: default_email_domain(),
        }
    }
}

/// Calamari leave tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveConfig {
    /// Calamari tenant name (`https://{instance}.calamari.io`).
    #[serde(default)]
    pub instance: String,
    /// API token, sent as the Basic-auth password.
    #[serde(default)]
    pub token: String,
    /// Overrides the URL derived from `instance` (e.g. for a proxy).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Additional attempts after a transient (429/5xx) failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed pause between attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Maximum number of users kept in the leave cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Pause between consecutive per-user fetches when filling the cache.
    #[serde(default = "default_fetch_spacing_ms")]
    pub fetch_spacing_ms: u64,
    /// How far ahead the warm-up job fetches leave.
    #[serde(default = "default_warm_horizon_months")]
    pub warm_horizon_months: u32,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            instance: String::new(),
            token: String::new(),
            base_url: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_capacity: default_cache_capacity(),
            fetch_spacing_ms: default_fetch_spacing_ms(),
            warm_horizon_months: default_warm_horizon_months(),
        }
    }
}

impl LeaveConfig {
    /// Base URL of the Calamari API for this config.
    pub fn api_base_url(&self) -> String {
        match self.base_url {
            Some(ref url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://{}.calamari.io", self.instance),
        }
    }

    /// Whether enough is configured to talk to Calamari.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
            && (!self.instance.is_empty() || self.base_url.as_deref().is_some_and(|u| !u.is_empty()))
    }
}

impl Config {
    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(instance) = lookup(ENV_CALAMARI_INSTANCE).filter(|v| !v.is_empty()) {
            self.leave.instance = instance;
        }
        if let Some(token) = lookup(ENV_CALAMARI_TOKEN).filter(|v| !v.is_empty()) {
            self.leave.token = token;
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Parse configuration from TOML text, without environment overrides.
pub fn parse(content: &str) -> Result<Config, HubotError> {
    toml::from_str(content).map_err(|e| HubotError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Environment overrides
/// are applied in both cases.
pub fn load(path: &str) -> Result<Config, HubotError> {
    let expanded = shellexpand(path);
    let path = Path::new(&expanded);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HubotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
