//! Global configuration parsing, validation, and credential loading.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::models::mode::Mode;
use crate::{AppError, Result};

const KEYRING_SERVICE: &str = "scrim-coordinator";

/// Chat-platform connectivity and guild layout.
///
/// The bot token is loaded at runtime via OS keychain or environment
/// variables, never from the TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PlatformConfig {
    /// REST API base URL of the chat platform.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Guild (server) that hosts the lobbies.
    pub guild_id: String,
    /// Category under which session channels are created.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Role granted access to every session channel.
    #[serde(default)]
    pub moderator_role_id: Option<String>,
    /// Role assigned while a member serves a matchmaking ban.
    pub penalty_role_id: String,
    /// Channel receiving ban notices.
    #[serde(default)]
    pub mod_log_channel_id: Option<String>,
    /// Bot token (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".into()
}

/// REST backend holding session, report, and player records.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL of the REST backend (without the `/rest/v1` suffix).
    pub url: String,
    /// Service key (populated at runtime).
    #[serde(skip)]
    pub api_key: String,
}

/// Election windows and cleanup horizons, in seconds unless noted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Ready-check window.
    #[serde(default = "default_ready_check_seconds")]
    pub ready_check_seconds: u64,
    /// Captain proposal window.
    #[serde(default = "default_captain_seconds")]
    pub captain_seconds: u64,
    /// Host volunteering window.
    #[serde(default = "default_host_seconds")]
    pub host_seconds: u64,
    /// Post-match "report a problem" window.
    #[serde(default = "default_report_window_seconds")]
    pub report_window_seconds: u64,
    /// Lifetime of temporary channels before the expiry sweep removes them.
    #[serde(default = "default_temp_channel_hours")]
    pub temp_channel_hours: u32,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            ready_check_seconds: default_ready_check_seconds(),
            captain_seconds: default_captain_seconds(),
            host_seconds: default_host_seconds(),
            report_window_seconds: default_report_window_seconds(),
            temp_channel_hours: default_temp_channel_hours(),
        }
    }
}

impl TimeoutConfig {
    /// Ready-check window as a [`Duration`].
    #[must_use]
    pub fn ready_check(&self) -> Duration {
        Duration::from_secs(self.ready_check_seconds)
    }

    /// Captain proposal window as a [`Duration`].
    #[must_use]
    pub fn captain(&self) -> Duration {
        Duration::from_secs(self.captain_seconds)
    }

    /// Host volunteering window as a [`Duration`].
    #[must_use]
    pub fn host(&self) -> Duration {
        Duration::from_secs(self.host_seconds)
    }

    /// Report window as a [`Duration`].
    #[must_use]
    pub fn report_window(&self) -> Duration {
        Duration::from_secs(self.report_window_seconds)
    }
}

fn default_ready_check_seconds() -> u64 {
    30
}

fn default_captain_seconds() -> u64 {
    15
}

fn default_host_seconds() -> u64 {
    30
}

fn default_report_window_seconds() -> u64 {
    120
}

fn default_temp_channel_hours() -> u32 {
    2
}

/// Ban escalation schedule.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BanConfig {
    /// Suspension minutes for the first strikes, in order.
    #[serde(default = "default_table_minutes")]
    pub table_minutes: Vec<u64>,
    /// Base minutes doubled for every strike past the table.
    #[serde(default = "default_escalation_base_minutes")]
    pub escalation_base_minutes: u64,
    /// UTC hour at which all strike counts reset.
    #[serde(default)]
    pub reset_hour_utc: u32,
    /// UTC minute at which all strike counts reset.
    #[serde(default)]
    pub reset_minute_utc: u32,
}

impl Default for BanConfig {
    fn default() -> Self {
        Self {
            table_minutes: default_table_minutes(),
            escalation_base_minutes: default_escalation_base_minutes(),
            reset_hour_utc: 0,
            reset_minute_utc: 0,
        }
    }
}

fn default_table_minutes() -> Vec<u64> {
    vec![5, 10, 20, 30]
}

fn default_escalation_base_minutes() -> u64 {
    60
}

fn default_http_port() -> u16 {
    3000
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP port for the result ingestion and gateway relay endpoints.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Chat-platform settings.
    pub platform: PlatformConfig,
    /// REST backend settings.
    pub backend: BackendConfig,
    /// Election windows and cleanup horizons.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Ban escalation schedule.
    #[serde(default)]
    pub bans: BanConfig,
    /// Match modes keyed by lobby voice channel name.
    pub modes: Vec<Mode>,
    /// Shared secret for signed result deliveries (populated at runtime).
    #[serde(skip)]
    pub ingest_secret: Option<String>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load secrets from OS keychain with env-var fallback.
    ///
    /// The platform token and backend key are required; the ingestion
    /// secret is optional and disables signature checks when absent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required secret is missing.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.platform.bot_token = load_credential("bot_token", "SCRIM_BOT_TOKEN").await?;
        self.backend.api_key = load_credential("backend_key", "SCRIM_BACKEND_KEY").await?;
        self.ingest_secret = load_credential("ingest_secret", "SCRIM_INGEST_SECRET")
            .await
            .ok();
        Ok(())
    }

    /// Find the mode whose lobby channel carries `channel_name`.
    #[must_use]
    pub fn mode_for_lobby(&self, channel_name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.lobby_channel == channel_name)
    }

    fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(AppError::Config("at least one mode is required".into()));
        }

        let mut lobbies = HashSet::new();
        for mode in &self.modes {
            if mode.team_size == 0 {
                return Err(AppError::Config(format!(
                    "mode {} must have a team_size greater than zero",
                    mode.label
                )));
            }
            if !lobbies.insert(mode.lobby_channel.as_str()) {
                return Err(AppError::Config(format!(
                    "lobby channel {} is mapped to more than one mode",
                    mode.lobby_channel
                )));
            }
        }

        if self.bans.table_minutes.is_empty() {
            return Err(AppError::Config("bans.table_minutes must not be empty".into()));
        }

        if self.bans.reset_hour_utc > 23 || self.bans.reset_minute_utc > 59 {
            return Err(AppError::Config(
                "bans reset time must be a valid hour and minute".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
