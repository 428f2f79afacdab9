use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Fixed UTC offset of the deployment (Moscow time).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;
/// Seconds between the end of one engine pass and the start of the next.
pub const DEFAULT_TICK_SECS: u64 = 60;
/// Seconds a delivered reminder stays in the group before cleanup removes it.
pub const DEFAULT_RETENTION_SECS: u64 = 600;

/// Top-level config (raidbell.toml + RAIDBELL_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Chat the reminders are posted to (group/channel id, usually negative).
    pub group_chat_id: i64,
    /// Admin allowlist: Telegram usernames (leading `@` optional) or numeric
    /// user ids. An empty list denies everyone.
    #[serde(default)]
    pub admin_users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Hours east of UTC applied to every clock reading.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Sleep between evaluation passes.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Retention window before a delivered reminder is deleted again.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            tick_secs: DEFAULT_TICK_SECS,
            retention_secs: DEFAULT_RETENTION_SECS,
        }
    }
}

impl BotConfig {
    /// Load config from a TOML file with RAIDBELL_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.raidbell/raidbell.toml
    ///
    /// Env overrides use `__` as the section separator, e.g.
    /// `RAIDBELL_TELEGRAM__BOT_TOKEN`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: BotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("RAIDBELL_").split("__"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}
fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}
fn default_retention_secs() -> u64 {
    DEFAULT_RETENTION_SECS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.raidbell/raidbell.db", home)
}
fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.raidbell/raidbell.toml", home)
}
