use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gym: GymConfig,
    #[serde(default)]
    pub credential: CredentialConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GymConfig {
    pub name: String,
    /// Offset from UTC, in minutes, of the gym's wall clock. Coverage is
    /// evaluated against the calendar date at this offset.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            name: "Gymdesk".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl GymConfig {
    /// Today's calendar date on the gym's wall clock.
    pub fn today(&self) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "utc_offset_minutes {} is out of range, falling back to UTC",
                    self.utc_offset_minutes
                );
                Utc.fix()
            });
        Utc::now().with_timezone(&offset).date_naive()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CredentialConfig {
    /// When set, issued credentials carry an HMAC-SHA256 signature and the
    /// verifier rejects payloads without a matching one.
    pub signing_secret: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5001)?
            .set_default("database.url", "sqlite://gymdesk.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("gym.name", "Gymdesk")?
            .set_default("gym.utc_offset_minutes", 0)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with GYMDESK prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("GYMDESK").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5001,
            },
            database: DatabaseConfig {
                url: "sqlite://gymdesk.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            gym: GymConfig::default(),
            credential: CredentialConfig::default(),
        }
    }
}
