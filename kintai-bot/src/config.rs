use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};
use time::{macros::format_description, UtcOffset};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub teamspirit: TeamSpiritSettings,
    pub salesforce: OAuthSettings,
    pub slack: SlackSettings,
    pub state: StateSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    /// Public URL the OAuth callbacks are reached at.
    pub base_url: String,
    /// Offset of the business day, e.g. `+09:00`.
    pub utc_offset: String,
}

impl ApplicationSettings {
    pub fn business_offset(&self) -> Result<UtcOffset, time::error::Parse> {
        UtcOffset::parse(
            self.utc_offset.trim(),
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
    }

    pub fn callback_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Deserialize, Clone)]
pub struct TeamSpiritSettings {
    /// Salesforce org host serving the Dakoku endpoint.
    pub host: String,
    #[serde(default)]
    pub use_attendance_endpoint: bool,
    /// Bulk-month pushes one dated update per day and relies on the
    /// endpoint honoring the `date` query.
    #[serde(default)]
    pub bulk_month_enabled: bool,
}

#[derive(Deserialize, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
}

#[derive(Deserialize, Clone)]
pub struct SlackSettings {
    pub verification_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct StateSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub ttl_seconds: u64,
}

impl StateSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("no current directory: {}", e)))?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("invalid APP_ENVIRONMENT: {}", e)))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("KINTAI")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
