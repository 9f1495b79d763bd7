use dayplan_core::recurrence::ExpansionConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Where the event API lives
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Fallback log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Give up on a request to the event API after this long
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub recurrence: ExpansionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Configuration for reminder polling
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct NotificationConfig {
    /// How often due reminders are checked
    pub poll_interval_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 1000 }
    }
}

impl NotificationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            log_level: default_log_level(),
            request_timeout_ms: default_request_timeout_ms(),
            recurrence: ExpansionConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    pub fn new() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("dayplan.toml"))
                .merge(Env::prefixed("DAYPLAN_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}
