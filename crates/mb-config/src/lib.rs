//! # mb-config
//!
//! Layered application settings. Later sources win:
//!
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/{MONGOBNB_ENV}.toml` (optional, `MONGOBNB_ENV` defaults to `development`)
//! 4. `MONGOBNB__SECTION__KEY` environment variables, after `.env` is loaded
//!
//! e.g. `MONGOBNB__DATABASE__URI=mongodb+srv://...` overrides `database.uri`.

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub use secrecy::ExposeSecret;

const ENV_PREFIX: &str = "MONGOBNB";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub notify: NotifySettings,
    pub webhooks: WebhookSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string; usually carries credentials
    #[serde(deserialize_with = "secret_string")]
    pub uri: SecretString,
    pub name: String,
    pub listings_collection: String,
    pub bookings_collection: String,
    /// JSON file the in-memory backend seeds its catalog from
    pub seed_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct NotifySettings {
    /// Target for booking events. Events are only logged when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    /// Routes `POST /webhooks/sms` when enabled
    pub inbound_sms: bool,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    /// Default `tracing` directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Settings {
    /// Loads `.env`, the optional config files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
        }

        let profile = std::env::var("MONGOBNB_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            .add_source(Self::environment());

        Self::from_builder(builder)
    }

    /// Built-in defaults; every key has a value so a bare checkout starts.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "sample_airbnb")?
            .set_default("database.listings_collection", "listingsAndReviews")?
            .set_default("database.bookings_collection", "bookings")?
            .set_default("database.seed_path", "data/listings.json")?
            .set_default("notify.timeout_secs", 5_i64)?
            .set_default("webhooks.inbound_sms", true)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings = Settings::from_builder(Settings::defaults().unwrap()).unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
        assert_eq!(settings.database.name, "sample_airbnb");
        assert_eq!(settings.database.listings_collection, "listingsAndReviews");
        assert_eq!(settings.database.bookings_collection, "bookings");
        assert_eq!(settings.database.uri.expose_secret(), "mongodb://localhost:27017");
        assert!(settings.notify.webhook_url.is_none());
        assert!(settings.webhooks.inbound_sms);
        assert_eq!(settings.log.format, LogFormat::Pretty);
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            [server]
            port = 3000

            [notify]
            webhook_url = "https://hooks.example.com/bookings"

            [log]
            format = "json"
        "#;
        let builder = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));
        let settings = Settings::from_builder(builder).unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.notify.webhook_url.as_deref(),
            Some("https://hooks.example.com/bookings")
        );
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let vars = HashMap::from([
            ("MONGOBNB__DATABASE__URI".to_string(), "mongodb+srv://user:pw@cluster".to_string()),
            ("MONGOBNB__DATABASE__BOOKINGS_COLLECTION".to_string(), "reservations".to_string()),
            ("MONGOBNB__WEBHOOKS__INBOUND_SMS".to_string(), "false".to_string()),
        ]);
        let builder = Settings::defaults()
            .unwrap()
            .add_source(Settings::environment().source(Some(vars)));
        let settings = Settings::from_builder(builder).unwrap();

        assert_eq!(settings.database.uri.expose_secret(), "mongodb+srv://user:pw@cluster");
        assert_eq!(settings.database.bookings_collection, "reservations");
        assert!(!settings.webhooks.inbound_sms);
    }

    #[test]
    fn debug_output_redacts_uri() {
        let vars = HashMap::from([(
            "MONGOBNB__DATABASE__URI".to_string(),
            "mongodb://admin:hunter2@db".to_string(),
        )]);
        let builder = Settings::defaults()
            .unwrap()
            .add_source(Settings::environment().source(Some(vars)));
        let settings = Settings::from_builder(builder).unwrap();

        assert!(!format!("{settings:?}").contains("hunter2"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let builder = Settings::defaults()
            .unwrap()
            .set_override("log.format", "xml")
            .unwrap();
        assert!(Settings::from_builder(builder).is_err());
    }
}
