//! Layered settings for the storefront server.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config bunnyhop.toml`)
//! 3. Environment variables prefixed with `BUNNYHOP_`, using `__` between
//!    nested keys (`BUNNYHOP_STOREFRONT__PUBLIC_TOKEN`)
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:3000"
//!
//! [storefront]
//! endpoint = "https://bunnyhop.myshopify.com"
//! api_version = "2025-01"
//! public_token = "..."
//! timeout_secs = 10
//!
//! [locale]
//! country = "US"
//! language = "EN"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;

use storefront_client::client::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use storefront_client::{StorefrontClient, StorefrontError};
use storefront_types::Locale;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid locale {language}-{country}: expected two-letter codes")]
    InvalidLocale { country: String, language: String },

    #[error("storefront.timeout_secs must be greater than zero")]
    InvalidTimeout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storefront: StorefrontSettings,
    pub locale: LocaleSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontSettings {
    pub endpoint: String,
    pub api_version: String,
    #[serde(default)]
    pub public_token: Option<String>,
    pub timeout_secs: u64,
}

/// Locale used when the request path carries none.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleSettings {
    pub country: String,
    pub language: String,
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading `BUNNYHOP_*` variables from `env`
    /// instead of the process environment when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("server.listen_addr", "127.0.0.1:3000")?
            .set_default("storefront.endpoint", DEFAULT_ENDPOINT)?
            .set_default("storefront.api_version", DEFAULT_API_VERSION)?
            .set_default("storefront.timeout_secs", 10)?
            .set_default("locale.country", "US")?
            .set_default("locale.language", "EN")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("BUNNYHOP")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.default_locale()?;
        if self.storefront.timeout_secs == 0 {
            return Err(SettingsError::InvalidTimeout);
        }
        Ok(())
    }

    /// The configured default locale.
    pub fn default_locale(&self) -> Result<Locale, SettingsError> {
        Locale::parse(&self.locale.country, &self.locale.language).ok_or_else(|| {
            SettingsError::InvalidLocale {
                country: self.locale.country.clone(),
                language: self.locale.language.clone(),
            }
        })
    }

    /// Build the Storefront API client these settings describe.
    pub fn storefront_client(&self) -> Result<StorefrontClient, StorefrontError> {
        let mut builder = StorefrontClient::builder()
            .endpoint(&self.storefront.endpoint)
            .api_version(&self.storefront.api_version)
            .timeout(Duration::from_secs(self.storefront.timeout_secs));

        if let Some(token) = &self.storefront.public_token {
            builder = builder.public_token(token);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();

        assert_eq!(settings.server.listen_addr, "127.0.0.1:3000");
        assert_eq!(settings.storefront.endpoint, "https://mock.shop");
        assert_eq!(settings.storefront.api_version, "2025-01");
        assert_eq!(settings.storefront.timeout_secs, 10);
        assert_eq!(settings.default_locale().unwrap(), Locale::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
[server]
listen_addr = "0.0.0.0:8080"

[storefront]
endpoint = "https://bunnyhop.myshopify.com"
public_token = "tok"

[locale]
country = "ca"
language = "fr"
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.storefront.endpoint, "https://bunnyhop.myshopify.com");
        assert_eq!(settings.storefront.public_token.as_deref(), Some("tok"));
        assert_eq!(settings.storefront.api_version, "2025-01");
        assert_eq!(
            settings.default_locale().unwrap(),
            Locale::parse("CA", "FR").unwrap()
        );

        let client = settings.storefront_client().unwrap();
        assert_eq!(
            client.graphql_url(),
            "https://bunnyhop.myshopify.com/api/2025-01/graphql.json"
        );
    }

    #[test]
    fn test_invalid_locale_rejected() {
        let file = write_config("[locale]\ncountry = \"USA\"\n");
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(SettingsError::InvalidLocale { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file = write_config("[storefront]\ntimeout_secs = 0\n");
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(SettingsError::InvalidTimeout)
        ));
    }

    fn env(vars: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let file = write_config(
            r#"
[server]
listen_addr = "0.0.0.0:8080"

[storefront]
endpoint = "https://bunnyhop.myshopify.com"
"#,
        );

        let settings = Settings::load_with_env(
            Some(file.path()),
            env(&[
                ("BUNNYHOP_SERVER__LISTEN_ADDR", "127.0.0.1:9000"),
                ("BUNNYHOP_STOREFRONT__PUBLIC_TOKEN", "from-env"),
                ("BUNNYHOP_STOREFRONT__TIMEOUT_SECS", "3"),
                ("BUNNYHOP_LOCALE__LANGUAGE", "de"),
                ("OTHERAPP_SERVER__LISTEN_ADDR", "0.0.0.0:1"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(settings.storefront.endpoint, "https://bunnyhop.myshopify.com");
        assert_eq!(settings.storefront.public_token.as_deref(), Some("from-env"));
        assert_eq!(settings.storefront.timeout_secs, 3);
        assert_eq!(
            settings.default_locale().unwrap(),
            Locale::parse("US", "DE").unwrap()
        );
    }

    #[test]
    fn test_env_values_are_validated() {
        let result = Settings::load_with_env(None, env(&[("BUNNYHOP_LOCALE__COUNTRY", "usa")]));
        assert!(matches!(result, Err(SettingsError::InvalidLocale { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/bunnyhop.toml");
        assert!(matches!(
            Settings::load(Some(path)),
            Err(SettingsError::Load(_))
        ));
    }
}
