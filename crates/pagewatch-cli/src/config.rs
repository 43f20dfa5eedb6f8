//! 起動時設定の読み込み
//!
//! 設定は起動時に環境変数（`.env` 対応）から 1 回だけ読みます。
//! ループ本体は Config を知らず、組み立て時に値を受け取るだけです。

use std::time::Duration;

use thiserror::Error;

const DEFAULT_REFRESH_PERIOD_MS: u64 = 5000;
const DEFAULT_STATUS_PROPERTY: &str = "Status";
const DEFAULT_TITLE_PROPERTY: &str = "Name";

#[derive(Debug, Clone)]
pub struct Config {
    pub notion_key: String,
    pub notion_database_id: String,
    pub status_property: String,
    pub title_property: String,
    pub email_host: String,
    pub email_port: u16,
    pub email_user: String,
    pub email_pass: String,
    pub email_from: String,
    pub email_to: String,
    pub refresh_period: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a Config from any name → value lookup (testable without
    /// touching the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let email_port = {
            let raw = required("EMAIL_PORT")?;
            raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "EMAIL_PORT",
                value: raw,
            })?
        };

        let refresh_period = match lookup("REFRESH_PERIOD_MS") {
            Some(raw) if !raw.is_empty() => {
                let ms = raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: "REFRESH_PERIOD_MS",
                    value: raw,
                })?;
                Duration::from_millis(ms)
            }
            _ => Duration::from_millis(DEFAULT_REFRESH_PERIOD_MS),
        };

        Ok(Self {
            notion_key: required("NOTION_KEY")?,
            notion_database_id: required("NOTION_DATABASE_ID")?,
            status_property: lookup("STATUS_PROPERTY")
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS_PROPERTY.to_string()),
            title_property: lookup("TITLE_PROPERTY")
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE_PROPERTY.to_string()),
            email_host: required("EMAIL_HOST")?,
            email_port,
            email_user: required("EMAIL_USER")?,
            email_pass: required("EMAIL_PASS")?,
            email_from: required("EMAIL_FROM_FIELD")?,
            email_to: required("EMAIL_TO_FIELD")?,
            refresh_period,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("NOTION_KEY", "secret_k"),
            ("NOTION_DATABASE_ID", "db1"),
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_PORT", "465"),
            ("EMAIL_USER", "user"),
            ("EMAIL_PASS", "pass"),
            ("EMAIL_FROM_FIELD", "watch@example.com"),
            ("EMAIL_TO_FIELD", "team@example.com"),
        ])
    }

    fn from_map(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn full_environment_parses() {
        let mut env = base_env();
        env.insert("REFRESH_PERIOD_MS", "1500");
        env.insert("STATUS_PROPERTY", "State");

        let config = from_map(&env).unwrap();

        assert_eq!(config.email_port, 465);
        assert_eq!(config.refresh_period, Duration::from_millis(1500));
        assert_eq!(config.status_property, "State");
        assert_eq!(config.title_property, "Name");
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = from_map(&base_env()).unwrap();

        assert_eq!(config.refresh_period, Duration::from_millis(5000));
        assert_eq!(config.status_property, "Status");
        assert_eq!(config.title_property, "Name");
    }

    #[test]
    fn missing_required_variable_is_an_error() {
        let mut env = base_env();
        env.remove("NOTION_KEY");

        assert!(matches!(
            from_map(&env),
            Err(ConfigError::Missing("NOTION_KEY"))
        ));
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut env = base_env();
        env.insert("EMAIL_HOST", "");

        assert!(matches!(
            from_map(&env),
            Err(ConfigError::Missing("EMAIL_HOST"))
        ));
    }

    #[test]
    fn unparsable_numbers_are_rejected() {
        let mut env = base_env();
        env.insert("REFRESH_PERIOD_MS", "soon");

        assert!(matches!(
            from_map(&env),
            Err(ConfigError::Invalid {
                name: "REFRESH_PERIOD_MS",
                ..
            })
        ));
    }
}
