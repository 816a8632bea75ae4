use crate::application::services::AdministratorSeed;
use crate::infrastructure::security::ticket::MIN_SECRET_LENGTH;
use crate::presentation::grid::Culture;
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    cookie_secret: String,
    cookie_name: String,
    ticket_ttl: Duration,
    recovery_window_minutes: i64,
    culture: Culture,
    administrator: Option<AdministratorSeed>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_database_url() -> String {
    "sqlite://mvc_template.db".into()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_cookie_name() -> String {
    "mvc_auth".into()
}

fn default_ticket_ttl() -> u64 {
    60 * 60 * 8
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Build configuration from environment variables, loading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(default_database_url);
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(default_listen_addr);

        let cookie_secret =
            lookup("AUTH_COOKIE_SECRET").ok_or(ConfigError::Missing("AUTH_COOKIE_SECRET"))?;
        if cookie_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "AUTH_COOKIE_SECRET must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        let cookie_name = lookup("AUTH_COOKIE_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(default_cookie_name);

        let ticket_ttl_secs = parse_number(
            "AUTH_TICKET_TTL_SECONDS",
            lookup("AUTH_TICKET_TTL_SECONDS"),
            default_ticket_ttl(),
        )?;
        let recovery_window_minutes = parse_number(
            "RECOVERY_TOKEN_TTL_MINUTES",
            lookup("RECOVERY_TOKEN_TTL_MINUTES"),
            crate::application::services::accounts::DEFAULT_RECOVERY_WINDOW_MINUTES,
        )?;
        if recovery_window_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "RECOVERY_TOKEN_TTL_MINUTES must be positive".into(),
            ));
        }

        let culture = match lookup("APP_CULTURE") {
            Some(name) => name.parse::<Culture>().map_err(ConfigError::Invalid)?,
            None => Culture::default(),
        };

        let administrator = match (
            lookup("ADMIN_USERNAME"),
            lookup("ADMIN_PASSWORD"),
            lookup("ADMIN_EMAIL"),
        ) {
            (Some(username), Some(password), Some(email)) => Some(AdministratorSeed {
                username,
                password,
                email,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Invalid(
                    "ADMIN_USERNAME, ADMIN_PASSWORD and ADMIN_EMAIL must be set together".into(),
                ));
            }
        };

        Ok(Self {
            database_url,
            listen_addr,
            cookie_secret,
            cookie_name,
            ticket_ttl: Duration::from_secs(ticket_ttl_secs),
            recovery_window_minutes,
            culture,
            administrator,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn cookie_secret(&self) -> &str {
        &self.cookie_secret
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn ticket_ttl(&self) -> Duration {
        self.ticket_ttl
    }

    pub fn recovery_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.recovery_window_minutes)
    }

    pub fn culture(&self) -> Culture {
        self.culture
    }

    /// Account created on first start against an empty store.
    pub fn administrator(&self) -> Option<&AdministratorSeed> {
        self.administrator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = config(&[("AUTH_COOKIE_SECRET", SECRET)]).unwrap();

        assert_eq!(config.database_url(), "sqlite://mvc_template.db");
        assert_eq!(config.cookie_name(), "mvc_auth");
        assert_eq!(config.ticket_ttl(), Duration::from_secs(28_800));
        assert_eq!(config.recovery_window(), chrono::Duration::minutes(30));
        assert_eq!(config.culture(), Culture::EnUs);
        assert!(config.administrator().is_none());
    }

    #[test]
    fn secret_is_required_and_must_be_long_enough() {
        assert!(matches!(
            config(&[]),
            Err(ConfigError::Missing("AUTH_COOKIE_SECRET"))
        ));
        assert!(matches!(
            config(&[("AUTH_COOKIE_SECRET", "short")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn invalid_numbers_and_cultures_are_reported() {
        assert!(config(&[("AUTH_COOKIE_SECRET", SECRET), ("AUTH_TICKET_TTL_SECONDS", "soon")]).is_err());
        assert!(config(&[("AUTH_COOKIE_SECRET", SECRET), ("APP_CULTURE", "xx-XX")]).is_err());
        assert!(config(&[("AUTH_COOKIE_SECRET", SECRET), ("RECOVERY_TOKEN_TTL_MINUTES", "0")]).is_err());
    }

    #[test]
    fn administrator_seed_needs_all_three_values() {
        let partial = config(&[("AUTH_COOKIE_SECRET", SECRET), ("ADMIN_USERNAME", "admin")]);
        assert!(partial.is_err());

        let full = config(&[
            ("AUTH_COOKIE_SECRET", SECRET),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "Admin1!"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("APP_CULTURE", "lt-LT"),
        ])
        .unwrap();
        assert_eq!(full.administrator().map(|seed| seed.username.as_str()), Some("admin"));
        assert_eq!(full.culture(), Culture::LtLt);
    }
}
