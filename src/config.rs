use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_AVATAR_URL, DEFAULT_MEDIA_BASE_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Backend REST API
    pub backend_url: String,
    pub request_timeout: Duration,
    pub lookup_concurrency: usize,

    // Identity provider
    pub auth_api_url: String,
    pub auth_api_key: String,
    pub profile_db_url: String,

    // Media
    pub media_base_url: String,
    pub default_avatar_url: String,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub cookie_secure: bool,
    /// Stylesheet directory; `None` falls back to `./static`
    pub static_dir: Option<PathBuf>,
    pub session_cleanup_interval: Duration,

    // Listing pages
    pub refresh_interval: Duration,
    pub table_page_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Backend REST API
            backend_url: required_env("BACKEND_URL")?,
            request_timeout: Duration::from_secs(parse_env_int("REQUEST_TIMEOUT_SECS", 30)?),
            lookup_concurrency: parse_env_int("LOOKUP_CONCURRENCY", 8)?,

            // Identity provider
            auth_api_url: env_or_default(
                "AUTH_API_URL",
                "https://identitytoolkit.googleapis.com/v1",
            ),
            auth_api_key: required_env("AUTH_API_KEY")?,
            profile_db_url: required_env("PROFILE_DB_URL")?,

            // Media
            media_base_url: env_or_default("MEDIA_BASE_URL", DEFAULT_MEDIA_BASE_URL),
            default_avatar_url: env_or_default("DEFAULT_AVATAR_URL", DEFAULT_AVATAR_URL),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_int("WEB_PORT", 3000)?,
            cookie_secure: parse_env_bool("COOKIE_SECURE", false)?,
            static_dir: std::env::var_os("STATIC_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            session_cleanup_interval: Duration::from_secs(parse_env_int(
                "SESSION_CLEANUP_SECS",
                300,
            )?),

            // Listing pages
            refresh_interval: Duration::from_secs(parse_env_int("REFRESH_INTERVAL_SECS", 30)?),
            table_page_size: parse_env_int("TABLE_PAGE_SIZE", 10)?,
        })
    }

    /// Configuration pointing at local placeholder services.
    ///
    /// Integration tests override `backend_url`, `auth_api_url` and
    /// `profile_db_url` with their mock server addresses.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            backend_url: "http://127.0.0.1:2002/api".to_string(),
            request_timeout: Duration::from_secs(5),
            lookup_concurrency: 4,
            auth_api_url: "http://127.0.0.1:9099/v1".to_string(),
            auth_api_key: "test-api-key".to_string(),
            profile_db_url: "http://127.0.0.1:9000".to_string(),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            cookie_secure: false,
            static_dir: None,
            session_cleanup_interval: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(30),
            table_page_size: 10,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("BACKEND_URL", &self.backend_url),
            ("AUTH_API_URL", &self.auth_api_url),
            ("PROFILE_DB_URL", &self.profile_db_url),
        ] {
            validate_http_url(name, value)?;
        }
        if self.auth_api_key.trim().is_empty() {
            return Err(invalid("AUTH_API_KEY", "cannot be empty"));
        }
        for (name, is_zero) in [
            ("TABLE_PAGE_SIZE", self.table_page_size == 0),
            ("LOOKUP_CONCURRENCY", self.lookup_concurrency == 0),
            ("REFRESH_INTERVAL_SECS", self.refresh_interval.is_zero()),
            ("REQUEST_TIMEOUT_SECS", self.request_timeout.is_zero()),
            ("SESSION_CLEANUP_SECS", self.session_cleanup_interval.is_zero()),
        ] {
            if is_zero {
                return Err(invalid(name, "must be at least 1"));
            }
        }
        Ok(())
    }
}

fn invalid(name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.into(),
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(name, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(
            name,
            format!("expected an http(s) URL, got scheme '{other}'"),
        )),
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Unset and empty both mean "use the default".
fn parse_env_int<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw.trim().parse().map_err(|source| ConfigError::ParseInt {
            name: name.to_string(),
            source,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required() {
        std::env::set_var("BACKEND_URL", "http://localhost:2002/api");
        std::env::set_var("AUTH_API_KEY", "key");
        std::env::set_var("PROFILE_DB_URL", "https://filxconnect.firebaseio.com");
    }

    fn clear_all() {
        for name in [
            "BACKEND_URL",
            "AUTH_API_KEY",
            "PROFILE_DB_URL",
            "TABLE_PAGE_SIZE",
            "REFRESH_INTERVAL_SECS",
            "COOKIE_SECURE",
            "STATIC_DIR",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("NONEXISTENT_VAR", false).unwrap());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_all();
        set_required();

        let config = Config::from_env().unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.table_page_size, 10);
        assert_eq!(config.lookup_concurrency, 8);
        assert!(!config.cookie_secure);
        assert_eq!(config.static_dir, None);
        assert_eq!(config.session_cleanup_interval, Duration::from_secs(300));
        assert!(config.validate().is_ok());

        clear_all();
    }

    #[test]
    #[serial]
    fn test_missing_backend_url() {
        clear_all();
        std::env::set_var("AUTH_API_KEY", "key");
        std::env::set_var("PROFILE_DB_URL", "https://filxconnect.firebaseio.com");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "BACKEND_URL"));

        clear_all();
    }

    #[test]
    #[serial]
    fn test_static_dir_from_env() {
        clear_all();
        set_required();
        std::env::set_var("STATIC_DIR", "/srv/admin/static");

        let config = Config::from_env().unwrap();
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/admin/static")));

        clear_all();
    }

    #[test]
    #[serial]
    fn test_invalid_page_size() {
        clear_all();
        set_required();
        std::env::set_var("TABLE_PAGE_SIZE", "ten");

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::ParseInt { .. })
        ));

        clear_all();
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::for_testing();
        config.table_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_backend() {
        let mut config = Config::for_testing();
        config.backend_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_testing_config_is_valid() {
        assert!(Config::for_testing().validate().is_ok());
    }
}
