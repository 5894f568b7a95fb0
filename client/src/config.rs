//! Client settings loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_TOKEN_DIR: &str = ".clinica";

/// Configuration problems detected after loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CLINICA_BASE_URL is not set")]
    MissingBaseUrl,
    #[error("invalid API base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("CLINICA_REQUEST_TIMEOUT_SECS must be at least 1")]
    ZeroTimeout,
}

/// Settings for the `clinica` client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINICA")]
pub struct ClientSettings {
    /// Root of the clinic API, for example `https://clinica.example.com/`.
    pub base_url: Option<String>,
    /// Directory holding the persisted session.
    pub token_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Emit logs as JSON lines.
    #[ortho_config(default = false)]
    pub json_logs: bool,
}

impl ClientSettings {
    /// Parse the configured base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            source,
        })
    }

    /// Return the configured token directory, falling back to `.clinica`.
    pub fn token_dir(&self) -> PathBuf {
        self.token_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_DIR))
    }

    /// Per-request timeout for the API client. Zero is rejected.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("clinica")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("CLINICA_BASE_URL", None::<String>),
            ("CLINICA_TOKEN_DIR", None::<String>),
            ("CLINICA_REQUEST_TIMEOUT_SECS", None::<String>),
            ("CLINICA_JSON_LOGS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(matches!(settings.base_url(), Err(ConfigError::MissingBaseUrl)));
        assert_eq!(settings.token_dir(), PathBuf::from(".clinica"));
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(30)
        );
        assert!(!settings.json_logs);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLINICA_BASE_URL", Some("https://clinica.example.com/".to_owned())),
            ("CLINICA_TOKEN_DIR", Some("/tmp/clinica-tokens".to_owned())),
            ("CLINICA_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("CLINICA_JSON_LOGS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("url").as_str(),
            "https://clinica.example.com/"
        );
        assert_eq!(settings.token_dir(), PathBuf::from("/tmp/clinica-tokens"));
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(5)
        );
        assert!(settings.json_logs);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_base_url_counts_as_missing(#[case] raw: &str) {
        let settings = ClientSettings {
            base_url: Some(raw.to_owned()),
            token_dir: None,
            request_timeout_secs: 30,
            json_logs: false,
        };
        assert!(matches!(settings.base_url(), Err(ConfigError::MissingBaseUrl)));
    }

    #[rstest]
    fn malformed_base_url_is_reported() {
        let settings = ClientSettings {
            base_url: Some("clinica sin esquema".to_owned()),
            token_dir: None,
            request_timeout_secs: 30,
            json_logs: false,
        };
        assert!(matches!(
            settings.base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let settings = ClientSettings {
            base_url: Some("https://clinica.example.com/".to_owned()),
            token_dir: None,
            request_timeout_secs: 0,
            json_logs: false,
        };
        assert!(matches!(
            settings.request_timeout(),
            Err(ConfigError::ZeroTimeout)
        ));
    }
}
