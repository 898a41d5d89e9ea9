//! Client configuration. Defaults come from build-time environment variables,
//! runtime environment variables override them, and command-line flags are
//! applied last by the CLI. Configuration values are public; do not store
//! secrets here.

use crate::error::Error;
use std::{env, path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";

pub const ENV_API_BASE_URL: &str = "RAKMEDIA_API_BASE_URL";
pub const ENV_STORE_DIR: &str = "RAKMEDIA_STORE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "RAKMEDIA_TIMEOUT_SECS";

/// Client configuration shared by the session layer and the API client.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub store_dir: PathBuf,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Loads config from build-time defaults and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = option_env!("RAKMEDIA_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL);

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
            store_dir: default_store_dir(),
            request_timeout: None,
        };

        apply_overrides(&mut config, runtime_config());

        config
    }

    /// Parses the API base URL, forcing a trailing slash so endpoint paths
    /// join underneath it instead of replacing the last segment.
    ///
    /// # Errors
    /// Returns `Error::Config` if the URL does not parse or is not http(s).
    pub fn api_base(&self) -> Result<Url, Error> {
        let trimmed = self.api_base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let url = Url::parse(&normalized)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::Config(format!(
                "unsupported scheme {scheme} in API base URL"
            ))),
        }
    }
}

/// Optional overrides; empty values are dropped before they get here.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub store_dir: Option<String>,
    pub timeout_secs: Option<String>,
}

impl Overrides {
    #[must_use]
    pub fn new(
        api_base_url: Option<&str>,
        store_dir: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.and_then(normalize_value),
            store_dir: store_dir.and_then(normalize_value),
            timeout_secs: timeout_secs.and_then(normalize_value),
        }
    }
}

pub fn apply_overrides(config: &mut AppConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.store_dir {
        config.store_dir = PathBuf::from(value);
    }
    // Unparseable or zero timeouts keep the previous value.
    if let Some(secs) = overrides
        .timeout_secs
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
    {
        config.request_timeout = Some(Duration::from_secs(secs));
    }
}

fn runtime_config() -> Overrides {
    let read = |key: &str| env::var(key).ok();
    Overrides::new(
        read(ENV_API_BASE_URL).as_deref(),
        read(ENV_STORE_DIR).as_deref(),
        read(ENV_TIMEOUT_SECS).as_deref(),
    )
}

fn default_store_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(|| PathBuf::from(".rakmedia"), |home| {
            PathBuf::from(home).join(".rakmedia")
        })
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> AppConfig {
        AppConfig {
            api_base_url: "https://api.default/api/".to_string(),
            store_dir: PathBuf::from("/tmp/default"),
            request_timeout: None,
        }
    }

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.rakmedia.test "),
            Some("https://api.rakmedia.test".to_string())
        );
    }

    #[test]
    fn apply_overrides_ignores_empty_values() {
        let mut config = default_config();
        apply_overrides(&mut config, Overrides::new(Some(""), Some("  "), Some("")));

        assert_eq!(config.api_base_url, "https://api.default/api/");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/default"));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn apply_overrides_overwrites_when_present() {
        let mut config = default_config();
        apply_overrides(
            &mut config,
            Overrides::new(
                Some("https://api.override/api/"),
                Some("/tmp/override"),
                Some("15"),
            ),
        );

        assert_eq!(config.api_base_url, "https://api.override/api/");
        assert_eq!(config.store_dir, PathBuf::from("/tmp/override"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn apply_overrides_ignores_bad_timeouts() {
        let mut config = default_config();
        apply_overrides(&mut config, Overrides::new(None, None, Some("soon")));
        assert_eq!(config.request_timeout, None);
        apply_overrides(&mut config, Overrides::new(None, None, Some("0")));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn api_base_adds_trailing_slash() -> Result<(), Error> {
        let mut config = default_config();
        config.api_base_url = "http://127.0.0.1:8000/api".to_string();
        let url = config.api_base()?;
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/");
        assert_eq!(url.join("tasks/")?.as_str(), "http://127.0.0.1:8000/api/tasks/");
        Ok(())
    }

    #[test]
    fn api_base_rejects_unsupported_scheme() {
        let mut config = default_config();
        config.api_base_url = "ftp://example.com/api/".to_string();
        let err = config.api_base().err();
        assert!(matches!(
            err,
            Some(Error::Config(message)) if message.contains("unsupported scheme")
        ));
    }

    #[test]
    fn load_reads_runtime_environment() {
        temp_env::with_vars(
            [
                (ENV_API_BASE_URL, Some("https://env.rakmedia.test/api/")),
                (ENV_STORE_DIR, Some("/tmp/rakmedia-env")),
                (ENV_TIMEOUT_SECS, Some("30")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, "https://env.rakmedia.test/api/");
                assert_eq!(config.store_dir, PathBuf::from("/tmp/rakmedia-env"));
                assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
            },
        );
    }

    #[test]
    fn load_defaults_store_dir_under_home() {
        temp_env::with_vars(
            [
                (ENV_STORE_DIR, None::<&str>),
                (ENV_TIMEOUT_SECS, None),
                ("HOME", Some("/home/tester")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.store_dir, PathBuf::from("/home/tester/.rakmedia"));
                assert_eq!(config.request_timeout, None);
            },
        );
    }
}
