//! Client configuration.
//!
//! Read from `ANYVIEW_*` environment variables, falling back to the shared
//! defaults in [`anyview_core::defaults`].
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ANYVIEW_API_URL` | `http://localhost:31009/v1` |
//! | `ANYVIEW_API_VERSION` | `2025-04-22` |
//! | `ANYVIEW_APP_KEY` | unset (no `Authorization` header) |
//! | `ANYVIEW_PAGE_LIMIT` | 50 |
//! | `ANYVIEW_TIMEOUT_SECS` | 10 |
//! | `ANYVIEW_PINNED_PATH` | `pinned.json` |
//! | `ANYVIEW_ICON_WIDTH` | 64 |
//! | `ANYVIEW_MAX_PINNED` | 5 (`0` for unbounded) |

use std::path::PathBuf;

use anyview_core::defaults;
use anyview_core::{Error, Result};

pub const ENV_API_URL: &str = "ANYVIEW_API_URL";
pub const ENV_API_VERSION: &str = "ANYVIEW_API_VERSION";
pub const ENV_APP_KEY: &str = "ANYVIEW_APP_KEY";
pub const ENV_PAGE_LIMIT: &str = "ANYVIEW_PAGE_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "ANYVIEW_TIMEOUT_SECS";
pub const ENV_PINNED_PATH: &str = "ANYVIEW_PINNED_PATH";
pub const ENV_ICON_WIDTH: &str = "ANYVIEW_ICON_WIDTH";
pub const ENV_MAX_PINNED: &str = "ANYVIEW_MAX_PINNED";

const DEFAULT_PINNED_PATH: &str = "pinned.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    /// Bearer token issued by the desktop app's pairing flow.
    pub app_key: Option<String>,
    pub page_limit: usize,
    pub timeout_secs: u64,
    pub pinned_path: PathBuf,
    pub icon_width: u32,
    /// `None` means pins are unbounded.
    pub max_pinned: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_URL.to_string(),
            api_version: defaults::API_VERSION.to_string(),
            app_key: None,
            page_limit: defaults::PAGE_LIMIT,
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            pinned_path: PathBuf::from(DEFAULT_PINNED_PATH),
            icon_width: defaults::ICON_WIDTH,
            max_pinned: Some(defaults::MAX_PINNED_OBJECTS),
        }
    }
}

impl ClientConfig {
    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable numbers fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            base_url: lookup(ENV_API_URL)
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(d.base_url),
            api_version: lookup(ENV_API_VERSION).unwrap_or(d.api_version),
            app_key: lookup(ENV_APP_KEY).filter(|k| !k.is_empty()),
            page_limit: number(ENV_PAGE_LIMIT)
                .map(|n| n as usize)
                .unwrap_or(d.page_limit),
            timeout_secs: number(ENV_TIMEOUT_SECS).unwrap_or(d.timeout_secs),
            pinned_path: lookup(ENV_PINNED_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.pinned_path),
            icon_width: number(ENV_ICON_WIDTH)
                .map(|n| n as u32)
                .unwrap_or(d.icon_width),
            max_pinned: match number(ENV_MAX_PINNED) {
                Some(0) => None,
                Some(n) => Some(n as usize),
                None => d.max_pinned,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.api_version.is_empty() {
            return Err(Error::Config("api_version cannot be empty".to_string()));
        }
        if self.page_limit == 0 || self.page_limit > defaults::PAGE_LIMIT_MAX {
            return Err(Error::Config(format!(
                "page_limit must be between 1 and {}, got: {}",
                defaults::PAGE_LIMIT_MAX,
                self.page_limit
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        if self.icon_width == 0 {
            return Err(Error::Config("icon_width must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:31009/v1");
        assert_eq!(config.max_pinned, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://127.0.0.1:9999/v1/"),
            (ENV_APP_KEY, "secret"),
            (ENV_PAGE_LIMIT, "100"),
            (ENV_MAX_PINNED, "0"),
            (ENV_ICON_WIDTH, "not a number"),
        ]));
        assert_eq!(config.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(config.app_key.as_deref(), Some("secret"));
        assert_eq!(config.page_limit, 100);
        assert_eq!(config.max_pinned, None);
        assert_eq!(config.icon_width, 64);
    }

    #[test]
    fn test_empty_app_key_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_APP_KEY, "")]));
        assert!(config.app_key.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            base_url: "localhost:31009".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = ClientConfig {
            page_limit: 5000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            page_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
