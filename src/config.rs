// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration.
//!
//! The provider needs two settings, the grid master URL (`nios_host_url`) and
//! the WAPI credential (`nios_auth`, as `username:password`). Each may come
//! from, highest precedence first:
//!
//! 1. explicit provider settings
//! 2. a YAML configuration file
//! 3. the `NIOS_HOST_URL` / `NIOS_AUTH` environment variables
//!
//! A setting that is missing from all sources is a fatal [`ConfigError`].
//!
//! # Example
//!
//! ```rust
//! use nios_provider::config::ProviderSettings;
//!
//! let settings = ProviderSettings::from_yaml_str(
//!     "nios_host_url: https://gm.example.com\nnios_auth: admin:infoblox\n",
//! )
//! .unwrap();
//! let config = settings.resolve().unwrap();
//! assert_eq!(config.host_url, "https://gm.example.com");
//! ```

use crate::constants::{
    DEFAULT_CLIENT_NAME, DEFAULT_WAPI_VERSION, ENV_NIOS_AUTH, ENV_NIOS_HOST_URL,
    SETTING_NIOS_AUTH, SETTING_NIOS_HOST_URL,
};
use crate::errors::ConfigError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Raw, possibly partial provider settings from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Grid master URL, e.g. `https://gm.example.com`
    pub nios_host_url: Option<String>,
    /// WAPI credential as `username:password`
    pub nios_auth: Option<String>,
    /// WAPI version path segment (defaults to `v2.13.6`)
    pub wapi_version: Option<String>,
    /// Client name sent as `User-Agent`
    pub client_name: Option<String>,
}

impl ProviderSettings {
    /// Parse settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or has unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse provider configuration")
    }

    /// Read settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider configuration {}", path.display()))?;
        debug!(path = %path.display(), "Loaded provider configuration file");
        Self::from_yaml_str(&contents)
    }

    /// Settings taken from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settings taken from an environment-like lookup function.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            nios_host_url: lookup(ENV_NIOS_HOST_URL),
            nios_auth: lookup(ENV_NIOS_AUTH),
            wapi_version: None,
            client_name: None,
        }
    }

    /// Fill settings missing here from `fallback`.
    ///
    /// Empty strings count as missing.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
            primary.filter(|s| !s.is_empty()).or(fallback)
        }
        Self {
            nios_host_url: pick(self.nios_host_url, fallback.nios_host_url),
            nios_auth: pick(self.nios_auth, fallback.nios_auth),
            wapi_version: pick(self.wapi_version, fallback.wapi_version),
            client_name: pick(self.client_name, fallback.client_name),
        }
    }

    /// Turn the merged settings into a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if the URL or credential is
    /// missing, [`ConfigError::InvalidSetting`] if either is unusable.
    pub fn resolve(self) -> Result<ProviderConfig, ConfigError> {
        let host_url = self
            .nios_host_url
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSetting {
                setting: SETTING_NIOS_HOST_URL,
                env_var: ENV_NIOS_HOST_URL,
            })?;
        let auth = self
            .nios_auth
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSetting {
                setting: SETTING_NIOS_AUTH,
                env_var: ENV_NIOS_AUTH,
            })?;

        if !(host_url.starts_with("https://") || host_url.starts_with("http://")) {
            return Err(ConfigError::InvalidSetting {
                setting: SETTING_NIOS_HOST_URL,
                reason: format!("'{host_url}' is not an http(s) URL"),
            });
        }
        if !auth.contains(':') {
            return Err(ConfigError::InvalidSetting {
                setting: SETTING_NIOS_AUTH,
                reason: "expected 'username:password'".to_string(),
            });
        }

        Ok(ProviderConfig {
            host_url: host_url.trim_end_matches('/').to_string(),
            auth,
            wapi_version: self
                .wapi_version
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_WAPI_VERSION.to_string()),
            client_name: self
                .client_name
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
        })
    }
}

/// Complete provider configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Grid master URL without trailing slash
    pub host_url: String,
    /// WAPI credential as `username:password`
    pub auth: String,
    pub wapi_version: String,
    pub client_name: String,
}

// The credential must never end up in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host_url", &self.host_url)
            .field("auth", &"<redacted>")
            .field("wapi_version", &self.wapi_version)
            .field("client_name", &self.client_name)
            .finish()
    }
}
