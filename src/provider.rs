// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider entry point.
//!
//! [`Provider`] resolves the configuration once, builds the shared WAPI client
//! and hands that client to every resource and data source controller it
//! creates. A configuration error is fatal: no controller can be created
//! without a client.
//!
//! # Example
//!
//! ```rust,no_run
//! use nios_provider::config::ProviderSettings;
//! use nios_provider::provider::Provider;
//!
//! # fn example() -> anyhow::Result<()> {
//! let provider = Provider::configure(ProviderSettings::default())?;
//! let resource = provider.record_a_resource();
//! # Ok(())
//! # }
//! ```

use crate::client::RecordClient;
use crate::config::{ProviderConfig, ProviderSettings};
use crate::constants::{DATA_SOURCE_DNS_A_RECORDS, PROVIDER_TYPE_NAME, RESOURCE_DNS_A_RECORD};
use crate::data_source::RecordAQuery;
use crate::resource::RecordAResource;
use crate::wapi::WapiClient;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Configured provider holding the shared client handle.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<dyn RecordClient>,
}

impl Provider {
    /// Configure from explicit settings, falling back to the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or invalid, or if the
    /// WAPI client cannot be built.
    pub fn configure(settings: ProviderSettings) -> Result<Self> {
        Self::configure_layers([settings, ProviderSettings::from_env()])
    }

    /// Configure from explicit settings, then a YAML file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or as [`configure`](Self::configure).
    pub fn configure_with_file(settings: ProviderSettings, path: &Path) -> Result<Self> {
        let file = ProviderSettings::from_file(path)?;
        Self::configure_layers([settings, file, ProviderSettings::from_env()])
    }

    /// Configure from settings layers, highest precedence first.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn configure_layers(layers: impl IntoIterator<Item = ProviderSettings>) -> Result<Self> {
        let merged = layers
            .into_iter()
            .fold(ProviderSettings::default(), ProviderSettings::or);
        let config = merged
            .resolve()
            .context("Failed to configure the NIOS provider")?;
        Self::from_config(&config)
    }

    /// Build the provider for a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the WAPI client cannot be built.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let client = WapiClient::new(config)?;
        info!(
            host_url = %config.host_url,
            wapi_version = %config.wapi_version,
            "Configured NIOS provider"
        );
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build the provider around an existing client.
    #[must_use]
    pub fn with_client(client: Arc<dyn RecordClient>) -> Self {
        Self { client }
    }

    /// Provider type name.
    #[must_use]
    pub fn type_name() -> &'static str {
        PROVIDER_TYPE_NAME
    }

    /// Full type name of the A record resource, e.g. `nios_dns_a_record`.
    #[must_use]
    pub fn record_a_resource_type() -> String {
        format!("{PROVIDER_TYPE_NAME}_{RESOURCE_DNS_A_RECORD}")
    }

    /// Full type name of the A record data source, e.g. `nios_dns_a_records`.
    #[must_use]
    pub fn record_a_data_source_type() -> String {
        format!("{PROVIDER_TYPE_NAME}_{DATA_SOURCE_DNS_A_RECORDS}")
    }

    /// Controller for the A record resource, sharing the provider's client.
    #[must_use]
    pub fn record_a_resource(&self) -> RecordAResource {
        RecordAResource::new(Arc::clone(&self.client))
    }

    /// Controller for the A record data source, sharing the provider's client.
    #[must_use]
    pub fn record_a_data_source(&self) -> RecordAQuery {
        RecordAQuery::new(Arc::clone(&self.client))
    }
}
