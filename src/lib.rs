// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # nios-provider - Declarative controller for Infoblox NIOS DNS A records
//!
//! This library reconciles Infoblox NIOS DNS A records (`record:a`) against a
//! user-declared configuration through the NIOS WAPI REST API.
//!
//! ## Overview
//!
//! - A schema-as-data attribute table with optional, computed, default,
//!   immutable and write-only semantics
//! - Bidirectional conversion between partially-unknown typed trees and WAPI
//!   wire objects
//! - A single-resource controller (create, read, update, delete, import)
//! - A collection query controller with field and extensible attribute filters
//!
//! ## Modules
//!
//! - [`value`] - Tri-state values and typed value trees
//! - [`schema`] - Attribute descriptors and validation
//! - [`convert`] - Expand (tree to wire) and Flatten (wire to tree)
//! - [`resource`] - A record lifecycle controller
//! - [`data_source`] - A record collection query controller
//! - [`client`] - Remote client contract, implemented by [`wapi`] and [`memory`]
//! - [`provider`] - Configuration and controller factory
//!
//! ## Example
//!
//! ```rust
//! use nios_provider::memory::InMemoryRecordStore;
//! use nios_provider::provider::Provider;
//! use nios_provider::resource::ReadOutcome;
//! use nios_provider::value::ValueTree;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), nios_provider::errors::ControllerError> {
//! let provider = Provider::with_client(Arc::new(InMemoryRecordStore::new()));
//! let resource = provider.record_a_resource();
//!
//! let config = ValueTree::new()
//!     .with("name", "host.example.com")
//!     .with("ipv4addr", "10.0.0.20");
//! let state = resource.create(&config).await?;
//!
//! let identity = state.get_str("id").unwrap_or_default();
//! assert!(matches!(resource.read(identity).await?, ReadOutcome::Present(_)));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod convert;
pub mod data_source;
pub mod diagnostics;
pub mod errors;
pub mod filter;
pub mod identity;
pub mod logging;
pub mod memory;
pub mod metrics;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod value;
pub mod wapi;
pub mod wire;

#[cfg(test)]
mod diagnostics_tests;
#[cfg(test)]
mod resource_tests;
#[cfg(test)]
mod schema_tests;
