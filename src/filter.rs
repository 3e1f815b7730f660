// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Search filters for collection queries.
//!
//! A filter is written as a flat map of string keys to string values, the same
//! shape WAPI takes as query parameters. Keys starting with `*` filter on an
//! extensible attribute; every other key filters on a plain field:
//!
//! | Body key | Meaning |
//! |----------|---------|
//! | `name` | field `name` equals the value |
//! | `*Site` | extensible attribute `Site` equals the value |
//!
//! # Example
//!
//! ```rust
//! use nios_provider::filter::RecordFilter;
//! use std::collections::BTreeMap;
//!
//! let body = BTreeMap::from([
//!     ("name".to_string(), "host.example.com".to_string()),
//!     ("*Site".to_string(), "lab".to_string()),
//! ]);
//! let filter = RecordFilter::from_body(&body).unwrap();
//! assert_eq!(filter.fields["name"], "host.example.com");
//! assert_eq!(filter.extattrs["Site"], "lab");
//! ```

use crate::constants::EXTATTR_FILTER_PREFIX;
use crate::diagnostics::{Diagnostic, Diagnostics};
use std::collections::BTreeMap;

/// Exact-match filter over plain fields and extensible attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Wire field name to required value
    pub fields: BTreeMap<String, String>,
    /// Extensible attribute name (without prefix) to required value
    pub extattrs: BTreeMap<String, String>,
}

impl RecordFilter {
    /// A filter that matches every object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: require a plain field to equal `value`.
    #[must_use]
    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Builder: require an extensible attribute to equal `value`.
    #[must_use]
    pub fn extattr(mut self, name: &str, value: &str) -> Self {
        self.extattrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Parse a flat body map, splitting extensible attribute keys off by prefix.
    ///
    /// # Errors
    ///
    /// Returns diagnostics for empty keys or a bare prefix with no attribute name.
    pub fn from_body(body: &BTreeMap<String, String>) -> Result<Self, Diagnostics> {
        let mut filter = Self::new();
        let mut diagnostics = Diagnostics::new();

        for (key, value) in body {
            match key.strip_prefix(EXTATTR_FILTER_PREFIX) {
                Some("") => diagnostics.push(Diagnostic::attribute_error(
                    "body",
                    "Invalid Filter",
                    format!("Filter key \"{key}\" names no extensible attribute."),
                )),
                Some(name) => {
                    filter.extattrs.insert(name.to_string(), value.clone());
                }
                None if key.is_empty() => diagnostics.push(Diagnostic::attribute_error(
                    "body",
                    "Invalid Filter",
                    "Filter keys must not be empty.",
                )),
                None => {
                    filter.fields.insert(key.clone(), value.clone());
                }
            }
        }

        if diagnostics.has_error() {
            Err(diagnostics)
        } else {
            Ok(filter)
        }
    }

    /// Flatten back into the body map form.
    #[must_use]
    pub fn to_body(&self) -> BTreeMap<String, String> {
        self.query_pairs().into_iter().collect()
    }

    /// Query parameters for the WAPI search, fields first, then extensible attributes.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()));
        let extattrs = self
            .extattrs
            .iter()
            .map(|(name, value)| (format!("{EXTATTR_FILTER_PREFIX}{name}"), value.clone()));
        fields.chain(extattrs).collect()
    }

    /// Returns `true` if the filter matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.extattrs.is_empty()
    }
}
