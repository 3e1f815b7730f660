// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Collection query controller for DNS A records.
//!
//! [`RecordAQuery`] backs the `dns_a_records` data source: it runs one WAPI
//! search and flattens every matching record with the record schema turned
//! fully computed. Results keep the order NIOS returns them in; a search that
//! matches nothing, or answers 404, yields an empty list.
//!
//! # Example
//!
//! ```rust
//! use nios_provider::data_source::RecordAQuery;
//! use nios_provider::filter::RecordFilter;
//! use nios_provider::memory::InMemoryRecordStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), nios_provider::errors::ControllerError> {
//! let query = RecordAQuery::new(Arc::new(InMemoryRecordStore::new()));
//! let records = query.read(&RecordFilter::new().extattr("Site", "lab")).await?;
//! assert!(records.is_empty());
//! # Ok(())
//! # }
//! ```

use crate::client::{RecordClient, RequestOptions};
use crate::convert::flatten_list;
use crate::diagnostics::Diagnostic;
use crate::errors::{ControllerError, Operation};
use crate::filter::RecordFilter;
use crate::resource::{conversion, observe, reject_invalid, remote};
use crate::schema::Schema;
use crate::value::{AttrValue, Value, ValueTree};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Controller for the `dns_a_records` data source.
#[derive(Debug, Clone)]
pub struct RecordAQuery {
    client: Arc<dyn RecordClient>,
    schema: Schema,
    result_schema: Schema,
    options: RequestOptions,
}

impl RecordAQuery {
    /// Create a controller that searches NIOS through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        let result_schema = Schema::record_a().as_data_source();
        let options = RequestOptions::for_schema(&result_schema);
        Self {
            client,
            schema: Schema::record_a_query(),
            result_schema,
            options,
        }
    }

    /// Schema of the data source itself (`body` and `result`).
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Schema of each element of `result`.
    #[must_use]
    pub fn result_schema(&self) -> &Schema {
        &self.result_schema
    }

    /// Search records matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a remote error for any failure other than a 404, or a
    /// conversion error if a returned record cannot be flattened.
    pub async fn read(&self, filter: &RecordFilter) -> Result<Vec<ValueTree>, ControllerError> {
        let started = Instant::now();
        let result = self.search(filter).await;
        let absent = matches!(&result, Ok(records) if records.is_empty());
        observe(Operation::List, started, &result, absent);
        result
    }

    async fn search(&self, filter: &RecordFilter) -> Result<Vec<ValueTree>, ControllerError> {
        let operation = Operation::List;
        debug!(filter = ?filter.to_body(), "Searching A records");

        let objects = match self.client.list(filter, &self.options).await {
            Ok(objects) => objects,
            Err(e) if e.is_not_found() => {
                debug!("A record search endpoint answered 404; no records");
                Vec::new()
            }
            Err(e) => return Err(remote(operation)(e)),
        };

        let records = flatten_list(&self.result_schema, &objects).map_err(conversion(operation))?;
        info!(count = records.len(), "Listed A records");
        Ok(records)
    }

    /// Read the data source from its configuration tree.
    ///
    /// `config` carries an optional `body` filter map; the returned tree
    /// carries the same `body` and the matching records under `result`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `config` or its filter keys are invalid,
    /// otherwise as [`read`](Self::read).
    pub async fn read_tree(&self, config: &ValueTree) -> Result<ValueTree, ControllerError> {
        let mut diagnostics = self.schema.validate_planned(config);
        if config.get("body").is_unknown() {
            diagnostics.push(Diagnostic::attribute_error(
                "body",
                "Unknown Value for Filter",
                "The \"body\" filter must be known before the records can be read.",
            ));
        }
        reject_invalid(Operation::List, diagnostics)?;

        let filter = match config.get_map("body") {
            Some(body) => RecordFilter::from_body(body).map_err(|diagnostics| {
                ControllerError::Validation {
                    operation: Operation::List,
                    diagnostics,
                }
            })?,
            None => RecordFilter::new(),
        };

        let records = self.read(&filter).await?;
        let mut state = config.clone();
        state.set("result", Value::Known(AttrValue::List(records)));
        Ok(state)
    }
}
