// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Single-resource controller for DNS A records.
//!
//! [`RecordAResource`] drives the lifecycle of one `record:a` object:
//!
//! 1. **Create** - validate, resolve defaults, expand, POST, flatten the response
//! 2. **Read** - GET by identity; a 404 means the record was deleted out of band
//! 3. **Update** - validate, resolve defaults, expand without immutable fields, PUT
//! 4. **Delete** - DELETE by identity; a 404 counts as success
//! 5. **Import** - adopt an existing record by identity
//!
//! Every operation issues at most one remote call. The returned tree is what
//! the orchestrator persists; on error nothing is returned and the prior state
//! stands.
//!
//! # Example
//!
//! ```rust
//! use nios_provider::memory::InMemoryRecordStore;
//! use nios_provider::resource::RecordAResource;
//! use nios_provider::value::ValueTree;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), nios_provider::errors::ControllerError> {
//! let resource = RecordAResource::new(Arc::new(InMemoryRecordStore::new()));
//! let config = ValueTree::new()
//!     .with("name", "host.example.com")
//!     .with("ipv4addr", "10.0.0.20");
//!
//! let state = resource.create(&config).await?;
//! assert_eq!(state.get_str("view"), Some("default"));
//! # Ok(())
//! # }
//! ```

use crate::client::{RecordClient, RequestOptions};
use crate::convert::{expand, flatten_object};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{ClientError, ControllerError, ConversionError, Operation};
use crate::identity::extract_identity;
use crate::metrics::{record_operation, OperationOutcome};
use crate::schema::Schema;
use crate::value::{AttrValue, Value, ValueTree};
use crate::wire::WireObject;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of reading a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The record exists; its current state
    Present(ValueTree),
    /// The record no longer exists and must be dropped from state
    Absent,
}

impl ReadOutcome {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, ReadOutcome::Absent)
    }

    /// The state, or `None` when absent.
    #[must_use]
    pub fn into_tree(self) -> Option<ValueTree> {
        match self {
            ReadOutcome::Present(tree) => Some(tree),
            ReadOutcome::Absent => None,
        }
    }
}

/// Controller for the `dns_a_record` resource.
#[derive(Debug, Clone)]
pub struct RecordAResource {
    client: Arc<dyn RecordClient>,
    schema: Schema,
    options: RequestOptions,
}

impl RecordAResource {
    /// Create a controller that talks to NIOS through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        let schema = Schema::record_a();
        let options = RequestOptions::for_schema(&schema);
        Self {
            client,
            schema,
            options,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate `config` and resolve its planned values.
    ///
    /// This is what the orchestrator shows as the plan: defaults filled in,
    /// unknown values left unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Validation`] tagged with `operation` if the
    /// configuration is rejected.
    pub fn plan(
        &self,
        operation: Operation,
        config: &ValueTree,
    ) -> Result<ValueTree, ControllerError> {
        reject_invalid(operation, self.schema.validate(config))?;
        Ok(self.schema.apply_defaults(config))
    }

    /// Validate a planned tree, or a previously returned state, and resolve
    /// its defaults before it is applied.
    fn resolve(
        &self,
        operation: Operation,
        tree: &ValueTree,
    ) -> Result<ValueTree, ControllerError> {
        reject_invalid(operation, self.schema.validate_planned(tree))?;
        Ok(self.schema.apply_defaults(tree))
    }

    /// Create the record described by `config` and return its state.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call, a remote error if
    /// NIOS rejects the request, or a conversion error if the response has no
    /// usable reference.
    pub async fn create(&self, config: &ValueTree) -> Result<ValueTree, ControllerError> {
        let started = Instant::now();
        let result = self.create_record(config).await;
        observe(Operation::Create, started, &result, false);
        result
    }

    async fn create_record(&self, config: &ValueTree) -> Result<ValueTree, ControllerError> {
        let operation = Operation::Create;
        let planned = self.resolve(operation, config)?;
        let request = expand(&self.schema, &planned, true).map_err(conversion(operation))?;

        debug!(name = ?planned.get_str("name"), "Creating A record");
        let response = self
            .client
            .create(&request, &self.options)
            .await
            .map_err(remote(operation))?;

        let state = self.state_from(operation, &response, &planned)?;
        info!(
            identity = ?state.get_str("id"),
            name = ?state.get_str("name"),
            "Created A record"
        );
        Ok(state)
    }

    /// Read the current state of the record `identity`.
    ///
    /// # Errors
    ///
    /// Returns a remote error for any failure other than a 404.
    pub async fn read(&self, identity: &str) -> Result<ReadOutcome, ControllerError> {
        let started = Instant::now();
        let result = self.read_record(identity, None).await;
        let absent = matches!(result, Ok(ReadOutcome::Absent));
        observe(Operation::Read, started, &result, absent);
        result
    }

    /// Re-read a record from its prior state.
    ///
    /// Write-only values are never returned by NIOS, so they are kept from
    /// `prior`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `prior` has no identity, otherwise as
    /// [`read`](Self::read).
    pub async fn refresh(&self, prior: &ValueTree) -> Result<ReadOutcome, ControllerError> {
        let started = Instant::now();
        let result = match prior.get_str("id") {
            Some(identity) => self.read_record(identity, Some(prior)).await,
            None => Err(missing_identity(Operation::Read)),
        };
        let absent = matches!(result, Ok(ReadOutcome::Absent));
        observe(Operation::Read, started, &result, absent);
        result
    }

    async fn read_record(
        &self,
        identity: &str,
        prior: Option<&ValueTree>,
    ) -> Result<ReadOutcome, ControllerError> {
        let operation = Operation::Read;
        let response = match self.client.get(identity, &self.options).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                warn!(identity = %identity, "A record no longer exists; removing from state");
                return Ok(ReadOutcome::Absent);
            }
            Err(e) => return Err(remote(operation)(e)),
        };

        let mut state = flatten_object(&self.schema, &response).map_err(conversion(operation))?;
        if let Some(prior) = prior {
            self.carry_write_only(&mut state, prior);
        }
        debug!(identity = %identity, "Read A record");
        Ok(ReadOutcome::Present(state))
    }

    /// Apply `config` to the existing record `identity` and return its state.
    ///
    /// Immutable attributes are not sent; there is no concurrency token, so
    /// the last writer wins.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call, or a remote error,
    /// including when the record no longer exists.
    pub async fn update(
        &self,
        identity: &str,
        config: &ValueTree,
    ) -> Result<ValueTree, ControllerError> {
        let started = Instant::now();
        let result = self.update_record(identity, config).await;
        observe(Operation::Update, started, &result, false);
        result
    }

    async fn update_record(
        &self,
        identity: &str,
        config: &ValueTree,
    ) -> Result<ValueTree, ControllerError> {
        let operation = Operation::Update;
        let planned = self.resolve(operation, config)?;
        let request = expand(&self.schema, &planned, false).map_err(conversion(operation))?;

        debug!(identity = %identity, fields = request.fields.len(), "Updating A record");
        let response = self
            .client
            .replace(identity, &request, &self.options)
            .await
            .map_err(remote(operation))?;

        let state = self.state_from(operation, &response, &planned)?;
        info!(identity = %identity, "Updated A record");
        Ok(state)
    }

    /// Delete the record `identity`.
    ///
    /// Deleting a record that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns a remote error for any failure other than a 404.
    pub async fn delete(&self, identity: &str) -> Result<(), ControllerError> {
        let started = Instant::now();
        let result = match self.client.delete(identity).await {
            Ok(()) => {
                info!(identity = %identity, "Deleted A record");
                Ok(false)
            }
            Err(e) if e.is_not_found() => {
                debug!(identity = %identity, "A record already deleted");
                Ok(true)
            }
            Err(e) => Err(remote(Operation::Delete)(e)),
        };
        let absent = matches!(result, Ok(true));
        observe(Operation::Delete, started, &result, absent);
        result.map(|_| ())
    }

    /// Adopt an existing record by identity.
    ///
    /// The returned tree has only `id` known; the next read fills in the rest.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `external_id` is empty.
    pub fn import(&self, external_id: &str) -> Result<ValueTree, ControllerError> {
        let started = Instant::now();
        let result = if external_id.trim().is_empty() {
            Err(missing_identity(Operation::Import))
        } else {
            info!(identity = %external_id, "Importing A record");
            Ok(ValueTree::new().with("id", external_id))
        };
        observe(Operation::Import, started, &result, false);
        result
    }

    fn state_from(
        &self,
        operation: Operation,
        response: &WireObject,
        planned: &ValueTree,
    ) -> Result<ValueTree, ControllerError> {
        let reference = response
            .reference
            .as_deref()
            .ok_or(ConversionError::MissingReference)
            .map_err(conversion(operation))?;
        if extract_identity(reference).is_none() {
            return Err(conversion(operation)(ConversionError::MalformedReference {
                reference: reference.to_string(),
            }));
        }

        let mut state = flatten_object(&self.schema, response).map_err(conversion(operation))?;
        self.carry_write_only(&mut state, planned);
        Ok(state)
    }

    fn carry_write_only(&self, state: &mut ValueTree, source: &ValueTree) {
        for attribute in self.schema.attributes().iter().filter(|a| a.write_only) {
            let value: Value<AttrValue> = match source.get(attribute.name) {
                Value::Known(value) => Value::Known(value.clone()),
                Value::Null | Value::Unknown => Value::Null,
            };
            state.set(attribute.name, value);
        }
    }
}

pub(crate) fn remote(operation: Operation) -> impl FnOnce(ClientError) -> ControllerError {
    move |source| ControllerError::Remote { operation, source }
}

pub(crate) fn conversion(operation: Operation) -> impl FnOnce(ConversionError) -> ControllerError {
    move |source| ControllerError::Conversion { operation, source }
}

fn missing_identity(operation: Operation) -> ControllerError {
    ControllerError::Validation {
        operation,
        diagnostics: Diagnostic::attribute_error(
            "id",
            "Missing Resource Identity",
            "An A record identity is required, e.g. the key from its NIOS reference.",
        )
        .into(),
    }
}

pub(crate) fn reject_invalid(
    operation: Operation,
    diagnostics: Diagnostics,
) -> Result<(), ControllerError> {
    if diagnostics.has_error() {
        debug!(operation = %operation, diagnostics = %diagnostics, "Configuration rejected");
        return Err(ControllerError::Validation {
            operation,
            diagnostics,
        });
    }
    Ok(())
}

pub(crate) fn observe<T>(
    operation: Operation,
    started: Instant,
    result: &Result<T, ControllerError>,
    absent: bool,
) {
    let outcome = match result {
        Ok(_) if absent => OperationOutcome::Absent,
        Ok(_) => OperationOutcome::Success,
        Err(e) => OperationOutcome::for_error(e),
    };
    record_operation(operation, outcome, started.elapsed());
}
