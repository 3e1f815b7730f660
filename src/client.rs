// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote object client contract.
//!
//! Controllers talk to NIOS only through [`RecordClient`]. The production
//! implementation is [`WapiClient`](crate::wapi::WapiClient); tests and local
//! runs use [`InMemoryRecordStore`](crate::memory::InMemoryRecordStore).
//!
//! A client is shared by every in-flight operation through an `Arc`, so it must
//! be `Send + Sync` and must not need `&mut self`.

use crate::errors::ClientError;
use crate::filter::RecordFilter;
use crate::schema::Schema;
use crate::wire::WireObject;
use async_trait::async_trait;

/// Per-call options understood by WAPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Fields to return in addition to the reference (`_return_fields2`)
    pub return_fields: Vec<String>,
    /// Wrap responses in `{"result": ...}` and return full objects from writes
    pub return_as_object: bool,
}

impl RequestOptions {
    /// Options that read back every readable attribute of `schema`.
    #[must_use]
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            return_fields: schema
                .return_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
            return_as_object: true,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            return_fields: Vec::new(),
            return_as_object: true,
        }
    }
}

/// Operations on one WAPI object type.
///
/// Every method returns [`ClientError::NotFound`] when NIOS answers 404, so the
/// caller decides whether absence is an error.
#[async_trait]
pub trait RecordClient: Send + Sync + std::fmt::Debug {
    /// Fetch one object by identity.
    async fn get(
        &self,
        identity: &str,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError>;

    /// Create an object; the response carries the NIOS-assigned reference.
    async fn create(
        &self,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError>;

    /// Overwrite the fields present in `object` on an existing object.
    async fn replace(
        &self,
        identity: &str,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError>;

    /// Delete an object by identity.
    async fn delete(&self, identity: &str) -> Result<(), ClientError>;

    /// Search objects matching `filter`, in the order NIOS returns them.
    async fn list(
        &self,
        filter: &RecordFilter,
        options: &RequestOptions,
    ) -> Result<Vec<WireObject>, ClientError>;
}
