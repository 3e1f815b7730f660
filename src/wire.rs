// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire representation of WAPI objects.
//!
//! A [`WireObject`] is what travels over the WAPI: an opaque `_ref` assigned by
//! NIOS plus a JSON map of fields. Fields are kept untyped here; the converter
//! applies the schema's types on the way in and out.

use crate::constants::RESULT_KEY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// One WAPI object as sent or received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireObject {
    /// NIOS-assigned reference, e.g. `record:a/ZG5z...:host.example.com/default`
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// All other fields, keyed by wire name
    #[serde(flatten)]
    pub fields: Map<String, Json>,
}

impl WireObject {
    /// An object that only carries a reference, as returned by WAPI for
    /// create/update calls without `_return_as_object`.
    #[must_use]
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            fields: Map::new(),
        }
    }

    /// Builder: set a field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Json>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Builder: set the reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Raw value of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Json> {
        self.fields.get(name)
    }

    /// String value of a field.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Json::as_str)
    }

    /// Parse an object from a decoded WAPI payload.
    ///
    /// Accepts either a full object or a bare reference string; the `_ref`
    /// key is read whichever way the object arrived.
    ///
    /// # Errors
    ///
    /// Returns a message describing the mismatch if `payload` is neither.
    pub fn from_payload(payload: Json) -> Result<Self, String> {
        match payload {
            Json::String(reference) => Ok(Self::from_reference(reference)),
            Json::Object(_) => serde_json::from_value(payload).map_err(|e| e.to_string()),
            other => Err(format!("expected an object or a reference, got {other}")),
        }
    }
}

/// Unwrap the `{"result": ...}` envelope used with `_return_as_object=1`.
///
/// # Errors
///
/// Returns a message if the envelope is missing.
pub fn unwrap_result(payload: Json) -> Result<Json, String> {
    match payload {
        Json::Object(mut envelope) => envelope
            .remove(RESULT_KEY)
            .ok_or_else(|| format!("response has no '{RESULT_KEY}' key")),
        other => Err(format!("expected a '{RESULT_KEY}' envelope, got {other}")),
    }
}

/// Parse a list of objects from a decoded WAPI payload.
///
/// # Errors
///
/// Returns a message if `payload` is not an array of objects.
pub fn objects_from_payload(payload: Json) -> Result<Vec<WireObject>, String> {
    match payload {
        Json::Array(items) => items.into_iter().map(WireObject::from_payload).collect(),
        other => Err(format!("expected a list of objects, got {other}")),
    }
}
