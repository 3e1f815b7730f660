// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bidirectional conversion between typed trees and wire objects.
//!
//! - [`expand`] turns a planned [`ValueTree`] into a [`WireObject`] request.
//! - [`flatten`] turns a [`WireObject`] response back into a [`ValueTree`].
//!
//! Both walk the [`Schema`] attribute by attribute, so cardinality, immutability
//! and write-only rules are enforced here rather than left to NIOS.

use crate::constants::EXTATTR_VALUE_KEY;
use crate::errors::ConversionError;
use crate::identity::extract_identity;
use crate::schema::{Attribute, AttributeType, Binding, Schema};
use crate::value::{AttrValue, MapOfMaps, Value, ValueTree};
use crate::wire::WireObject;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Build the wire request for a planned tree.
///
/// Only known values are sent: null and unknown attributes are omitted, never
/// replaced by a zero value. Computed-only attributes are never sent, and
/// immutable attributes are sent only when `is_create` is `true`.
///
/// # Errors
///
/// Returns [`ConversionError::TypeMismatch`] if a known value does not have the
/// attribute's declared type.
pub fn expand(
    schema: &Schema,
    tree: &ValueTree,
    is_create: bool,
) -> Result<WireObject, ConversionError> {
    let mut object = WireObject::default();

    for attribute in schema.attributes() {
        let Some(wire_name) = attribute.wire_name() else {
            continue;
        };
        if attribute.cardinality.is_computed_only() || (attribute.immutable && !is_create) {
            continue;
        }
        let Value::Known(value) = tree.get(attribute.name) else {
            continue;
        };
        object
            .fields
            .insert(wire_name.to_string(), expand_value(attribute, value)?);
    }

    Ok(object)
}

fn expand_value(attribute: &Attribute, value: &AttrValue) -> Result<Json, ConversionError> {
    let json = match (attribute.attr_type, value) {
        (AttributeType::String, AttrValue::String(s)) => Json::String(s.clone()),
        (AttributeType::Int32, AttrValue::Int32(n)) => Json::from(*n),
        (AttributeType::Bool, AttrValue::Bool(b)) => Json::Bool(*b),
        (AttributeType::Map, AttrValue::Map(map)) => Json::Object(string_map_to_json(map)),
        (AttributeType::MapOfMaps, AttrValue::MapOfMaps(maps)) => Json::Object(
            maps.iter()
                .map(|(key, inner)| (key.clone(), Json::Object(string_map_to_json(inner))))
                .collect(),
        ),
        _ => return Err(mismatch(attribute, value.type_name())),
    };
    Ok(json)
}

fn string_map_to_json(map: &BTreeMap<String, String>) -> Map<String, Json> {
    map.iter()
        .map(|(key, value)| (key.clone(), Json::String(value.clone())))
        .collect()
}

/// Build the typed tree for a wire response.
///
/// A missing source object yields `None`, the typed-null tombstone. Otherwise
/// every schema attribute is set: absent fields become null, never unknown.
///
/// # Errors
///
/// Returns a [`ConversionError`] if a field has the wrong JSON type or the
/// reference has no identity segment.
pub fn flatten(
    schema: &Schema,
    from: Option<&WireObject>,
) -> Result<Option<ValueTree>, ConversionError> {
    from.map(|object| flatten_object(schema, object)).transpose()
}

/// Flatten an object that is known to be present.
///
/// # Errors
///
/// See [`flatten`].
pub fn flatten_object(schema: &Schema, from: &WireObject) -> Result<ValueTree, ConversionError> {
    let mut tree = ValueTree::new();

    for attribute in schema.attributes() {
        let value = match attribute.binding {
            Binding::Reference => Value::from(from.reference.clone().map(AttrValue::String)),
            Binding::Identity => match from.reference.as_deref() {
                Some(reference) => {
                    let identity = extract_identity(reference).ok_or_else(|| {
                        ConversionError::MalformedReference {
                            reference: reference.to_string(),
                        }
                    })?;
                    Value::Known(AttrValue::String(identity.to_string()))
                }
                None => Value::Null,
            },
            Binding::Field(wire_name) => match from.field(wire_name) {
                None | Some(Json::Null) => Value::Null,
                Some(json) => Value::Known(flatten_value(attribute, json)?),
            },
            Binding::Local => Value::Null,
        };
        tree.set(attribute.name, value);
    }

    Ok(tree)
}

/// Flatten every object of a list response, keeping the remote order.
///
/// # Errors
///
/// Returns the first [`ConversionError`] encountered.
pub fn flatten_list(
    schema: &Schema,
    from: &[WireObject],
) -> Result<Vec<ValueTree>, ConversionError> {
    from.iter().map(|object| flatten_object(schema, object)).collect()
}

fn flatten_value(attribute: &Attribute, json: &Json) -> Result<AttrValue, ConversionError> {
    let value = match attribute.attr_type {
        AttributeType::String => json
            .as_str()
            .map(|s| AttrValue::String(s.to_string()))
            .ok_or_else(|| mismatch(attribute, json_type(json)))?,
        AttributeType::Int32 => json
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(AttrValue::Int32)
            .ok_or_else(|| mismatch(attribute, json_type(json)))?,
        AttributeType::Bool => json
            .as_bool()
            .map(AttrValue::Bool)
            .ok_or_else(|| mismatch(attribute, json_type(json)))?,
        AttributeType::Map => {
            let object = json
                .as_object()
                .ok_or_else(|| mismatch(attribute, json_type(json)))?;
            AttrValue::Map(json_to_string_map(object))
        }
        AttributeType::MapOfMaps => {
            let object = json
                .as_object()
                .ok_or_else(|| mismatch(attribute, json_type(json)))?;
            let mut maps = MapOfMaps::new();
            for (key, inner) in object {
                let inner = match inner {
                    Json::Object(inner) => json_to_string_map(inner),
                    // A bare scalar is shorthand for {"value": scalar}
                    scalar => {
                        BTreeMap::from([(EXTATTR_VALUE_KEY.to_string(), json_to_text(scalar))])
                    }
                };
                maps.insert(key.clone(), inner);
            }
            AttrValue::MapOfMaps(maps)
        }
        AttributeType::List => return Err(mismatch(attribute, json_type(json))),
    };
    Ok(value)
}

fn json_to_string_map(object: &Map<String, Json>) -> BTreeMap<String, String> {
    object
        .iter()
        .map(|(key, value)| (key.clone(), json_to_text(value)))
        .collect()
}

/// Render a JSON leaf as text; integer extensible attributes come back as numbers.
fn json_to_text(json: &Json) -> String {
    match json {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(attribute: &Attribute, found: &str) -> ConversionError {
    ConversionError::TypeMismatch {
        attribute: attribute.name.to_string(),
        expected: attribute.attr_type.name(),
        found: found.to_string(),
    }
}
