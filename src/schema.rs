// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Attribute schema for NIOS objects.
//!
//! The schema is declared as data: one [`Attribute`] per field carrying its
//! semantic type, cardinality, default, immutability, write-only flag, wire
//! binding and validators. Expand, Flatten, validation and the return-field
//! list all walk the same table, so adding a field is a one-line change.
//!
//! # Example
//!
//! ```rust
//! use nios_provider::schema::Schema;
//! use nios_provider::value::ValueTree;
//!
//! let schema = Schema::record_a();
//! let config = ValueTree::new()
//!     .with("name", "host.example.com")
//!     .with("ipv4addr", "10.0.0.20")
//!     .with("ttl", 300);
//!
//! // ttl without use_ttl violates the co-requirement
//! let diagnostics = schema.validate(&config);
//! assert!(diagnostics.has_error());
//! ```

use crate::constants::{CREATOR_DYNAMIC, CREATOR_STATIC};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::value::{AttrValue, Value, ValueTree};

/// Semantic type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Int32,
    Bool,
    /// String-to-string map
    Map,
    /// Map of string maps (extensible attributes)
    MapOfMaps,
    /// Nested list of objects
    List,
}

impl AttributeType {
    /// Human readable type name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int32 => "int32",
            AttributeType::Bool => "bool",
            AttributeType::Map => "map of strings",
            AttributeType::MapOfMaps => "map of string maps",
            AttributeType::List => "list of objects",
        }
    }

    /// Returns `true` if `value` is of this type.
    #[must_use]
    pub fn matches(&self, value: &AttrValue) -> bool {
        matches!(
            (self, value),
            (AttributeType::String, AttrValue::String(_))
                | (AttributeType::Int32, AttrValue::Int32(_))
                | (AttributeType::Bool, AttrValue::Bool(_))
                | (AttributeType::Map, AttrValue::Map(_))
                | (AttributeType::MapOfMaps, AttrValue::MapOfMaps(_))
                | (AttributeType::List, AttrValue::List(_))
        )
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Must be configured
    Required,
    /// May be configured; null when not
    Optional,
    /// Produced by the remote system only
    Computed,
    /// May be configured; otherwise the remote system supplies it
    OptionalComputed,
}

impl Cardinality {
    /// Returns `true` if users may never set the attribute.
    #[must_use]
    pub fn is_computed_only(&self) -> bool {
        matches!(self, Cardinality::Computed)
    }

    /// Returns `true` if the remote system may supply the value.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, Cardinality::Computed | Cardinality::OptionalComputed)
    }
}

/// Where an attribute's value lives on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// A named field of the wire object
    Field(&'static str),
    /// The object reference (`_ref`)
    Reference,
    /// The persisted identity derived from the reference
    Identity,
    /// Not exchanged with the remote system at all
    Local,
}

/// Static default of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    String(&'static str),
    Int32(i32),
    Bool(bool),
}

impl DefaultValue {
    #[must_use]
    pub fn to_value(&self) -> AttrValue {
        match self {
            DefaultValue::String(value) => AttrValue::String((*value).to_string()),
            DefaultValue::Int32(value) => AttrValue::Int32(*value),
            DefaultValue::Bool(value) => AttrValue::Bool(*value),
        }
    }
}

/// Value validator attached to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// String value must be one of the listed values
    OneOf(&'static [&'static str]),
    /// When this attribute is set, every listed attribute must be set too
    AlsoRequires(&'static [&'static str]),
}

/// Descriptor of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub attr_type: AttributeType,
    pub cardinality: Cardinality,
    pub default: Option<DefaultValue>,
    /// Settable only at creation; never sent on update
    pub immutable: bool,
    /// Sent to the remote system but never read back
    pub write_only: bool,
    pub binding: Binding,
    pub validators: &'static [Validator],
    pub description: &'static str,
}

impl Attribute {
    const fn new(
        name: &'static str,
        attr_type: AttributeType,
        cardinality: Cardinality,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attr_type,
            cardinality,
            default: None,
            immutable: false,
            write_only: false,
            binding: Binding::Field(name),
            validators: &[],
            description,
        }
    }

    /// Attribute the user must configure.
    #[must_use]
    pub const fn required(
        name: &'static str,
        attr_type: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, Cardinality::Required, description)
    }

    /// Attribute the user may configure.
    #[must_use]
    pub const fn optional(
        name: &'static str,
        attr_type: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, Cardinality::Optional, description)
    }

    /// Attribute produced by the remote system.
    #[must_use]
    pub const fn computed(
        name: &'static str,
        attr_type: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, Cardinality::Computed, description)
    }

    /// Attribute the user may configure, supplied remotely otherwise.
    #[must_use]
    pub const fn optional_computed(
        name: &'static str,
        attr_type: AttributeType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, Cardinality::OptionalComputed, description)
    }

    #[must_use]
    pub const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub const fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    #[must_use]
    pub const fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    #[must_use]
    pub const fn bound_to(mut self, binding: Binding) -> Self {
        self.binding = binding;
        self
    }

    #[must_use]
    pub const fn with_validators(mut self, validators: &'static [Validator]) -> Self {
        self.validators = validators;
        self
    }

    /// Returns `true` if `value` is known and equal to the attribute's default.
    #[must_use]
    pub fn holds_default(&self, value: &Value<AttrValue>) -> bool {
        match (self.default, value.known()) {
            (Some(default), Some(known)) => default.to_value() == *known,
            _ => false,
        }
    }

    /// Wire field name, if the attribute is carried as a plain field.
    #[must_use]
    pub fn wire_name(&self) -> Option<&'static str> {
        match self.binding {
            Binding::Field(name) => Some(name),
            Binding::Reference | Binding::Identity | Binding::Local => None,
        }
    }
}

/// Attribute table of the `record:a` object.
pub const RECORD_A_ATTRIBUTES: &[Attribute] = &[
    Attribute::computed(
        "id",
        AttributeType::String,
        "The identity of the object, derived from its reference.",
    )
    .bound_to(Binding::Identity),
    Attribute::computed("ref", AttributeType::String, "The reference to the object.")
        .bound_to(Binding::Reference),
    Attribute::computed(
        "aws_rte53_record_info",
        AttributeType::String,
        "Aws Route 53 record information.",
    ),
    Attribute::computed(
        "cloud_info",
        AttributeType::String,
        "Structure containing all cloud API related information for this object.",
    ),
    Attribute::optional_computed(
        "comment",
        AttributeType::String,
        "Comment for the record; maximum 256 characters.",
    ),
    Attribute::computed(
        "creation_time",
        AttributeType::Int32,
        "The time of the record creation in Epoch seconds format.",
    ),
    Attribute::optional_computed("creator", AttributeType::String, "The record creator.")
        .with_default(DefaultValue::String(CREATOR_STATIC))
        .with_validators(&[Validator::OneOf(&[CREATOR_STATIC, CREATOR_DYNAMIC])]),
    Attribute::optional(
        "ddns_principal",
        AttributeType::String,
        "The GSS-TSIG principal that owns this record.",
    ),
    Attribute::optional_computed(
        "ddns_protected",
        AttributeType::Bool,
        "Determines if the DDNS updates for this record are allowed or not.",
    )
    .with_default(DefaultValue::Bool(false)),
    Attribute::optional_computed(
        "disable",
        AttributeType::Bool,
        "Determines if the record is disabled or not. False means that the record is enabled.",
    )
    .with_default(DefaultValue::Bool(false)),
    Attribute::computed(
        "discovered_data",
        AttributeType::String,
        "The discovered data for this A record.",
    ),
    Attribute::computed(
        "dns_name",
        AttributeType::String,
        "The name for an A record in punycode format.",
    ),
    Attribute::optional_computed(
        "extattrs",
        AttributeType::MapOfMaps,
        "Extensible attributes associated with the object.",
    ),
    Attribute::optional_computed(
        "forbid_reclamation",
        AttributeType::Bool,
        "Determines if the reclamation is allowed for the record or not.",
    )
    .with_default(DefaultValue::Bool(false)),
    Attribute::required("ipv4addr", AttributeType::String, "The IPv4 Address of the record."),
    Attribute::computed(
        "last_queried",
        AttributeType::String,
        "The time of the last DNS query in Epoch seconds format.",
    ),
    Attribute::computed(
        "ms_ad_user_data",
        AttributeType::String,
        "The Microsoft Active Directory user related information.",
    ),
    Attribute::required("name", AttributeType::String, "The Name of the record."),
    Attribute::computed(
        "reclaimable",
        AttributeType::Bool,
        "Determines if the record is reclaimable or not.",
    ),
    Attribute::optional(
        "remove_associated_ptr",
        AttributeType::Bool,
        "Whether to remove associated PTR records while deleting the A record.",
    )
    .write_only(),
    Attribute::computed(
        "shared_record_group",
        AttributeType::String,
        "The shared record group this record belongs to.",
    ),
    Attribute::optional(
        "ttl",
        AttributeType::Int32,
        "Time-to-live value of the record, in seconds.",
    )
    .with_validators(&[Validator::AlsoRequires(&["use_ttl"])]),
    Attribute::optional_computed(
        "use_ttl",
        AttributeType::Bool,
        "Flag to indicate whether the TTL value should be used for the A record.",
    )
    .with_default(DefaultValue::Bool(false))
    .with_validators(&[Validator::AlsoRequires(&["ttl"])]),
    Attribute::optional("view", AttributeType::String, "View that this record is part of.")
        .immutable(),
    Attribute::computed("zone", AttributeType::String, "The zone in which the record resides."),
];

/// Attribute table of the A record collection data source.
pub const RECORD_A_QUERY_ATTRIBUTES: &[Attribute] = &[
    Attribute::optional("body", AttributeType::Map, "The body of the GET Call.")
        .bound_to(Binding::Local),
    Attribute::computed("result", AttributeType::List, "The A records matching the filter.")
        .bound_to(Binding::Local),
];

/// An ordered set of attribute descriptors for one object kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Build a schema from an attribute table.
    #[must_use]
    pub fn new(attributes: &[Attribute]) -> Self {
        Self {
            attributes: attributes.to_vec(),
        }
    }

    /// Schema of the `record:a` resource.
    #[must_use]
    pub fn record_a() -> Self {
        Self::new(RECORD_A_ATTRIBUTES)
    }

    /// Schema of the A record collection data source.
    #[must_use]
    pub fn record_a_query() -> Self {
        Self::new(RECORD_A_QUERY_ATTRIBUTES)
    }

    /// All attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The same attributes with every one computed, as used for data source results.
    ///
    /// Defaults, validators and immutability only matter for user input, so
    /// they are dropped. Write-only attributes are never read back and have
    /// no place in a result.
    #[must_use]
    pub fn as_data_source(&self) -> Self {
        let attributes = self
            .attributes
            .iter()
            .filter(|attribute| !attribute.write_only)
            .map(|attribute| Attribute {
                cardinality: Cardinality::Computed,
                default: None,
                immutable: false,
                validators: &[],
                ..*attribute
            })
            .collect();
        Self { attributes }
    }

    /// Wire names of the fields to request back from the remote system.
    ///
    /// The reference is always returned and write-only fields never are, so
    /// both are left out.
    #[must_use]
    pub fn return_fields(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|attribute| !attribute.write_only)
            .filter_map(Attribute::wire_name)
            .collect()
    }

    /// Validate a user configuration before any remote call.
    ///
    /// Checks, in order: unknown attribute names, computed-only attributes set by
    /// the user, value types, enumerated values, missing required attributes and
    /// co-requirements between attributes. Unknown values pass the value checks;
    /// a required attribute must be known by the time an operation applies it.
    #[must_use]
    pub fn validate(&self, config: &ValueTree) -> Diagnostics {
        self.check(config, true)
    }

    /// Validate a planned or prior-state tree at apply time.
    ///
    /// Same checks as [`Schema::validate`], except that computed-only values
    /// are accepted: the orchestrator sends them unknown in a plan and known in
    /// a previously returned state, and [`crate::convert::expand`] never sends
    /// them.
    #[must_use]
    pub fn validate_planned(&self, tree: &ValueTree) -> Diagnostics {
        self.check(tree, false)
    }

    fn check(&self, config: &ValueTree, reject_computed: bool) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for (name, value) in config.iter() {
            let Some(attribute) = self.attribute(name) else {
                diagnostics.push(Diagnostic::attribute_error(
                    name,
                    "Unsupported Attribute",
                    format!("An attribute named \"{name}\" is not expected here."),
                ));
                continue;
            };

            if reject_computed && attribute.cardinality.is_computed_only() && value.is_known() {
                diagnostics.push(Diagnostic::attribute_error(
                    name,
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for attribute \"{name}\"; it is computed by NIOS."),
                ));
                continue;
            }

            let Value::Known(known) = value else {
                continue;
            };

            if !attribute.attr_type.matches(known) {
                diagnostics.push(Diagnostic::attribute_error(
                    name,
                    "Incorrect Attribute Type",
                    format!(
                        "Attribute \"{name}\" expects a {}, got a {}.",
                        attribute.attr_type.name(),
                        known.type_name()
                    ),
                ));
                continue;
            }

            for validator in attribute.validators {
                if let (Validator::OneOf(allowed), AttrValue::String(s)) = (validator, known) {
                    if !allowed.contains(&s.as_str()) {
                        diagnostics.push(Diagnostic::attribute_error(
                            name,
                            "Invalid Attribute Value Match",
                            format!(
                                "Attribute \"{name}\" value must be one of: {allowed:?}, got: {s:?}"
                            ),
                        ));
                    }
                }
            }
        }

        for attribute in &self.attributes {
            let value = config.get(attribute.name);

            if attribute.cardinality == Cardinality::Required {
                if value.is_null() {
                    diagnostics.push(Diagnostic::attribute_error(
                        attribute.name,
                        "Missing Configuration for Required Attribute",
                        format!(
                            "Must set a configuration value for the \"{}\" attribute.",
                            attribute.name
                        ),
                    ));
                } else if value.is_unknown() {
                    diagnostics.push(Diagnostic::attribute_error(
                        attribute.name,
                        "Unknown Value for Required Attribute",
                        format!(
                            "The \"{}\" attribute must be known before it can be applied.",
                            attribute.name
                        ),
                    ));
                }
            }

            // a value equal to the default says nothing the user chose
            if value.is_null() || attribute.holds_default(value) {
                continue;
            }
            for validator in attribute.validators {
                let Validator::AlsoRequires(others) = validator else {
                    continue;
                };
                for other in others.iter().filter(|other| config.get(other).is_null()) {
                    diagnostics.push(Diagnostic::attribute_error(
                        attribute.name,
                        "Invalid Attribute Combination",
                        format!(
                            "Attribute \"{other}\" must be specified when \"{}\" is specified",
                            attribute.name
                        ),
                    ));
                }
            }
        }

        diagnostics
    }

    /// Resolve the planned tree for a configuration.
    ///
    /// Null attributes that declare a default take the default; everything else,
    /// including unknown values, is kept as configured.
    #[must_use]
    pub fn apply_defaults(&self, config: &ValueTree) -> ValueTree {
        let mut planned = config.clone();
        for attribute in &self.attributes {
            if let Some(default) = attribute.default {
                if config.get(attribute.name).is_null() {
                    planned.set(attribute.name, Value::Known(default.to_value()));
                }
            }
        }
        planned
    }

    /// Check the declaration invariants of the table.
    ///
    /// Returns one message per violated invariant; an empty vector means the
    /// schema is well formed.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for attribute in &self.attributes {
            let name = attribute.name;
            if attribute.cardinality == Cardinality::Required && attribute.default.is_some() {
                violations.push(format!("required attribute '{name}' declares a default"));
            }
            if attribute.cardinality.is_computed_only()
                && (attribute.default.is_some() || !attribute.validators.is_empty())
            {
                violations.push(format!("computed attribute '{name}' accepts user input settings"));
            }
            if attribute.write_only && attribute.cardinality.is_computed() {
                violations.push(format!("write-only attribute '{name}' is computed"));
            }
            if let Some(default) = attribute.default {
                if !attribute.attr_type.matches(&default.to_value()) {
                    violations.push(format!("default of '{name}' does not match its type"));
                }
            }
            for validator in attribute.validators {
                if let Validator::AlsoRequires(others) = validator {
                    for other in others.iter().filter(|o| self.attribute(o).is_none()) {
                        violations.push(format!("'{name}' requires unknown attribute '{other}'"));
                    }
                }
            }
            if self.attributes.iter().filter(|a| a.name == name).count() > 1 {
                violations.push(format!("attribute '{name}' is declared twice"));
            }
        }
        violations
    }
}
