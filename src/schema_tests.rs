// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for schema module
//!
//! These tests cover the A record attribute table, validation of raw
//! configurations and default resolution.

#[cfg(test)]
mod tests {
    use crate::schema::*;
    use crate::value::{AttrValue, Value, ValueTree};

    fn minimal_config() -> ValueTree {
        ValueTree::new()
            .with("name", "host.example.com")
            .with("ipv4addr", "10.0.0.20")
    }

    fn summaries(schema: &Schema, config: &ValueTree) -> Vec<String> {
        schema
            .validate(config)
            .iter()
            .map(|d| d.summary.clone())
            .collect()
    }

    // ============================================================================
    // Attribute Table
    // ============================================================================

    #[test]
    fn test_record_a_schema_is_well_formed() {
        assert!(Schema::record_a().check_invariants().is_empty());
        assert!(Schema::record_a_query().check_invariants().is_empty());
    }

    #[test]
    fn test_record_a_attribute_flags() {
        let schema = Schema::record_a();

        let view = schema.attribute("view").unwrap();
        assert!(view.immutable);
        assert_eq!(view.cardinality, Cardinality::Optional);

        let ptr = schema.attribute("remove_associated_ptr").unwrap();
        assert!(ptr.write_only);

        let id = schema.attribute("id").unwrap();
        assert_eq!(id.binding, Binding::Identity);
        assert_eq!(schema.attribute("ref").unwrap().binding, Binding::Reference);

        let creator = schema.attribute("creator").unwrap();
        assert_eq!(creator.default, Some(DefaultValue::String("STATIC")));
        assert_eq!(creator.cardinality, Cardinality::OptionalComputed);

        assert_eq!(schema.attribute("name").unwrap().cardinality, Cardinality::Required);
        assert_eq!(schema.attribute("zone").unwrap().cardinality, Cardinality::Computed);
        assert!(schema.attribute("nonexistent").is_none());
    }

    #[test]
    fn test_return_fields_skip_reference_and_write_only() {
        let fields = Schema::record_a().return_fields();

        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"extattrs"));
        assert!(fields.contains(&"zone"));
        assert!(!fields.contains(&"ref"));
        assert!(!fields.contains(&"id"));
        assert!(!fields.contains(&"remove_associated_ptr"));
    }

    #[test]
    fn test_check_invariants_reports_bad_tables() {
        const BAD: &[Attribute] = &[
            Attribute::required("name", AttributeType::String, "")
                .with_default(DefaultValue::String("x")),
            Attribute::optional("ttl", AttributeType::Int32, "")
                .with_default(DefaultValue::Bool(true)),
            Attribute::optional("flag", AttributeType::Bool, "")
                .with_validators(&[Validator::AlsoRequires(&["missing"])]),
        ];
        let violations = Schema::new(BAD).check_invariants();
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("required attribute 'name'"));
    }

    #[test]
    fn test_as_data_source_makes_everything_computed() {
        let schema = Schema::record_a().as_data_source();

        for attribute in schema.attributes() {
            assert_eq!(attribute.cardinality, Cardinality::Computed, "{}", attribute.name);
            assert!(attribute.default.is_none());
            assert!(attribute.validators.is_empty());
            assert!(!attribute.write_only, "{}", attribute.name);
        }
        assert!(schema.attribute("remove_associated_ptr").is_none());
        assert!(schema.attribute("zone").is_some());
        assert!(schema.check_invariants().is_empty());
    }

    // ============================================================================
    // Validation
    // ============================================================================

    #[test]
    fn test_validate_minimal_config() {
        assert!(Schema::record_a().validate(&minimal_config()).is_empty());
    }

    #[test]
    fn test_validate_missing_required() {
        let schema = Schema::record_a();
        let config = ValueTree::new().with("name", "host.example.com");

        let diagnostics = schema.validate(&config);
        assert!(diagnostics.has_error());
        let diagnostic = diagnostics.for_attribute("ipv4addr").next().unwrap();
        assert_eq!(diagnostic.summary, "Missing Configuration for Required Attribute");
    }

    #[test]
    fn test_validate_unknown_required_value() {
        let config = ValueTree::new().with("name", "host.example.com").with_unknown("ipv4addr");
        assert_eq!(
            summaries(&Schema::record_a(), &config),
            vec!["Unknown Value for Required Attribute"]
        );
    }

    #[test]
    fn test_validate_ttl_requires_use_ttl() {
        let config = minimal_config().with("ttl", 300);
        let diagnostics = Schema::record_a().validate(&config);

        assert!(diagnostics.has_error());
        let diagnostic = diagnostics.for_attribute("ttl").next().unwrap();
        assert_eq!(diagnostic.summary, "Invalid Attribute Combination");
        assert!(diagnostic.detail.contains("\"use_ttl\""));
    }

    #[test]
    fn test_validate_use_ttl_requires_ttl() {
        let config = minimal_config().with("use_ttl", true);
        let diagnostics = Schema::record_a().validate(&config);

        let diagnostic = diagnostics.for_attribute("use_ttl").next().unwrap();
        assert_eq!(diagnostic.summary, "Invalid Attribute Combination");
        assert!(diagnostic.detail.contains("\"ttl\""));
    }

    #[test]
    fn test_validate_ttl_with_use_ttl() {
        let config = minimal_config().with("ttl", 300).with("use_ttl", true);
        assert!(Schema::record_a().validate(&config).is_empty());
    }

    #[test]
    fn test_validate_co_requirement_runs_before_defaults() {
        // use_ttl has a default, but the rule looks at what the user wrote
        let schema = Schema::record_a();
        let config = minimal_config().with("ttl", 300);
        let planned = schema.apply_defaults(&config);

        assert_eq!(planned.get_bool("use_ttl"), Some(false));
        assert!(schema.validate(&config).has_error());
    }

    #[test]
    fn test_validate_creator_one_of() {
        let schema = Schema::record_a();

        let config = minimal_config().with("creator", "SYSTEM");
        assert_eq!(summaries(&schema, &config), vec!["Invalid Attribute Value Match"]);

        let config = minimal_config().with("creator", "DYNAMIC");
        assert!(schema.validate(&config).is_empty());
    }

    #[test]
    fn test_validate_unknown_value_skips_value_checks() {
        let config = minimal_config().with_unknown("creator");
        assert!(Schema::record_a().validate(&config).is_empty());
    }

    #[test]
    fn test_validate_rejects_computed_and_unsupported() {
        let config = minimal_config().with("zone", "example.com").with("color", "blue");
        let diagnostics = Schema::record_a().validate(&config);

        assert_eq!(
            diagnostics.for_attribute("zone").next().unwrap().summary,
            "Invalid Configuration for Read-Only Attribute"
        );
        assert_eq!(
            diagnostics.for_attribute("color").next().unwrap().summary,
            "Unsupported Attribute"
        );
    }

    #[test]
    fn test_validate_unknown_computed_value_passes() {
        let config = minimal_config().with_unknown("zone").with_unknown("id");
        assert!(Schema::record_a().validate(&config).is_empty());
    }

    #[test]
    fn test_validate_planned_accepts_known_computed_values() {
        let schema = Schema::record_a();
        let state = minimal_config()
            .with("id", "ZG5zLmJpbmRfYSQw")
            .with("ref", "record:a/ZG5zLmJpbmRfYSQw:host.example.com/default")
            .with("zone", "example.com")
            .with("dns_name", "host.example.com")
            .with("creation_time", 1_700_000_000)
            .with("use_ttl", false);

        assert!(schema.validate_planned(&state).is_empty());
        assert!(schema.validate(&state).has_error());
    }

    #[test]
    fn test_validate_planned_keeps_type_checks() {
        let state = minimal_config().with("zone", 42);
        assert_eq!(
            Schema::record_a()
                .validate_planned(&state)
                .iter()
                .map(|d| d.summary.as_str())
                .collect::<Vec<_>>(),
            vec!["Incorrect Attribute Type"]
        );
    }

    #[test]
    fn test_validate_default_use_ttl_needs_no_ttl() {
        let config = minimal_config().with("use_ttl", false);
        assert!(Schema::record_a().validate(&config).is_empty());
    }

    #[test]
    fn test_validate_type_mismatch() {
        let config = minimal_config().with("ttl", "300").with("use_ttl", true);
        assert_eq!(summaries(&Schema::record_a(), &config), vec!["Incorrect Attribute Type"]);
    }

    // ============================================================================
    // Defaults
    // ============================================================================

    #[test]
    fn test_apply_defaults() {
        let planned = Schema::record_a().apply_defaults(&minimal_config());

        assert_eq!(planned.get_str("creator"), Some("STATIC"));
        assert_eq!(planned.get_bool("disable"), Some(false));
        assert_eq!(planned.get_bool("ddns_protected"), Some(false));
        assert_eq!(planned.get_bool("forbid_reclamation"), Some(false));
        assert_eq!(planned.get_bool("use_ttl"), Some(false));
        // No default: stays null
        assert!(planned.get("comment").is_null());
        assert!(planned.get("view").is_null());
    }

    #[test]
    fn test_apply_defaults_keeps_configured_and_unknown() {
        let config = minimal_config().with("creator", "DYNAMIC").with_unknown("disable");
        let planned = Schema::record_a().apply_defaults(&config);

        assert_eq!(planned.get_str("creator"), Some("DYNAMIC"));
        assert!(planned.get("disable").is_unknown());
    }

    #[test]
    fn test_default_value_conversion() {
        assert_eq!(DefaultValue::Int32(5).to_value(), AttrValue::Int32(5));
        assert_eq!(
            Value::Known(DefaultValue::String("x").to_value()),
            Value::Known(AttrValue::String("x".to_string()))
        );
    }
}
