// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the NIOS provider.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Provider Constants
// ============================================================================

/// Type name of the provider; resource and data source names are prefixed with it
pub const PROVIDER_TYPE_NAME: &str = "nios";

/// Type name suffix of the A record resource
pub const RESOURCE_DNS_A_RECORD: &str = "dns_a_record";

/// Type name suffix of the A record collection data source
pub const DATA_SOURCE_DNS_A_RECORDS: &str = "dns_a_records";

/// Default client name reported in the `User-Agent` header and NIOS audit logs
pub const DEFAULT_CLIENT_NAME: &str = concat!("nios-provider/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable holding the NIOS grid master URL
pub const ENV_NIOS_HOST_URL: &str = "NIOS_HOST_URL";

/// Environment variable holding the WAPI credential (`username:password`)
pub const ENV_NIOS_AUTH: &str = "NIOS_AUTH";

/// Provider setting name for the grid master URL
pub const SETTING_NIOS_HOST_URL: &str = "nios_host_url";

/// Provider setting name for the WAPI credential
pub const SETTING_NIOS_AUTH: &str = "nios_auth";

/// WAPI version used when none is configured
pub const DEFAULT_WAPI_VERSION: &str = "v2.13.6";

// ============================================================================
// WAPI Protocol Constants
// ============================================================================

/// WAPI object type of DNS A records
pub const RECORD_A_OBJECT_TYPE: &str = "record:a";

/// Path segment under the grid master URL where WAPI is served
pub const WAPI_PATH_PREFIX: &str = "wapi";

/// Query parameter selecting returned fields in addition to the defaults
pub const PARAM_RETURN_FIELDS: &str = "_return_fields2";

/// Query parameter asking WAPI to wrap responses in `{"result": ...}`
pub const PARAM_RETURN_AS_OBJECT: &str = "_return_as_object";

/// Key under which WAPI nests the payload when `_return_as_object=1`
pub const RESULT_KEY: &str = "result";

/// Filter key prefix marking an extensible attribute filter (`*Site=lab`)
pub const EXTATTR_FILTER_PREFIX: char = '*';

/// Key holding the value of one extensible attribute (`{"Site": {"value": "lab"}}`)
pub const EXTATTR_VALUE_KEY: &str = "value";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Record creator for records managed through WAPI
pub const CREATOR_STATIC: &str = "STATIC";

/// Record creator for records created through dynamic updates
pub const CREATOR_DYNAMIC: &str = "DYNAMIC";

/// DNS view that NIOS places records in when none is requested
pub const DEFAULT_DNS_VIEW: &str = "default";

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all provider metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "nios_provider";
