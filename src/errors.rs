// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the NIOS provider.
//!
//! This module provides specialized error types for:
//! - Provider configuration (missing grid master URL or credential)
//! - WAPI client calls (not found, HTTP errors, transport failures, timeouts)
//! - Conversion between typed trees and wire objects
//! - Lifecycle operations of the controllers
//!
//! Not-found is modelled as its own variant so that controllers can treat it as
//! an outcome (absent on read, success on delete) rather than a failure.

use crate::diagnostics::{Diagnostic, Diagnostics};
use std::fmt;
use thiserror::Error;

/// Errors raised while configuring the provider.
///
/// Any of these is fatal for the whole provider: no resource operation runs
/// without a complete configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was neither configured nor present in the environment
    #[error(
        "missing required provider setting '{setting}': set it in the provider configuration or the {env_var} environment variable"
    )]
    MissingSetting {
        /// Provider setting name
        setting: &'static str,
        /// Environment variable consulted as fallback
        env_var: &'static str,
    },

    /// A setting is present but cannot be used
    #[error("invalid provider setting '{setting}': {reason}")]
    InvalidSetting {
        /// Provider setting name
        setting: &'static str,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// Errors returned by a [`RecordClient`](crate::client::RecordClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The object does not exist (HTTP 404)
    #[error("object '{reference}' not found (HTTP 404)")]
    NotFound {
        /// Identity or path that was looked up
        reference: String,
    },

    /// WAPI answered with a non-success status other than 404
    #[error("WAPI returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or error message
        body: String,
    },

    /// The request did not complete in time
    #[error("request to {url} timed out")]
    Timeout {
        /// URL of the request
        url: String,
    },

    /// The request could not be sent or the response could not be read
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// URL of the request
        url: String,
        /// Underlying error text
        reason: String,
    },

    /// The response body is not what WAPI documents
    #[error("malformed response from {url}: {reason}")]
    Decode {
        /// URL of the request
        url: String,
        /// What could not be decoded
        reason: String,
    },
}

impl ClientError {
    /// Returns `true` for [`ClientError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Errors raised while converting between typed trees and wire objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// A value does not have the attribute's declared type
    #[error("attribute '{attribute}' expected {expected}, got {found}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: String,
    },

    /// The object reference does not contain an identity segment
    #[error("malformed object reference '{reference}'")]
    MalformedReference { reference: String },

    /// A response that must carry a reference carried none
    #[error("response carried no object reference")]
    MissingReference,
}

/// Lifecycle operation a controller was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
    List,
}

impl Operation {
    /// Lowercase operation name, used in messages and metric labels.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
            Operation::List => "list",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the resource and data source controllers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The configuration was rejected before any remote call
    #[error("invalid configuration for {operation}: {diagnostics}")]
    Validation {
        operation: Operation,
        diagnostics: Diagnostics,
    },

    /// The remote call failed
    #[error("Unable to {operation} A record, got error: {source}")]
    Remote {
        operation: Operation,
        #[source]
        source: ClientError,
    },

    /// The remote answered, but its payload could not be converted
    #[error("Unable to {operation} A record, got error: {source}")]
    Conversion {
        operation: Operation,
        #[source]
        source: ConversionError,
    },
}

impl ControllerError {
    /// Operation that failed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            ControllerError::Validation { operation, .. }
            | ControllerError::Remote { operation, .. }
            | ControllerError::Conversion { operation, .. } => *operation,
        }
    }

    /// Returns `true` if no remote call was issued.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, ControllerError::Validation { .. })
    }

    /// Render the error as diagnostics for the orchestrator.
    #[must_use]
    pub fn to_diagnostics(&self) -> Diagnostics {
        match self {
            ControllerError::Validation { diagnostics, .. } => diagnostics.clone(),
            ControllerError::Remote { .. } | ControllerError::Conversion { .. } => {
                Diagnostic::error("Client Error", self.to_string()).into()
            }
        }
    }
}
