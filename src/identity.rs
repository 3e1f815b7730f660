// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Identity derivation from WAPI object references.
//!
//! NIOS references look like `record:a/<key>:<name>/<view>`. The `<name>/<view>`
//! suffix changes when a record is renamed or moved, the `<key>` does not. The
//! persisted identity is that key, so the identity stays stable while the
//! reference string changes.
//!
//! ```rust
//! use nios_provider::identity::extract_identity;
//!
//! let reference = "record:a/ZG5zLmJpbmRfYSQuX2RlZmF1bHQ:host.example.com/default";
//! assert_eq!(extract_identity(reference), Some("ZG5zLmJpbmRfYSQuX2RlZmF1bHQ"));
//! ```

/// Extract the stable identity key from a reference.
///
/// Returns `None` when the reference has no non-empty segment after the object
/// type.
#[must_use]
pub fn extract_identity(reference: &str) -> Option<&str> {
    let (_, rest) = reference.split_once('/')?;
    let key = rest.split(':').next().unwrap_or_default();
    (!key.is_empty()).then_some(key)
}

/// Identity key to address an object with.
///
/// Accepts either a bare identity or a full reference of `object_type`, so an
/// import may be given whichever form the user copied from NIOS.
#[must_use]
pub fn object_key<'a>(object_type: &str, identity: &'a str) -> &'a str {
    match identity.strip_prefix(object_type) {
        Some(rest) if rest.starts_with('/') => extract_identity(identity).unwrap_or(identity),
        _ => identity,
    }
}
