// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory stand-in for the WAPI `record:a` endpoint.
//!
//! [`InMemoryRecordStore`] implements [`RecordClient`] with the NIOS behaviour
//! the controllers depend on:
//!
//! - references are assigned on create as `record:a/<key>:<name>/<view>`
//! - server-side defaults (`creator`, `view`, boolean flags) and computed
//!   fields (`zone`, `dns_name`, `creation_time`) are filled in
//! - writes to read-only fields and changes of `view` are rejected with HTTP 400
//! - renames change the reference but keep the key
//! - searches are exact-match on fields and extensible attributes, in
//!   insertion order
//!
//! Every request is recorded so tests can assert on what was sent.

use crate::client::{RecordClient, RequestOptions};
use crate::constants::{
    CREATOR_STATIC, DEFAULT_DNS_VIEW, EXTATTR_VALUE_KEY, RECORD_A_OBJECT_TYPE,
};
use crate::errors::ClientError;
use crate::filter::RecordFilter;
use crate::identity::object_key;
use crate::wire::WireObject;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value as Json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Fields NIOS computes and refuses to accept on writes.
const READ_ONLY_FIELDS: &[&str] = &[
    "aws_rte53_record_info",
    "cloud_info",
    "creation_time",
    "discovered_data",
    "dns_name",
    "last_queried",
    "ms_ad_user_data",
    "reclaimable",
    "shared_record_group",
    "zone",
];

/// Fields accepted on writes but never stored.
const WRITE_ONLY_FIELDS: &[&str] = &["remove_associated_ptr"];

/// Boolean fields NIOS defaults to `false`.
const FALSE_BY_DEFAULT: &[&str] = &["ddns_protected", "disable", "forbid_reclamation", "use_ttl"];

/// Requests kept in the log; older entries are dropped first.
pub const REQUEST_LOG_CAPACITY: usize = 1024;

/// A request received by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// `get`, `create`, `replace`, `delete` or `list`
    pub method: &'static str,
    /// Identity addressed, if any
    pub identity: Option<String>,
    /// Body sent, if any
    pub body: Option<WireObject>,
    /// Options sent, if any
    pub options: Option<RequestOptions>,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    key: String,
    object: WireObject,
}

/// In-memory `record:a` endpoint.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<StoredRecord>>,
    requests: RwLock<VecDeque<RecordedRequest>>,
    sequence: AtomicU64,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if no record is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Full stored object, bypassing field selection.
    pub async fn snapshot(&self, identity: &str) -> Option<WireObject> {
        let key = object_key(RECORD_A_OBJECT_TYPE, identity);
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.key == key)
            .map(|record| record.object.clone())
    }

    /// Logged requests, oldest first.
    ///
    /// The log holds the last [`REQUEST_LOG_CAPACITY`] requests.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.iter().cloned().collect()
    }

    /// Empty the request log.
    pub async fn clear_requests(&self) {
        self.requests.write().await.clear();
    }

    /// The most recent request of `method`.
    pub async fn last_request(&self, method: &str) -> Option<RecordedRequest> {
        self.requests
            .read()
            .await
            .iter()
            .rev()
            .find(|request| request.method == method)
            .cloned()
    }

    async fn record_request(
        &self,
        method: &'static str,
        identity: Option<&str>,
        body: Option<&WireObject>,
        options: Option<&RequestOptions>,
    ) {
        let mut requests = self.requests.write().await;
        if requests.len() == REQUEST_LOG_CAPACITY {
            requests.pop_front();
        }
        requests.push_back(RecordedRequest {
            method,
            identity: identity.map(str::to_string),
            body: body.cloned(),
            options: options.cloned(),
        });
    }

    fn next_key(&self, name: &str, ipv4addr: &str) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        URL_SAFE_NO_PAD.encode(format!("dns.bind_a${sequence}.{name}.{ipv4addr}"))
    }
}

fn bad_request(message: impl Into<String>) -> ClientError {
    ClientError::Http {
        status: 400,
        body: message.into(),
    }
}

fn not_found(identity: &str) -> ClientError {
    ClientError::NotFound {
        reference: format!("{RECORD_A_OBJECT_TYPE}/{identity}"),
    }
}

fn reference_for(key: &str, object: &WireObject) -> String {
    let name = object.field_str("name").unwrap_or_default();
    let view = object.field_str("view").unwrap_or(DEFAULT_DNS_VIEW);
    format!("{RECORD_A_OBJECT_TYPE}/{key}:{name}/{view}")
}

fn reject_read_only(object: &WireObject) -> Result<(), ClientError> {
    match object
        .fields
        .keys()
        .find(|field| READ_ONLY_FIELDS.contains(&field.as_str()))
    {
        Some(field) => Err(bad_request(format!(
            "AdmConProtoError: Field is not writable: {field}"
        ))),
        None => Ok(()),
    }
}

fn require_string(object: &WireObject, field: &str) -> Result<String, ClientError> {
    object
        .field_str(field)
        .map(str::to_string)
        .ok_or_else(|| bad_request(format!("AdmConProtoError: Required field missing: {field}")))
}

/// Apply `_return_fields2` and `_return_as_object` to a stored object.
fn project(object: &WireObject, options: &RequestOptions) -> WireObject {
    if !options.return_as_object {
        return WireObject {
            reference: object.reference.clone(),
            fields: serde_json::Map::new(),
        };
    }
    if options.return_fields.is_empty() {
        return object.clone();
    }
    WireObject {
        reference: object.reference.clone(),
        fields: object
            .fields
            .iter()
            .filter(|(field, _)| options.return_fields.iter().any(|f| f == *field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect(),
    }
}

fn matches_filter(object: &WireObject, filter: &RecordFilter) -> bool {
    let fields_match = filter.fields.iter().all(|(field, expected)| {
        match object.field(field) {
            Some(Json::String(actual)) => actual == expected,
            Some(other) => other.to_string() == *expected,
            None => false,
        }
    });
    let extattrs_match = filter.extattrs.iter().all(|(name, expected)| {
        object
            .field("extattrs")
            .and_then(|extattrs| extattrs.get(name))
            .and_then(|extattr| extattr.get(EXTATTR_VALUE_KEY))
            .is_some_and(|actual| match actual {
                Json::String(actual) => actual == expected,
                other => other.to_string() == *expected,
            })
    });
    fields_match && extattrs_match
}

#[async_trait]
impl RecordClient for InMemoryRecordStore {
    async fn get(
        &self,
        identity: &str,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        self.record_request("get", Some(identity), None, Some(options))
            .await;
        let key = object_key(RECORD_A_OBJECT_TYPE, identity);
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.key == key)
            .map(|record| project(&record.object, options))
            .ok_or_else(|| not_found(key))
    }

    async fn create(
        &self,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        self.record_request("create", None, Some(object), Some(options))
            .await;
        reject_read_only(object)?;
        if object.reference.is_some() {
            return Err(bad_request("AdmConProtoError: Field is not writable: _ref"));
        }
        let name = require_string(object, "name")?;
        let ipv4addr = require_string(object, "ipv4addr")?;

        let mut stored = object.clone();
        for field in WRITE_ONLY_FIELDS {
            stored.fields.remove(*field);
        }
        let defaults = [
            ("creator", json!(CREATOR_STATIC)),
            ("view", json!(DEFAULT_DNS_VIEW)),
        ];
        for (field, value) in defaults {
            stored.fields.entry(field).or_insert(value);
        }
        for field in FALSE_BY_DEFAULT {
            stored.fields.entry(*field).or_insert(json!(false));
        }
        let zone = name.split_once('.').map_or("", |(_, zone)| zone).to_string();
        stored.fields.insert("zone".to_string(), json!(zone));
        stored.fields.insert("dns_name".to_string(), json!(name));
        stored.fields.insert("reclaimable".to_string(), json!(false));
        stored.fields.insert(
            "creation_time".to_string(),
            json!(chrono::Utc::now().timestamp()),
        );

        let key = self.next_key(&name, &ipv4addr);
        stored.reference = Some(reference_for(&key, &stored));
        debug!(identity = %key, name = %name, "Stored in-memory A record");

        let response = project(&stored, options);
        self.records.write().await.push(StoredRecord {
            key,
            object: stored,
        });
        Ok(response)
    }

    async fn replace(
        &self,
        identity: &str,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        self.record_request("replace", Some(identity), Some(object), Some(options))
            .await;
        reject_read_only(object)?;

        let key = object_key(RECORD_A_OBJECT_TYPE, identity);
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.key == key)
            .ok_or_else(|| not_found(key))?;

        if let Some(view) = object.field("view") {
            if record.object.field("view") != Some(view) {
                return Err(bad_request("AdmConDataError: The view of a record cannot be changed"));
            }
        }

        for (field, value) in &object.fields {
            if !WRITE_ONLY_FIELDS.contains(&field.as_str()) {
                record.object.fields.insert(field.clone(), value.clone());
            }
        }
        if let Some(name) = object.field_str("name") {
            let zone = name.split_once('.').map_or("", |(_, zone)| zone).to_string();
            record.object.fields.insert("dns_name".to_string(), json!(name));
            record.object.fields.insert("zone".to_string(), json!(zone));
        }
        record.object.reference = Some(reference_for(&record.key, &record.object));

        Ok(project(&record.object, options))
    }

    async fn delete(&self, identity: &str) -> Result<(), ClientError> {
        self.record_request("delete", Some(identity), None, None).await;
        let key = object_key(RECORD_A_OBJECT_TYPE, identity);
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.key == key)
            .ok_or_else(|| not_found(key))?;
        records.remove(position);
        Ok(())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        options: &RequestOptions,
    ) -> Result<Vec<WireObject>, ClientError> {
        self.record_request("list", None, None, Some(options)).await;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|record| matches_filter(&record.object, filter))
            .map(|record| project(&record.object, options))
            .collect())
    }
}
