// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI HTTP adapter.
//!
//! [`WapiClient`] implements [`RecordClient`] over the NIOS WAPI REST API with
//! `reqwest`. It is a thin adapter: one HTTP request per call, no retries, no
//! timeout of its own. 404 answers map to [`ClientError::NotFound`]; every other
//! failure keeps its kind (HTTP status, timeout, transport, decode).
//!
//! # Example
//!
//! ```rust,no_run
//! use nios_provider::config::ProviderSettings;
//! use nios_provider::wapi::WapiClient;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ProviderSettings::from_env().resolve()?;
//! let client = WapiClient::new(&config)?;
//! # Ok(())
//! # }
//! ```

use crate::client::{RecordClient, RequestOptions};
use crate::config::ProviderConfig;
use crate::constants::{
    PARAM_RETURN_AS_OBJECT, PARAM_RETURN_FIELDS, RECORD_A_OBJECT_TYPE, WAPI_PATH_PREFIX,
};
use crate::errors::ClientError;
use crate::filter::RecordFilter;
use crate::identity::object_key;
use crate::wire::{objects_from_payload, unwrap_result, WireObject};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::Value as Json;
use tracing::{debug, error, info};
use url::Url;

/// Build the WAPI base URL, e.g. `https://gm.example.com/wapi/v2.13.6/`.
///
/// # Errors
///
/// Returns an error if the host URL cannot be parsed or cannot carry a path.
pub fn build_base_url(host_url: &str, wapi_version: &str) -> Result<Url> {
    let host = host_url.trim_end_matches('/');
    let url = Url::parse(&format!("{host}/{WAPI_PATH_PREFIX}/{wapi_version}/"))
        .with_context(|| format!("Invalid NIOS host URL '{host_url}'"))?;
    if url.cannot_be_a_base() {
        bail!("NIOS host URL '{host_url}' cannot carry a path");
    }
    Ok(url)
}

/// `Authorization` header value for a `username:password` credential.
#[must_use]
pub fn basic_authorization(credential: &str) -> String {
    format!("Basic {}", STANDARD.encode(credential))
}

/// WAPI client for one object type.
#[derive(Debug, Clone)]
pub struct WapiClient {
    http: HttpClient,
    base_url: Url,
    authorization: String,
    object_type: &'static str,
}

impl WapiClient {
    /// Create a client for DNS A records.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(config.client_name.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_http_client(config, http)
    }

    /// Create a client that sends requests through `http`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_http_client(config: &ProviderConfig, http: HttpClient) -> Result<Self> {
        Ok(Self {
            http,
            base_url: build_base_url(&config.host_url, &config.wapi_version)?,
            authorization: basic_authorization(&config.auth),
            object_type: RECORD_A_OBJECT_TYPE,
        })
    }

    /// Base URL all requests are relative to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.object_type);
        }
        url
    }

    fn object_url(&self, identity: &str) -> Url {
        let mut url = self.collection_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(object_key(self.object_type, identity));
        }
        url
    }

    fn with_query(mut url: Url, filter: Option<&RecordFilter>, options: &RequestOptions) -> Url {
        let mut pairs = filter.map(RecordFilter::query_pairs).unwrap_or_default();
        if !options.return_fields.is_empty() {
            pairs.push((PARAM_RETURN_FIELDS.to_string(), options.return_fields.join(",")));
        }
        if options.return_as_object {
            pairs.push((PARAM_RETURN_AS_OBJECT.to_string(), "1".to_string()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&WireObject>,
    ) -> Result<String, ClientError> {
        info!(
            method = %method,
            url = %url,
            body = ?body,
            "WAPI request"
        );

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, self.authorization.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&url, &e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(method = %method, url = %url, "WAPI object not found");
            return Err(ClientError::NotFound {
                reference: url.path().to_string(),
            });
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %body,
                "WAPI request failed"
            );
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&url, &e))?;

        debug!(
            method = %method,
            url = %url,
            status = %status,
            response_len = text.len(),
            "WAPI request successful"
        );

        Ok(text)
    }
}

fn transport_error(url: &Url, error: &reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
        }
    } else {
        ClientError::Transport {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

fn parse_payload(url: &Url, text: &str, options: &RequestOptions) -> Result<Json, ClientError> {
    let decode = |reason: String| ClientError::Decode {
        url: url.to_string(),
        reason,
    };
    let payload: Json = serde_json::from_str(text).map_err(|e| decode(e.to_string()))?;
    if options.return_as_object {
        unwrap_result(payload).map_err(decode)
    } else {
        Ok(payload)
    }
}

fn decode_object(
    url: &Url,
    text: &str,
    options: &RequestOptions,
) -> Result<WireObject, ClientError> {
    let payload = parse_payload(url, text, options)?;
    WireObject::from_payload(payload).map_err(|reason| ClientError::Decode {
        url: url.to_string(),
        reason,
    })
}

#[async_trait]
impl RecordClient for WapiClient {
    async fn get(
        &self,
        identity: &str,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        let url = Self::with_query(self.object_url(identity), None, options);
        let text = self.send(Method::GET, url.clone(), None).await?;
        decode_object(&url, &text, options)
    }

    async fn create(
        &self,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        let url = Self::with_query(self.collection_url(), None, options);
        let text = self.send(Method::POST, url.clone(), Some(object)).await?;
        decode_object(&url, &text, options)
    }

    async fn replace(
        &self,
        identity: &str,
        object: &WireObject,
        options: &RequestOptions,
    ) -> Result<WireObject, ClientError> {
        let url = Self::with_query(self.object_url(identity), None, options);
        let text = self.send(Method::PUT, url.clone(), Some(object)).await?;
        decode_object(&url, &text, options)
    }

    async fn delete(&self, identity: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, self.object_url(identity), None)
            .await
            .map(|_| ())
    }

    async fn list(
        &self,
        filter: &RecordFilter,
        options: &RequestOptions,
    ) -> Result<Vec<WireObject>, ClientError> {
        let url = Self::with_query(self.collection_url(), Some(filter), options);
        let text = self.send(Method::GET, url.clone(), None).await?;
        let payload = parse_payload(&url, &text, options)?;
        objects_from_payload(payload).map_err(|reason| ClientError::Decode {
            url: url.to_string(),
            reason,
        })
    }
}
