// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for resource module
//!
//! Lifecycle operations run against the in-memory store; failure paths use a
//! client that answers every call with a fixed error.

#[cfg(test)]
mod tests {
    use crate::client::{RecordClient, RequestOptions};
    use crate::errors::{ClientError, ControllerError, ConversionError, Operation};
    use crate::filter::RecordFilter;
    use crate::memory::InMemoryRecordStore;
    use crate::resource::*;
    use crate::value::ValueTree;
    use crate::wire::WireObject;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Client whose every call fails with the same error.
    #[derive(Debug)]
    struct FailingClient(ClientError);

    #[async_trait]
    impl RecordClient for FailingClient {
        async fn get(&self, _: &str, _: &RequestOptions) -> Result<WireObject, ClientError> {
            Err(self.0.clone())
        }

        async fn create(
            &self,
            _: &WireObject,
            _: &RequestOptions,
        ) -> Result<WireObject, ClientError> {
            Err(self.0.clone())
        }

        async fn replace(
            &self,
            _: &str,
            _: &WireObject,
            _: &RequestOptions,
        ) -> Result<WireObject, ClientError> {
            Err(self.0.clone())
        }

        async fn delete(&self, _: &str) -> Result<(), ClientError> {
            Err(self.0.clone())
        }

        async fn list(
            &self,
            _: &RecordFilter,
            _: &RequestOptions,
        ) -> Result<Vec<WireObject>, ClientError> {
            Err(self.0.clone())
        }
    }

    /// Client that answers creates with a fixed object.
    #[derive(Debug)]
    struct FixedCreateClient(WireObject);

    #[async_trait]
    impl RecordClient for FixedCreateClient {
        async fn get(&self, _: &str, _: &RequestOptions) -> Result<WireObject, ClientError> {
            Ok(self.0.clone())
        }

        async fn create(
            &self,
            _: &WireObject,
            _: &RequestOptions,
        ) -> Result<WireObject, ClientError> {
            Ok(self.0.clone())
        }

        async fn replace(
            &self,
            _: &str,
            _: &WireObject,
            _: &RequestOptions,
        ) -> Result<WireObject, ClientError> {
            Ok(self.0.clone())
        }

        async fn delete(&self, _: &str) -> Result<(), ClientError> {
            Ok(())
        }

        async fn list(
            &self,
            _: &RecordFilter,
            _: &RequestOptions,
        ) -> Result<Vec<WireObject>, ClientError> {
            Ok(vec![self.0.clone()])
        }
    }

    fn not_found() -> ClientError {
        ClientError::NotFound {
            reference: "record:a/gone".to_string(),
        }
    }

    fn server_error() -> ClientError {
        ClientError::Http {
            status: 500,
            body: "internal error".to_string(),
        }
    }

    fn with_store() -> (Arc<InMemoryRecordStore>, RecordAResource) {
        let store = Arc::new(InMemoryRecordStore::new());
        let resource = RecordAResource::new(store.clone());
        (store, resource)
    }

    fn config() -> ValueTree {
        ValueTree::new()
            .with("name", "host.example.com")
            .with("ipv4addr", "10.0.0.20")
    }

    // ============================================================================
    // Create
    // ============================================================================

    #[tokio::test]
    async fn test_create_returns_remote_state() {
        let (_, resource) = with_store();
        let state = resource.create(&config().with("comment", "web")).await.unwrap();

        assert!(state.get_str("id").is_some());
        assert!(state.get_str("ref").unwrap().starts_with("record:a/"));
        assert_eq!(state.get_str("comment"), Some("web"));
        assert_eq!(state.get_str("zone"), Some("example.com"));
        assert_eq!(state.get_str("view"), Some("default"));
        assert_eq!(state.get_str("creator"), Some("STATIC"));
        assert!(state.unknown_attributes().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_defaults_and_return_fields() {
        let (store, resource) = with_store();
        resource.create(&config()).await.unwrap();

        let request = store.last_request("create").await.unwrap();
        let body = request.body.unwrap();
        assert_eq!(body.field_str("creator"), Some("STATIC"));
        assert_eq!(body.field("use_ttl"), Some(&json!(false)));
        assert!(body.field("comment").is_none());

        let options = request.options.unwrap();
        assert!(options.return_as_object);
        assert!(options.return_fields.iter().any(|f| f == "zone"));
    }

    #[tokio::test]
    async fn test_create_validation_error_makes_no_call() {
        let (store, resource) = with_store();
        let error = resource.create(&config().with("ttl", 300)).await.unwrap_err();

        assert!(error.is_validation());
        assert_eq!(error.operation(), Operation::Create);
        assert!(store.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_carries_write_only_value() {
        let (store, resource) = with_store();
        let state = resource
            .create(&config().with("remove_associated_ptr", true))
            .await
            .unwrap();

        assert_eq!(state.get_bool("remove_associated_ptr"), Some(true));
        let identity = state.get_str("id").unwrap();
        assert!(store.snapshot(identity).await.unwrap().field("remove_associated_ptr").is_none());
    }

    #[tokio::test]
    async fn test_create_unknown_optional_is_resolved_by_remote() {
        let (_, resource) = with_store();
        let state = resource.create(&config().with_unknown("comment")).await.unwrap();

        assert!(state.get("comment").is_null());
        assert!(state.unknown_attributes().is_empty());
    }

    #[tokio::test]
    async fn test_create_from_plan_with_unknown_computed_values() {
        let (store, resource) = with_store();
        let planned = resource
            .plan(Operation::Create, &config().with("view", "default"))
            .unwrap()
            .with_unknown("ref")
            .with_unknown("id")
            .with_unknown("zone")
            .with_unknown("creation_time");

        let state = resource.create(&planned).await.unwrap();

        assert_eq!(state.get_str("zone"), Some("example.com"));
        assert!(state.get_i32("creation_time").is_some());
        assert!(state.unknown_attributes().is_empty());
        let body = store.last_request("create").await.unwrap().body.unwrap();
        assert!(body.field("zone").is_none());
        assert!(body.field("creation_time").is_none());
    }

    #[tokio::test]
    async fn test_create_remote_error() {
        let resource = RecordAResource::new(Arc::new(FailingClient(server_error())));
        let error = resource.create(&config()).await.unwrap_err();

        assert_eq!(
            error,
            ControllerError::Remote {
                operation: Operation::Create,
                source: server_error(),
            }
        );
        assert!(error.to_string().starts_with("Unable to create A record, got error:"));
    }

    #[tokio::test]
    async fn test_create_malformed_reference() {
        let response =
            WireObject::from_reference("record:a").with_field("name", "host.example.com");
        let resource = RecordAResource::new(Arc::new(FixedCreateClient(response)));

        let error = resource.create(&config()).await.unwrap_err();
        assert!(matches!(
            error,
            ControllerError::Conversion {
                operation: Operation::Create,
                source: ConversionError::MalformedReference { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_create_missing_reference() {
        let response = WireObject::default().with_field("name", "host.example.com");
        let resource = RecordAResource::new(Arc::new(FixedCreateClient(response)));

        let error = resource.create(&config()).await.unwrap_err();
        assert!(matches!(
            error,
            ControllerError::Conversion {
                source: ConversionError::MissingReference,
                ..
            }
        ));
    }

    // ============================================================================
    // Read
    // ============================================================================

    #[tokio::test]
    async fn test_read_present() {
        let (_, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        let outcome = resource.read(identity).await.unwrap();
        assert_eq!(outcome, ReadOutcome::Present(created.clone()));
    }

    #[tokio::test]
    async fn test_read_deleted_out_of_band_is_absent() {
        let (store, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        store.delete(identity).await.unwrap();

        let outcome = resource.read(identity).await.unwrap();
        assert!(outcome.is_absent());
        assert_eq!(outcome.into_tree(), None);
    }

    #[tokio::test]
    async fn test_read_other_errors_propagate() {
        let resource = RecordAResource::new(Arc::new(FailingClient(server_error())));
        let error = resource.read("ZG5z").await.unwrap_err();

        assert_eq!(error.operation(), Operation::Read);
        assert!(!error.is_validation());
    }

    #[tokio::test]
    async fn test_refresh_keeps_write_only_from_prior() {
        let (_, resource) = with_store();
        let created = resource
            .create(&config().with("remove_associated_ptr", true))
            .await
            .unwrap();

        let refreshed = resource.refresh(&created).await.unwrap().into_tree().unwrap();
        assert_eq!(refreshed.get_bool("remove_associated_ptr"), Some(true));

        let read = resource
            .read(created.get_str("id").unwrap())
            .await
            .unwrap()
            .into_tree()
            .unwrap();
        assert!(read.get("remove_associated_ptr").is_null());
    }

    #[tokio::test]
    async fn test_refresh_without_identity() {
        let (_, resource) = with_store();
        let error = resource.refresh(&ValueTree::new()).await.unwrap_err();
        assert!(error.is_validation());
    }

    // ============================================================================
    // Update
    // ============================================================================

    #[tokio::test]
    async fn test_update_applies_changes() {
        let (_, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        let updated = resource
            .update(
                identity,
                &config()
                    .with("comment", "changed")
                    .with("ttl", 60)
                    .with("use_ttl", true),
            )
            .await
            .unwrap();

        assert_eq!(updated.get_str("comment"), Some("changed"));
        assert_eq!(updated.get_i32("ttl"), Some(60));
        assert_eq!(updated.get_str("id"), Some(identity));
    }

    #[tokio::test]
    async fn test_update_from_returned_state() {
        let (store, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        let updated = resource
            .update(identity, &created.clone().with("comment", "changed"))
            .await
            .unwrap();

        assert_eq!(updated.get_str("comment"), Some("changed"));
        assert_eq!(updated.get_str("dns_name"), created.get_str("dns_name"));
        assert_eq!(updated.get("creation_time"), created.get("creation_time"));
        let body = store.last_request("replace").await.unwrap().body.unwrap();
        for computed in ["creation_time", "dns_name", "zone", "reclaimable"] {
            assert!(body.field(computed).is_none(), "{computed} was sent");
        }
    }

    #[tokio::test]
    async fn test_update_never_sends_view() {
        let (store, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        let updated = resource
            .update(identity, &config().with("view", "internal"))
            .await
            .unwrap();

        let body = store.last_request("replace").await.unwrap().body.unwrap();
        assert!(body.field("view").is_none());
        assert_eq!(updated.get_str("view"), Some("default"));
    }

    #[tokio::test]
    async fn test_update_not_found_is_error() {
        let resource = RecordAResource::new(Arc::new(FailingClient(not_found())));
        let error = resource.update("gone", &config()).await.unwrap_err();

        assert_eq!(
            error,
            ControllerError::Remote {
                operation: Operation::Update,
                source: not_found(),
            }
        );
    }

    #[tokio::test]
    async fn test_update_validation_error() {
        let (store, resource) = with_store();
        let error = resource
            .update("ZG5z", &config().with("use_ttl", true))
            .await
            .unwrap_err();

        assert!(error.is_validation());
        assert_eq!(error.operation(), Operation::Update);
        assert!(store.requests().await.is_empty());
    }

    // ============================================================================
    // Delete and Import
    // ============================================================================

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        resource.delete(identity).await.unwrap();
        assert!(store.is_empty().await);
        resource.delete(identity).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_other_errors_propagate() {
        let resource = RecordAResource::new(Arc::new(FailingClient(server_error())));
        let error = resource.delete("ZG5z").await.unwrap_err();
        assert_eq!(error.operation(), Operation::Delete);
    }

    #[tokio::test]
    async fn test_import_then_read() {
        let (_, resource) = with_store();
        let created = resource.create(&config()).await.unwrap();
        let identity = created.get_str("id").unwrap();

        let imported = resource.import(identity).unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported.get_str("id"), Some(identity));

        let state = resource.refresh(&imported).await.unwrap().into_tree().unwrap();
        assert_eq!(state.get_str("name"), Some("host.example.com"));
        assert_eq!(state, created);
    }

    #[tokio::test]
    async fn test_import_empty_identity() {
        let (_, resource) = with_store();
        let error = resource.import("  ").unwrap_err();

        assert!(error.is_validation());
        assert_eq!(error.operation(), Operation::Import);
    }

    #[test]
    fn test_plan_fills_defaults() {
        let (_, resource) = with_store();
        let planned = resource.plan(Operation::Create, &config()).unwrap();
        assert_eq!(planned.get_str("creator"), Some("STATIC"));
    }

    #[test]
    fn test_plan_rejects_known_computed_value() {
        let (_, resource) = with_store();
        let error = resource
            .plan(Operation::Create, &config().with("zone", "example.com"))
            .unwrap_err();

        assert!(error.is_validation());
        assert_eq!(error.to_diagnostics().len(), 1);
    }
}
