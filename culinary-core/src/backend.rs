//! Storage backend abstraction for the document gateway.
//!
//! The [`StoreBackend`] trait is the only place raw storage operations are issued.
//! Implementations must be thread-safe and callable concurrently from many requests
//! through a shared handle; no method takes `&mut self`.
//!
//! Documents cross this boundary as [`bson::Document`]s. Every stored document carries
//! its identifier under `_id`, and backends return documents with that field intact so
//! the gateway can apply the public conversion uniformly.

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// # Error Handling
///
/// Connectivity or driver failures must be reported as
/// [`DocumentStoreError::StorageUnavailable`](crate::error::DocumentStoreError::StorageUnavailable).
/// Backends do not retry connectivity failures.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Short backend identifier used in diagnostics (e.g. `"memory"`, `"mongodb"`).
    fn name(&self) -> &'static str;

    /// Inserts a document into a collection, assigning it a fresh `_id`.
    ///
    /// Any `_id` already present in `document` is replaced. The collection is created
    /// implicitly if it doesn't exist.
    ///
    /// # Returns
    ///
    /// The identifier assigned to the new document.
    async fn insert_document(
        &self,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId>;

    /// Queries documents in a collection.
    ///
    /// Documents are returned in storage-native order. A missing collection yields an
    /// empty result, not an error.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Overwrites the fields of the single document held by `collection`, creating it
    /// when the collection is empty.
    ///
    /// The find-or-create step is a single atomic storage operation: two concurrent calls
    /// against an empty collection must still leave exactly one document behind.
    ///
    /// # Arguments
    ///
    /// * `set` - Fields written on every call
    /// * `set_on_insert` - Additional fields written only when the document is created
    /// * `collection` - The singleton collection
    ///
    /// # Returns
    ///
    /// The identifier of the (possibly pre-existing) document.
    async fn upsert_singleton(
        &self,
        set: Document,
        set_on_insert: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId>;

    /// Returns the document `upsert_singleton` writes to in `collection`, if any.
    ///
    /// Reads and singleton writes must agree on which document this is.
    async fn find_singleton(&self, collection: &str) -> DocumentStoreResult<Option<Document>>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Releases connections and other resources held by the backend.
    async fn shutdown(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
