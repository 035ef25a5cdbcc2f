//! The document gateway: the single entry point the request layer uses to reach storage.
//!
//! A [`DocumentGateway`] is constructed once at process start around a backend and then
//! cloned into every request handler. Clones share the same backend handle; nothing in a
//! request can replace or mutate it.
//!
//! The gateway owns three policies that callers must not re-implement:
//!
//! - write timestamps (`created_at` on creation, `updated_at` on every write)
//! - singleton upserts routed through the backend's atomic primitive
//! - the public conversion of every outgoing document (see [`into_public`])

use bson::{DateTime, Document, doc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    backend::StoreBackend,
    document::{Entity, EntityExt, INTERNAL_ID, into_public},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
};

/// Field stamped with the creation time of a document.
pub const CREATED_AT: &str = "created_at";
/// Field stamped with the time of the last write to a document.
pub const UPDATED_AT: &str = "updated_at";

/// Shared, cloneable handle over a storage backend.
///
/// # Example
///
/// ```ignore
/// use culinary_core::gateway::DocumentGateway;
/// use culinary_memory::InMemoryStore;
///
/// let gateway = DocumentGateway::new(InMemoryStore::new());
/// let id = gateway.insert("recipe", doc! { "title": "Spicy Ramen" }).await?;
/// let items = gateway.find("recipe", None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct DocumentGateway {
    backend: Option<Arc<dyn StoreBackend>>,
}

impl DocumentGateway {
    /// Creates a gateway over the given backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    /// Creates a gateway with no store behind it.
    ///
    /// Every storage operation fails with [`DocumentStoreError::StorageUnavailable`].
    pub fn disconnected() -> Self {
        Self { backend: None }
    }

    /// Returns `true` if a backend is attached.
    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Returns the attached backend's name, if any.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|backend| backend.name())
    }

    fn backend(&self) -> DocumentStoreResult<&dyn StoreBackend> {
        self.backend
            .as_deref()
            .ok_or_else(|| DocumentStoreError::StorageUnavailable("no store connection".to_string()))
    }

    /// Persists a new document and returns its identifier as an opaque string.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::StorageUnavailable`] if no store is attached or the
    /// backend fails.
    pub async fn insert(&self, collection: &str, mut document: Document) -> DocumentStoreResult<String> {
        let backend = self.backend()?;
        let now = DateTime::now();

        document.remove(INTERNAL_ID);
        document.insert(CREATED_AT, now);
        document.insert(UPDATED_AT, now);

        let id = backend
            .insert_document(document, collection)
            .await
            .inspect_err(|e| warn!(collection, error = %e, "insert failed"))?;
        debug!(collection, %id, "document inserted");

        Ok(id.to_hex())
    }

    /// Persists a typed entity into its own collection.
    pub async fn insert_entity<E: Entity>(&self, entity: &E) -> DocumentStoreResult<String> {
        self.insert(E::collection_name(), entity.to_document()?).await
    }

    /// Returns every document of `collection` matching `filter`, in public form.
    ///
    /// `None` matches the whole collection. No ordering is guaranteed.
    pub async fn find(&self, collection: &str, filter: Option<Expr>) -> DocumentStoreResult<Vec<Value>> {
        let backend = self.backend()?;
        let documents = backend
            .query_documents(Query::builder().maybe_filter(filter).build(), collection)
            .await
            .inspect_err(|e| warn!(collection, error = %e, "query failed"))?;
        debug!(collection, count = documents.len(), "documents found");

        Ok(documents.into_iter().map(into_public).collect())
    }

    /// Returns the singleton document of `collection`, in public form.
    pub async fn find_singleton(&self, collection: &str) -> DocumentStoreResult<Option<Value>> {
        let document = self
            .backend()?
            .find_singleton(collection)
            .await
            .inspect_err(|e| warn!(collection, error = %e, "singleton lookup failed"))?;

        Ok(document.map(into_public))
    }

    /// Writes the only document of a singleton collection.
    ///
    /// If a document already exists its fields are overwritten in place and its identifier
    /// is returned; otherwise a new document is created. The find-or-create step is one
    /// atomic backend call.
    pub async fn replace_singleton(&self, collection: &str, mut document: Document) -> DocumentStoreResult<String> {
        let backend = self.backend()?;
        let now = DateTime::now();

        document.remove(INTERNAL_ID);
        document.remove(CREATED_AT);
        document.insert(UPDATED_AT, now);

        let id = backend
            .upsert_singleton(document, doc! { CREATED_AT: now }, collection)
            .await
            .inspect_err(|e| warn!(collection, error = %e, "singleton upsert failed"))?;
        debug!(collection, %id, "singleton written");

        Ok(id.to_hex())
    }

    /// Writes a typed entity as the singleton of its collection.
    pub async fn replace_singleton_entity<E: Entity>(&self, entity: &E) -> DocumentStoreResult<String> {
        self.replace_singleton(E::collection_name(), entity.to_document()?).await
    }

    /// Lists the collections present in the store.
    pub async fn collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend()?.list_collections().await
    }

    /// Shuts the backend down. Other clones of this gateway become unusable afterwards.
    pub async fn shutdown(&self) -> DocumentStoreResult<()> {
        match &self.backend {
            Some(backend) => backend.shutdown().await,
            None => Ok(()),
        }
    }
}
