//! In-memory storage implementation for the document gateway.
//!
//! Collections are insertion-ordered vectors of BSON documents guarded by a single
//! async-aware read-write lock.

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use culinary_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::INTERNAL_ID,
    error::{DocumentStoreError, DocumentStoreResult},
    query::Query,
};

use crate::evaluator::DocumentEvaluator;

type CollectionVec = Vec<Document>;
type StoreMap = HashMap<String, CollectionVec>;

/// Process-local backend used by tests and `--store memory`.
///
/// Clones share one map. Queries scan the whole collection; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use culinary_memory::InMemoryStore;
/// use culinary_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "title": "Spicy Ramen" }, "recipe").await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

fn with_id(mut document: Document, id: ObjectId) -> Document {
    document.insert(INTERNAL_ID, id);
    document
}

fn document_id(document: &Document, collection: &str) -> DocumentStoreResult<ObjectId> {
    document.get_object_id(INTERNAL_ID).map_err(|_| {
        DocumentStoreError::InvalidDocument(format!(
            "stored document in {collection} has no ObjectId"
        ))
    })
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<ObjectId> {
        let id = ObjectId::new();

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(with_id(document, id));

        Ok(id)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let matched = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(documents, filter),
            None => documents.clone(),
        };

        Ok(matched
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn upsert_singleton(
        &self,
        set: Document,
        set_on_insert: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId> {
        // Held across the find and the write so concurrent upserts serialize.
        let mut store = self.store.write().await;
        let documents = store.entry(collection.to_string()).or_default();

        if let Some(existing) = documents.first_mut() {
            let id = document_id(existing, collection)?;
            for (key, value) in set {
                if key != INTERNAL_ID {
                    existing.insert(key, value);
                }
            }
            return Ok(id);
        }

        let id = ObjectId::new();
        let mut created = set_on_insert;
        for (key, value) in set {
            created.insert(key, value);
        }
        documents.push(with_id(created, id));

        Ok(id)
    }

    /// The first document of the collection, the one `upsert_singleton` overwrites.
    async fn find_singleton(&self, collection: &str) -> DocumentStoreResult<Option<Document>> {
        Ok(self
            .store
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.first().cloned()))
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(self.store
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
