use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mea::rwlock::RwLock;
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions, ReturnDocument},
};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info};

use culinary_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::INTERNAL_ID,
    error::{DocumentStoreError, DocumentStoreResult},
    query::Query,
};

use crate::query::MongoQueryTranslator;

/// Marker field carried by singleton documents. A unique index on it lets the server
/// reject a second concurrent insert.
const SINGLETON_KEY: &str = "_singleton";
const DUPLICATE_KEY: i32 = 11000;

fn unavailable(err: MongoError) -> DocumentStoreError {
    DocumentStoreError::StorageUnavailable(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY,
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Unique over marked documents only, so unmarked legacy documents never collide.
fn singleton_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { SINGLETON_KEY: 1 })
        .options(
            IndexOptions::builder()
            .unique(true)
            .partial_filter_expression(doc! { SINGLETON_KEY: true })
            .build()
        )
        .build()
}

fn singleton_filter() -> Document {
    doc! { SINGLETON_KEY: true }
}

/// Filter and update that mark the first unmarked document as the singleton.
fn adoption() -> (Document, Document) {
    (
        doc! { SINGLETON_KEY: { "$exists": false } },
        doc! { "$set": { SINGLETON_KEY: true } },
    )
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
    /// Singleton collections whose index and adoption step already ran.
    prepared: Arc<RwLock<HashSet<String>>>,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self {
            client,
            database,
            prepared: Arc::default(),
        }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    /// Name of the database this store writes to.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn restore_document(mut document: Document) -> Document {
        document.remove(SINGLETON_KEY);
        document
    }

    fn object_id(document: &Document) -> DocumentStoreResult<ObjectId> {
        document
            .get_object_id(INTERNAL_ID)
            .map_err(|e| DocumentStoreError::InvalidDocument(e.to_string()))
    }

    /// Runs once per collection: creates the singleton index and marks a document written
    /// without the marker, so reads and writes agree on the same document.
    async fn prepare_singleton(&self, collection: &str) -> DocumentStoreResult<()> {
        if self.prepared.read().await.contains(collection) {
            return Ok(());
        }

        let mut prepared = self.prepared.write().await;
        if prepared.contains(collection) {
            return Ok(());
        }

        let mongo_collection = self.get_collection(collection);
        mongo_collection
            .create_index(singleton_index())
            .await
            .map_err(unavailable)?;

        let (filter, update) = adoption();
        match mongo_collection.update_one(filter, update).await {
            Ok(result) if result.modified_count > 0 => {
                info!(collection, "adopted existing document as singleton");
            }
            Ok(_) => {}
            // Another document already carries the marker.
            Err(err) if is_duplicate_key(&err) => {}
            Err(err) => return Err(unavailable(err)),
        }

        prepared.insert(collection.to_string());

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    fn name(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_document(&self, mut document: Document, collection: &str) -> DocumentStoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(INTERNAL_ID, id);

        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(unavailable)?;

        Ok(id)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }

        Ok(
            self.get_collection(collection)
                .find(MongoQueryTranslator::translate(query.filter.as_ref())?)
                .with_options(options)
                .await
                .map_err(unavailable)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(unavailable)?
                .into_iter()
                .map(Self::restore_document)
                .collect()
        )
    }

    async fn upsert_singleton(
        &self,
        set: Document,
        set_on_insert: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId> {
        self.prepare_singleton(collection).await?;

        // A path may appear in only one update operator.
        let on_insert = Document::from_iter(
            set_on_insert
                .into_iter()
                .filter(|(k, _)| !set.contains_key(k) && k != INTERNAL_ID)
        );
        let filter = singleton_filter();
        let update = doc! { "$set": set, "$setOnInsert": on_insert };
        let mongo_collection = self.get_collection(collection);

        // The upsert is atomic per call. Two racing inserts collide on the unique
        // index; the loser repeats once and then matches the winner's document.
        let mut attempt = 0;
        loop {
            attempt += 1;

            match mongo_collection
                .find_one_and_update(filter.clone(), update.clone())
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await
            {
                Ok(Some(document)) => return Self::object_id(&document),
                Ok(None) => {
                    return Err(DocumentStoreError::StorageUnavailable(format!(
                        "upsert into {collection} returned no document"
                    )));
                }
                Err(err) if attempt == 1 && is_duplicate_key(&err) => {
                    debug!(collection, "singleton insert raced, retrying as update");
                }
                Err(err) => return Err(unavailable(err)),
            }
        }
    }

    async fn find_singleton(&self, collection: &str) -> DocumentStoreResult<Option<Document>> {
        self.prepare_singleton(collection).await?;

        Ok(self
            .get_collection(collection)
            .find_one(singleton_filter())
            .await
            .map_err(unavailable)?
            .map(Self::restore_document))
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(unavailable)
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.client.clone().shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Parses the connection string and creates a client.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the first
    /// operation as [`DocumentStoreError::StorageUnavailable`].
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
