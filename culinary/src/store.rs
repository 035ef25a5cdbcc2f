//! Backend selection for the binary.

use tracing::{info, warn};

use culinary_core::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    gateway::DocumentGateway,
};

use crate::config::{Args, StoreKind};

/// In-memory storage backend implementations.
pub mod memory {
    pub use culinary_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use culinary_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}

/// Builds the gateway described by `args`.
///
/// A missing `DATABASE_URL` is not an error: the gateway starts disconnected.
pub async fn connect(args: &Args) -> DocumentStoreResult<DocumentGateway> {
    match (args.store, args.database_url.as_deref()) {
        (StoreKind::Memory, _) => {
            info!("using in-memory store");
            Ok(DocumentGateway::new(memory::InMemoryStore::builder().build().await?))
        }
        (StoreKind::Mongodb, None) => {
            warn!("DATABASE_URL is not set; store routes will answer 503");
            Ok(DocumentGateway::disconnected())
        }
        (StoreKind::Mongodb, Some(url)) => connect_mongodb(url, &args.database_name).await,
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(url: &str, database: &str) -> DocumentStoreResult<DocumentGateway> {
    let store = mongodb::MongoDbStore::builder(url, database).build().await?;
    info!(database, "MongoDB client initialized");

    Ok(DocumentGateway::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_url: &str, _database: &str) -> DocumentStoreResult<DocumentGateway> {
    Err(culinary_core::error::DocumentStoreError::Initialization(
        "built without the `mongodb` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn memory_store_is_connected() {
        let args = Args::try_parse_from(["culinary", "--store", "memory"]).unwrap();
        let gateway = connect(&args).await.unwrap();

        assert_eq!(gateway.backend_name(), Some("memory"));
    }

    #[tokio::test]
    async fn missing_database_url_starts_disconnected() {
        let args = Args {
            database_url: None,
            database_name: "culinary".to_string(),
            store: StoreKind::Mongodb,
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            log_level: "info".to_string(),
        };
        let gateway = connect(&args).await.unwrap();

        assert!(!gateway.is_connected());
    }
}
