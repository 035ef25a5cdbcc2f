//! MongoDB backend implementation for the culinary gateway.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Filters are translated into native queries (`$regex` with the `i` option for substring
//! search), so matching runs inside the database.
//!
//! # Example
//!
//! ```ignore
//! use culinary_core::backend::StoreBackendBuilder;
//! use culinary_mongodb::MongoDbStore;
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "culinary")
//!     .build()
//!     .await?;
//! ```

pub mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
