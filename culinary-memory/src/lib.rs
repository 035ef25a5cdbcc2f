//! In-memory document storage backend for the culinary gateway.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It evaluates filters in process with the same case-insensitive substring semantics the
//! MongoDB backend gets from `$regex`, which makes it suitable for development and tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use culinary_core::gateway::DocumentGateway;
//! use culinary_memory::InMemoryStore;
//!
//! let gateway = DocumentGateway::new(InMemoryStore::new());
//! ```

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
