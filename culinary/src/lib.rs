//! Culinary educational backend.
//!
//! Create/list/search endpoints for recipes, lessons, ads and videos plus a singleton
//! contact record, all served over a [`DocumentGateway`](culinary_core::gateway::DocumentGateway).
//!
//! ```ignore
//! use culinary::{routes, state::AppState, store::memory::InMemoryStore};
//! use culinary_core::gateway::DocumentGateway;
//!
//! let app = routes::router(AppState::new(DocumentGateway::new(InMemoryStore::new())));
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod filters;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
