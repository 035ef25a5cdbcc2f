//! Document access layer for the culinary backend.
//!
//! This crate provides:
//!
//! - **Entity traits** ([`document`]) - The [`Entity`](document::Entity) trait and the public
//!   conversion applied to every outgoing document
//! - **Store backend abstraction** ([`backend`]) - The trait storage engines implement
//! - **Filtering API** ([`query`]) - A small filter AST with a visitor for backends
//! - **Gateway** ([`gateway`]) - The shared handle the request layer talks to
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use culinary_core::{gateway::DocumentGateway, query::Filter};
//!
//! let gateway = DocumentGateway::new(backend);
//! let id = gateway.insert_entity(&recipe).await?;
//! let ramen = gateway
//!     .find("recipe", Some(Filter::contains("title", "ramen")))
//!     .await?;
//! ```

pub mod backend;
pub mod document;
pub mod error;
pub mod gateway;
pub mod query;
