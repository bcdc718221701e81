//! # graphdesk-core
//!
//! Core library for the Graphdesk linked-data administration console.
//!
//! This library provides:
//! - JSON-LD response normalization into a uniform, editable entity model
//! - A dual-convention API adapter over an async HTTP transport
//! - The entity view-model lifecycle (fetch/create/edit/save/delete)
//! - Server-windowed and client-sliced pagination controllers
//!
//! ## Example
//!
//! ```no_run
//! use graphdesk_core::adapter::{ApiAdapter, Endpoint};
//! use graphdesk_core::transport::HttpTransport;
//! use graphdesk_core::types::GraphContext;
//! use graphdesk_core::view_model::EntityViewModel;
//!
//! # async fn example() -> Result<(), graphdesk_core::GraphdeskError> {
//! let transport = HttpTransport::new("http://localhost:8080")?;
//! let ctx = GraphContext::new("space-1", "urn%3Agraph");
//! let mut page = EntityViewModel::new(
//!     ApiAdapter::new(transport),
//!     Endpoint::graph_object("/api/frames"),
//!     ctx,
//!     "Frame",
//!     "urn%3Ax%23a",
//! );
//! page.mount().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod debounce;
pub mod error;
pub mod naming;
pub mod normalize;
pub mod pagination;
pub mod transport;
pub mod types;
pub mod view_model;

// Re-export commonly used types
pub use adapter::{ApiAdapter, Endpoint, EndpointFamily};
pub use config::ConsoleConfig;
pub use debounce::Debouncer;
pub use error::GraphdeskError;
pub use pagination::{ClientSlice, ServerWindow};
pub use transport::{ApiTransport, HttpTransport};
pub use types::{Entity, GraphContext, ObjectKind, Property, PropertyDraft, PropertyKind};
pub use view_model::{EntityViewModel, Mode, Navigation, PropertyField};
