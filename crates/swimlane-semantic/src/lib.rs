//! Semantic analysis for Swimlane process models.
//!
//! This crate sits between model construction and BPMN generation:
//!
//! - [`scope`] decides which nodes a connection endpoint may refer to
//! - [`link`] binds references using those scopes
//! - [`validate`] checks the linked model and reports [`Diagnostic`]s
//!
//! # Example
//!
//! ```
//! use swimlane_core::model::{Connection, Connector, EventType, ModelBuilder, NodeKind};
//! use swimlane_semantic::{ScopeResolver, link, validate};
//!
//! let mut builder = ModelBuilder::new();
//! builder.add_node(None, "Start", NodeKind::event(EventType::Start)).unwrap();
//! builder.add_node(None, "End", NodeKind::event(EventType::End)).unwrap();
//! builder
//!     .add_connection(None, Connection::new("Start", Connector::Sequence, "End"))
//!     .unwrap();
//!
//! let mut model = builder.build();
//! link(&mut model, &ScopeResolver::default()).unwrap();
//! assert!(validate(&model).is_empty());
//! ```

pub mod error;
pub mod link;
pub mod scope;
pub mod validate;

pub use error::{Diagnostic, ErrorCode, Severity, ValidationError};
pub use link::{LinkReport, link};
pub use scope::{ScopeMode, ScopeResolver};
pub use validate::{validate, validate_model};
