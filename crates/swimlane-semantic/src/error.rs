//! Error and diagnostic system for Swimlane semantic analysis.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Labels pointing at model elements and their fields
//! - Severity levels
//! - A diagnostic collector for accumulating results of independent checks
//!
//! # Example
//!
//! ```
//! # use swimlane_core::model::{ModelBuilder, NodeKind};
//! # use swimlane_semantic::error::{Diagnostic, ErrorCode, Field};
//! let mut builder = ModelBuilder::new();
//! let first = builder.add_node(None, "Review", NodeKind::Task(None)).unwrap();
//! let second = builder.add_node(None, "Review", NodeKind::Task(None)).unwrap();
//!
//! let diag = Diagnostic::error("duplicate node name `Review` in scope `global`")
//!     .with_code(ErrorCode::E300)
//!     .with_label(second, Some(Field::Name), "duplicate definition")
//!     .with_secondary_label(first, Some(Field::Name), "first defined here")
//!     .with_help("rename one of the nodes");
//! assert!(diag.severity().is_error());
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;
mod validation_error;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Field, Label};
pub use severity::Severity;
pub use validation_error::ValidationError;
