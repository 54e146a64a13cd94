//! The core diagnostic type for the Swimlane error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, labeled model elements, and help text.

use std::fmt;

use swimlane_core::model::ElementId;

use crate::error::{ErrorCode, Field, Label, Severity};

/// A diagnostic message pointing at elements of the model.
///
/// Diagnostics carry:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - One or more labeled elements
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E300]: duplicate node name `Review` in scope `Shop.Sales`
///   = help: rename one of the nodes
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The first primary label, which names the offending element.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|label| label.is_primary())
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(
        mut self,
        element: ElementId,
        field: Option<Field>,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::primary(element, field, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(
        mut self,
        element: ElementId,
        field: Option<Field>,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(element, field, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use swimlane_core::model::{ModelBuilder, NodeKind};

    use super::*;

    fn two_nodes() -> (ElementId, ElementId) {
        let mut builder = ModelBuilder::new();
        let a = builder.add_node(None, "A", NodeKind::Task(None)).unwrap();
        let b = builder.add_node(None, "A", NodeKind::Task(None)).unwrap();
        (a, b)
    }

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.primary_label().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let (first, second) = two_nodes();
        let diag = Diagnostic::error("duplicate node name `A` in scope `global`")
            .with_code(ErrorCode::E300)
            .with_label(second, Some(Field::Name), "duplicate definition")
            .with_secondary_label(first, Some(Field::Name), "first defined here")
            .with_help("rename one of the nodes");

        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.primary_label().unwrap().element(), second);
        assert_eq!(diag.primary_label().unwrap().field(), Some(Field::Name));
        assert_eq!(diag.help(), Some("rename one of the nodes"));
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("unresolved reference `X`").with_code(ErrorCode::E100);
        assert_eq!(with_code.to_string(), "error[E100]: unresolved reference `X`");

        let without_code = Diagnostic::warning("lane `L` is empty");
        assert_eq!(without_code.to_string(), "warning: lane `L` is empty");
    }
}
