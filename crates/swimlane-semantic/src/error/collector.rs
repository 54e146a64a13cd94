//! Collector for accumulating diagnostics during a validation pass.
//!
//! The [`DiagnosticCollector`] lets every check report any number of errors
//! and warnings without aborting the walk over the model.

use crate::error::{Diagnostic, ValidationError};

/// A collector for accumulating diagnostics.
///
/// # Example
///
/// ```
/// # use swimlane_semantic::error::{Diagnostic, DiagnosticCollector};
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(Diagnostic::warning("pool `Shop` is empty"));
///
/// let warnings = collector.finish().expect("warnings never fail validation");
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If it is an error, the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once any error-severity diagnostic was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// All collected diagnostics, regardless of severity.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ValidationError)` with all diagnostics.
    /// - If there are no errors, returns the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ValidationError> {
        if self.has_errors {
            Err(ValidationError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
