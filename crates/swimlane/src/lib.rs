//! Swimlane - A textual process-diagram language compiling to BPMN 2.0 XML.
//!
//! Reference linking, validation, layout and serialization for process
//! models built with [`ModelBuilder`](model::ModelBuilder). The output is a
//! BPMN 2.0 XML document with diagram interchange, ready for any BPMN
//! modeler.

pub mod config;

mod definitions;
mod error;
mod export;
mod identifier;
mod layout;
mod structure;

pub use swimlane_core::{ModelError, geometry, model};
pub use swimlane_semantic::{
    Diagnostic, ErrorCode, LinkReport, ScopeMode, ScopeResolver, Severity, ValidationError,
};

pub use error::SwimlaneError;
pub use export::Error as ExportError;

use log::{debug, info, trace};

use config::AppConfig;
use definitions::Definitions;
use export::{Exporter, xml::XmlExporter};
use layout::Layout;
use model::Model;
use structure::Partition;

/// Pipeline facade: link, validate and generate.
///
/// # Examples
///
/// ```rust
/// use swimlane::{Compiler, config::AppConfig};
/// use swimlane::model::{Connection, Connector, EventType, ModelBuilder, NodeKind};
///
/// let mut builder = ModelBuilder::new();
/// builder.add_node(None, "Start", NodeKind::event(EventType::Start)).unwrap();
/// builder.add_node(None, "End", NodeKind::event(EventType::End)).unwrap();
/// builder
///     .add_connection(None, Connection::new("Start", Connector::Sequence, "End"))
///     .unwrap();
/// let mut model = builder.build();
///
/// let compiler = Compiler::new(AppConfig::default());
/// compiler.link(&mut model).unwrap();
/// let xml = compiler.compile(&model).unwrap();
///
/// assert!(xml.contains(r#"<bpmn:startEvent id="Start_1" name="Start">"#));
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    config: AppConfig,
}

impl Compiler {
    /// Create a new compiler with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The scope resolver for the configured [`ScopeMode`].
    pub fn resolver(&self) -> ScopeResolver {
        ScopeResolver::new(self.config.scope().mode())
    }

    /// Bind every unresolved connection reference of `model`.
    ///
    /// # Errors
    ///
    /// Returns [`SwimlaneError::Model`] if the model is inconsistent.
    pub fn link(&self, model: &mut Model) -> Result<LinkReport, SwimlaneError> {
        let report = swimlane_semantic::link(model, &self.resolver())?;
        debug!(
            bound = report.bound(),
            unresolved = report.unresolved().len();
            "Linked references"
        );
        Ok(report)
    }

    /// Run all semantic checks, returning errors and warnings alike.
    pub fn validate(&self, model: &Model) -> Vec<Diagnostic> {
        swimlane_semantic::validate(model)
    }

    /// Validate `model` and generate its BPMN document.
    ///
    /// # Errors
    ///
    /// Returns [`SwimlaneError::Validation`] if any check reports an error;
    /// warnings alone do not stop compilation.
    pub fn compile(&self, model: &Model) -> Result<String, SwimlaneError> {
        info!(elements = model.len(); "Validating model");
        let warnings = swimlane_semantic::validate_model(model)?;
        for warning in &warnings {
            debug!(warning:%; "Validation warning");
        }
        self.generate(model)
    }

    /// Generate the BPMN document without validating.
    ///
    /// Produces a best-effort document even for invalid models.
    ///
    /// # Errors
    ///
    /// Returns [`SwimlaneError::Export`] if the XML writer fails.
    pub fn generate(&self, model: &Model) -> Result<String, SwimlaneError> {
        info!("Generating BPMN document");

        let partition = Partition::new(model);
        let layout = Layout::new(model, &partition, self.config.layout());
        let definitions = Definitions::compile(model, &partition, &layout);
        trace!(definitions:?; "Compiled definitions");

        let xml = XmlExporter::new(*self.config.export()).export_definitions(&definitions)?;

        info!(bytes = xml.len(); "BPMN document generated");
        Ok(xml)
    }
}
