//! Stable XML identifiers for model entities.
//!
//! Every identifier is built from a base, either an entity name or a fixed
//! literal such as `Process`, with every character outside `[A-Za-z0-9_]`
//! replaced by `_`, and a `_N` suffix counted per base starting at 1:
//!
//! ```text
//! "Review order"  ->  Review_order_1
//! "Review order"  ->  Review_order_2   (a second node with the same name)
//! Process         ->  Process_1
//! ```
//!
//! Identifiers of model elements are memoized by [`ElementId`], so two
//! entities never share an identifier and asking twice for the same entity
//! gives the same answer. A registry lives for one generator run only.

use indexmap::IndexMap;

use swimlane_core::model::ElementId;

/// Fixed bases for entities that have no name of their own.
pub mod base {
    pub const DEFINITIONS: &str = "Definitions";
    pub const PROCESS: &str = "Process";
    pub const COLLABORATION: &str = "Collaboration";
    pub const LANE_SET: &str = "LaneSet";
    pub const SEQUENCE_FLOW: &str = "Flow";
    pub const ASSOCIATION: &str = "Association";
    pub const MESSAGE_FLOW: &str = "MessageFlow";
    pub const DIAGRAM: &str = "BPMNDiagram";
    pub const PLANE: &str = "BPMNPlane";
}

/// Suffix appended to an element id to form its diagram shape or edge id.
pub const DI_SUFFIX: &str = "_di";

/// Per-run identifier allocator.
#[derive(Debug, Default)]
pub struct IdRegistry {
    counters: IndexMap<String, usize>,
    assigned: IndexMap<ElementId, String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of a model element, allocated from `base` on first use.
    ///
    /// Later calls for the same element return the memoized identifier and
    /// ignore `base`.
    pub fn element_id(&mut self, element: ElementId, base: &str) -> String {
        if let Some(id) = self.assigned.get(&element) {
            return id.clone();
        }
        let id = self.fresh(base);
        self.assigned.insert(element, id.clone());
        id
    }

    /// Identifier already assigned to `element`, if any.
    pub fn get(&self, element: ElementId) -> Option<&str> {
        self.assigned.get(&element).map(String::as_str)
    }

    /// A new identifier for a synthesized entity with no model element.
    pub fn fresh(&mut self, base: &str) -> String {
        let base = sanitize(base);
        let counter = self.counters.entry(base.clone()).or_insert(0);
        *counter += 1;
        format!("{base}_{counter}")
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Diagram shape or edge identifier for an element identifier.
pub fn di_id(element_id: &str) -> String {
    format!("{element_id}{DI_SUFFIX}")
}
