//! Binding of connection references to nodes.
//!
//! Linking is the host-side step between building a model and validating
//! it: every still-unresolved connection reference is looked up among the
//! candidates computed by a [`ScopeResolver`]. References without a match
//! stay unresolved and are reported later by the validator.

use log::debug;

use swimlane_core::{
    ModelError,
    model::{ElementId, Model, ReferenceRole},
};

use crate::scope::ScopeResolver;

/// Outcome of a [`link`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    bound: usize,
    unresolved: Vec<(ElementId, ReferenceRole)>,
}

impl LinkReport {
    /// Number of references bound by this pass.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// References left unresolved, as `(connection, role)` pairs.
    pub fn unresolved(&self) -> &[(ElementId, ReferenceRole)] {
        &self.unresolved
    }
}

/// Resolve every unbound connection reference of `model`.
///
/// Already-bound references are left untouched.
///
/// # Errors
///
/// Only fails if the model is internally inconsistent, which a model built
/// with [`ModelBuilder`](swimlane_core::model::ModelBuilder) never is.
pub fn link(model: &mut Model, resolver: &ScopeResolver) -> Result<LinkReport, ModelError> {
    let mut report = LinkReport::default();

    for connection in model.connections() {
        for role in [ReferenceRole::Source, ReferenceRole::Target] {
            let Some(reference) = model.connection(connection).map(|c| c.reference(role)) else {
                continue;
            };
            if reference.is_resolved() {
                continue;
            }

            match resolver.resolve(model, connection, role) {
                Some(node) => {
                    model.bind_reference(connection, role, node)?;
                    report.bound += 1;
                }
                None => {
                    debug!(
                        connection:%,
                        role:%,
                        text = reference.text();
                        "Reference left unresolved"
                    );
                    report.unresolved.push((connection, role));
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use swimlane_core::model::{Connection, Connector, ModelBuilder, NodeKind};

    use super::*;
    use crate::scope::ScopeMode;

    #[test]
    fn test_link_binds_visible_names() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        let lane_a = b.add_lane(Some(pool), "A").unwrap();
        let lane_b = b.add_lane(Some(pool), "B").unwrap();
        let first = b.add_node(Some(lane_a), "First", NodeKind::Task(None)).unwrap();
        let second = b
            .add_node(Some(lane_b), "Second", NodeKind::Task(None))
            .unwrap();
        let flow = b
            .add_connection(
                Some(lane_a),
                Connection::new("First", Connector::Sequence, "Second"),
            )
            .unwrap();
        let mut model = b.build();

        let report = link(&mut model, &ScopeResolver::default()).unwrap();

        assert_eq!(report.bound(), 2);
        assert!(report.unresolved().is_empty());
        let connection = model.connection(flow).unwrap();
        assert_eq!(connection.source().node(), Some(first));
        assert_eq!(connection.target().node(), Some(second));
    }

    #[test]
    fn test_link_leaves_invisible_names_unresolved() {
        let mut b = ModelBuilder::new();
        let p1 = b.add_pool("P1");
        let p2 = b.add_pool("P2");
        b.add_node(Some(p1), "A", NodeKind::Task(None)).unwrap();
        b.add_node(Some(p2), "B", NodeKind::Task(None)).unwrap();
        let flow = b
            .add_connection(Some(p1), Connection::new("A", Connector::Sequence, "B"))
            .unwrap();
        let mut model = b.build();

        let report = link(&mut model, &ScopeResolver::default()).unwrap();

        assert_eq!(report.bound(), 1);
        assert_eq!(report.unresolved(), &[(flow, ReferenceRole::Target)]);
        assert!(!model.connection(flow).unwrap().target().is_resolved());
    }

    #[test]
    fn test_link_respects_lane_local_mode() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        let lane_a = b.add_lane(Some(pool), "A").unwrap();
        let lane_b = b.add_lane(Some(pool), "B").unwrap();
        b.add_node(Some(lane_a), "First", NodeKind::Task(None)).unwrap();
        b.add_node(Some(lane_b), "Second", NodeKind::Task(None))
            .unwrap();
        b.add_connection(
            Some(lane_a),
            Connection::new("First", Connector::Sequence, "Second"),
        )
        .unwrap();
        let mut model = b.build();

        let report = link(&mut model, &ScopeResolver::new(ScopeMode::LaneLocal)).unwrap();

        assert_eq!(report.bound(), 1);
        assert_eq!(report.unresolved().len(), 1);
    }

    #[test]
    fn test_link_keeps_existing_bindings() {
        let mut b = ModelBuilder::new();
        let a = b.add_node(None, "A", NodeKind::Task(None)).unwrap();
        let p = b.add_pool("P");
        let c = b.add_node(Some(p), "C", NodeKind::Task(None)).unwrap();
        let flow = b.connect(None, a, Connector::Sequence, c).unwrap();
        let mut model = b.build();

        let report = link(&mut model, &ScopeResolver::default()).unwrap();

        assert_eq!(report.bound(), 0);
        assert_eq!(model.connection(flow).unwrap().target().node(), Some(c));
    }
}
