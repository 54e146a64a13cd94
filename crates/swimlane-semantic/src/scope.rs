//! Reference scoping for connection endpoints.
//!
//! The [`ScopeResolver`] answers one question: which nodes may a connection
//! endpoint bind to? It deliberately over-approximates. Whether a particular
//! source/target pairing is legal (for example "message flows must cross
//! pools") is decided by the validator, not here.
//!
//! # Rules
//!
//! | Connector      | Enclosing container | Candidates                              |
//! |----------------|---------------------|-----------------------------------------|
//! | message flow   | any                 | every node inside any pool              |
//! | other          | none                | nodes directly at the top level         |
//! | other          | pool                | every node inside that pool             |
//! | other          | lane                | every node inside the lane's pool       |
//!
//! The legacy [`ScopeMode::LaneLocal`] mode narrows the lane row to the lane
//! itself and gives message flows no candidates at all.

use log::trace;
use serde::Deserialize;

use swimlane_core::model::{Element, ElementId, Model, ReferenceRole};

/// How connection references inside lanes and message flows are scoped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Lanes are transparent: a connection sees its whole pool, and message
    /// flows see every pooled node.
    #[default]
    PoolWide,

    /// Deprecated behavior: a connection inside a lane sees only that lane,
    /// and message flows resolve nothing.
    LaneLocal,
}

/// Computes candidate node sets for connection references.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver {
    mode: ScopeMode,
}

impl ScopeResolver {
    pub fn new(mode: ScopeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Nodes the `role` end of `connection` may bind to.
    ///
    /// Both ends of a connection share one scope. Candidates are listed
    /// depth-first in declaration order; nodes with equal names are all kept.
    /// Returns an empty set if `connection` is not a connection.
    pub fn candidates(
        &self,
        model: &Model,
        connection: ElementId,
        role: ReferenceRole,
    ) -> Vec<ElementId> {
        let Some(conn) = model.connection(connection) else {
            return Vec::new();
        };

        let candidates = if conn.connector().is_message_flow() {
            self.message_flow_scope(model)
        } else {
            self.container_scope(model, connection)
        };

        trace!(
            connection:%,
            role:%,
            mode:? = self.mode,
            count = candidates.len();
            "Computed reference scope"
        );
        candidates
    }

    /// The first candidate named like the reference text, if any.
    pub fn resolve(
        &self,
        model: &Model,
        connection: ElementId,
        role: ReferenceRole,
    ) -> Option<ElementId> {
        let text = model.connection(connection)?.reference(role).text();
        self.candidates(model, connection, role)
            .into_iter()
            .find(|candidate| model.name(*candidate) == Some(text))
    }

    fn message_flow_scope(&self, model: &Model) -> Vec<ElementId> {
        match self.mode {
            ScopeMode::PoolWide => model
                .pools()
                .flat_map(|pool| model.nodes_within(pool))
                .collect(),
            ScopeMode::LaneLocal => Vec::new(),
        }
    }

    fn container_scope(&self, model: &Model, connection: ElementId) -> Vec<ElementId> {
        let Some(container) = model.enclosing_container(connection) else {
            return model
                .root()
                .iter()
                .copied()
                .filter(|id| model.node(*id).is_some())
                .collect();
        };

        match (model.element(container), self.mode) {
            (Some(Element::Lane(_)), ScopeMode::PoolWide) => model
                .enclosing_pool(container)
                .map(|pool| model.nodes_within(pool))
                .unwrap_or_default(),
            _ => model.nodes_within(container),
        }
    }
}

#[cfg(test)]
mod tests {
    use swimlane_core::model::{
        Connection, Connector, EventType, ModelBuilder, NodeKind, TaskType,
    };

    use super::*;

    struct Fixture {
        model: Model,
        global_start: ElementId,
        global_end: ElementId,
        p1_a: ElementId,
        p1_b: ElementId,
        p2_c: ElementId,
        global_flow: ElementId,
        lane_flow: ElementId,
        pool_flow: ElementId,
        message: ElementId,
    }

    /// ```text
    /// Start
    /// P1 { L1 { A }  L2 { B }  lane_flow in L1 }
    /// P2 { C  pool_flow }
    /// global_flow, message
    /// ```
    fn fixture() -> Fixture {
        let mut b = ModelBuilder::new();
        let global_start = b
            .add_node(None, "Start", NodeKind::event(EventType::Start))
            .unwrap();
        let p1 = b.add_pool("P1");
        let l1 = b.add_lane(Some(p1), "L1").unwrap();
        let p1_a = b.add_node(Some(l1), "A", NodeKind::task(TaskType::User)).unwrap();
        let l2 = b.add_lane(Some(p1), "L2").unwrap();
        let nested = b.add_lane(Some(l2), "Inner").unwrap();
        let p1_b = b.add_node(Some(nested), "B", NodeKind::Task(None)).unwrap();
        let lane_flow = b
            .add_connection(Some(l1), Connection::new("A", Connector::Sequence, "B"))
            .unwrap();
        let p2 = b.add_pool("P2");
        let p2_c = b.add_node(Some(p2), "C", NodeKind::Gateway(None)).unwrap();
        let pool_flow = b
            .add_connection(Some(p2), Connection::new("C", Connector::Association, "C"))
            .unwrap();
        let global_end = b
            .add_node(None, "End", NodeKind::event(EventType::End))
            .unwrap();
        let global_flow = b
            .add_connection(None, Connection::new("Start", Connector::Sequence, "End"))
            .unwrap();
        let message = b
            .add_connection(None, Connection::new("A", Connector::Message, "C"))
            .unwrap();

        Fixture {
            model: b.build(),
            global_start,
            global_end,
            p1_a,
            p1_b,
            p2_c,
            global_flow,
            lane_flow,
            pool_flow,
            message,
        }
    }

    fn sorted(mut ids: Vec<ElementId>) -> Vec<ElementId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_global_scope_excludes_pools() {
        let f = fixture();
        let resolver = ScopeResolver::default();

        let candidates = resolver.candidates(&f.model, f.global_flow, ReferenceRole::Source);
        assert_eq!(
            sorted(candidates),
            sorted(vec![f.global_start, f.global_end])
        );
    }

    #[test]
    fn test_lane_sees_whole_pool() {
        let f = fixture();
        let resolver = ScopeResolver::new(ScopeMode::PoolWide);

        let candidates = resolver.candidates(&f.model, f.lane_flow, ReferenceRole::Target);
        assert_eq!(sorted(candidates), sorted(vec![f.p1_a, f.p1_b]));
        assert_eq!(
            resolver.resolve(&f.model, f.lane_flow, ReferenceRole::Target),
            Some(f.p1_b)
        );
    }

    #[test]
    fn test_pool_scope() {
        let f = fixture();
        let resolver = ScopeResolver::default();

        let candidates = resolver.candidates(&f.model, f.pool_flow, ReferenceRole::Source);
        assert_eq!(candidates, vec![f.p2_c]);
    }

    #[test]
    fn test_message_flow_sees_all_pooled_nodes() {
        let f = fixture();
        let resolver = ScopeResolver::default();

        let candidates = resolver.candidates(&f.model, f.message, ReferenceRole::Source);
        assert_eq!(sorted(candidates), sorted(vec![f.p1_a, f.p1_b, f.p2_c]));
        assert_eq!(
            resolver.resolve(&f.model, f.message, ReferenceRole::Target),
            Some(f.p2_c)
        );
    }

    #[test]
    fn test_lane_local_mode() {
        let f = fixture();
        let resolver = ScopeResolver::new(ScopeMode::LaneLocal);

        let candidates = resolver.candidates(&f.model, f.lane_flow, ReferenceRole::Target);
        assert_eq!(candidates, vec![f.p1_a]);
        assert_eq!(
            resolver.resolve(&f.model, f.lane_flow, ReferenceRole::Target),
            None
        );
        assert!(
            resolver
                .candidates(&f.model, f.message, ReferenceRole::Source)
                .is_empty()
        );
    }

    #[test]
    fn test_non_connection_has_no_scope() {
        let f = fixture();
        let resolver = ScopeResolver::default();

        assert!(
            resolver
                .candidates(&f.model, f.p1_a, ReferenceRole::Source)
                .is_empty()
        );
    }

    #[test]
    fn test_duplicate_names_are_independent_candidates() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        let lane = b.add_lane(Some(pool), "L").unwrap();
        let first = b.add_node(Some(pool), "X", NodeKind::Task(None)).unwrap();
        let second = b.add_node(Some(lane), "X", NodeKind::Task(None)).unwrap();
        let flow = b
            .add_connection(Some(lane), Connection::new("X", Connector::Sequence, "X"))
            .unwrap();
        let model = b.build();

        let resolver = ScopeResolver::default();
        let candidates = resolver.candidates(&model, flow, ReferenceRole::Source);
        assert_eq!(sorted(candidates), sorted(vec![first, second]));
    }

    #[test]
    fn test_scope_mode_deserializes_kebab_case() {
        use serde::de::{IntoDeserializer, value::Error};

        let deserializer: serde::de::value::StrDeserializer<'_, Error> =
            "lane-local".into_deserializer();
        assert_eq!(
            ScopeMode::deserialize(deserializer).unwrap(),
            ScopeMode::LaneLocal
        );
    }
}
