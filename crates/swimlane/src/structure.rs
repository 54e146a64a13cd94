//! Partitioning of a model into process groups.
//!
//! A BPMN document holds one process per participant plus, optionally, a
//! process for everything declared outside of pools:
//!
//! ```text
//! root ─┬─ Start, End, Start --> End   ─▶ global group
//!       ├─ Pool "Shop" { lanes... }    ─▶ group "Shop"
//!       ├─ Pool "Idle" { }             ─▶ (nothing)
//!       └─ A ~> B                      ─▶ message flows
//! ```
//!
//! Message flows never belong to a group; they are collected separately in
//! tree order wherever they were declared.

use log::debug;

use swimlane_core::model::{Element, ElementId, Model};

/// The nodes and non-message connections of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessGroup {
    pool: Option<ElementId>,
    nodes: Vec<ElementId>,
    flows: Vec<ElementId>,
}

impl ProcessGroup {
    fn new(pool: Option<ElementId>) -> Self {
        Self {
            pool,
            nodes: Vec::new(),
            flows: Vec::new(),
        }
    }

    /// The pool this group was collected from, `None` for the global group.
    pub fn pool(&self) -> Option<ElementId> {
        self.pool
    }

    /// Nodes in tree order, lanes flattened.
    pub fn nodes(&self) -> &[ElementId] {
        &self.nodes
    }

    /// Sequence flows and associations in tree order.
    pub fn flows(&self) -> &[ElementId] {
        &self.flows
    }

    fn collect(&mut self, model: &Model, id: ElementId, message_flows: &mut Vec<ElementId>) {
        match model.element(id) {
            Some(Element::Node(_)) => self.nodes.push(id),
            Some(Element::Connection(connection)) => {
                if connection.connector().is_message_flow() {
                    message_flows.push(id);
                } else {
                    self.flows.push(id);
                }
            }
            Some(Element::Lane(lane)) => {
                for child in lane.elements() {
                    self.collect(model, *child, message_flows);
                }
            }
            // Pools only appear at the top level.
            Some(Element::Pool(_)) | None => {}
        }
    }
}

/// All process groups of a model plus its message flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<ProcessGroup>,
    message_flows: Vec<ElementId>,
}

impl Partition {
    /// Splits `model` into process groups.
    ///
    /// The global group comes first and is present if the root holds any
    /// node or non-message connection, or if no pool yields a group. Each
    /// pool with at least one element follows in declaration order.
    pub fn new(model: &Model) -> Self {
        let mut global = ProcessGroup::new(None);
        let mut pools = Vec::new();
        let mut message_flows = Vec::new();

        for id in model.root() {
            match model.element(*id) {
                Some(Element::Pool(pool)) => {
                    if pool.is_empty() {
                        debug!(pool:% = id; "Skipping empty pool");
                        continue;
                    }
                    let mut group = ProcessGroup::new(Some(*id));
                    for child in pool.elements() {
                        group.collect(model, *child, &mut message_flows);
                    }
                    pools.push(group);
                }
                Some(_) => global.collect(model, *id, &mut message_flows),
                None => {}
            }
        }

        let has_global_content = !global.nodes.is_empty() || !global.flows.is_empty();
        let mut groups = Vec::with_capacity(pools.len() + 1);
        if has_global_content || pools.is_empty() {
            groups.push(global);
        }
        groups.extend(pools);

        debug!(
            groups = groups.len(),
            message_flows = message_flows.len();
            "Partitioned model"
        );

        Self {
            groups,
            message_flows,
        }
    }

    pub fn groups(&self) -> &[ProcessGroup] {
        &self.groups
    }

    /// Message flows in tree order.
    pub fn message_flows(&self) -> &[ElementId] {
        &self.message_flows
    }
}

#[cfg(test)]
mod tests {
    use swimlane_core::model::{Connection, Connector, EventType, ModelBuilder, NodeKind};

    use super::*;

    #[test]
    fn test_global_only() {
        let mut b = ModelBuilder::new();
        let start = b
            .add_node(None, "Start", NodeKind::event(EventType::Start))
            .unwrap();
        let end = b
            .add_node(None, "End", NodeKind::event(EventType::End))
            .unwrap();
        let flow = b.connect(None, start, Connector::Sequence, end).unwrap();

        let partition = Partition::new(&b.build());

        assert_eq!(partition.groups().len(), 1);
        let global = &partition.groups()[0];
        assert_eq!(global.pool(), None);
        assert_eq!(global.nodes(), &[start, end]);
        assert_eq!(global.flows(), &[flow]);
        assert!(partition.message_flows().is_empty());
    }

    #[test]
    fn test_pools_without_global_content() {
        let mut b = ModelBuilder::new();
        let p1 = b.add_pool("P1");
        let p2 = b.add_pool("P2");
        let a = b.add_node(Some(p1), "A", NodeKind::Task(None)).unwrap();
        let c = b.add_node(Some(p2), "C", NodeKind::Task(None)).unwrap();
        let message = b.connect(None, a, Connector::Message, c).unwrap();

        let partition = Partition::new(&b.build());

        let pools: Vec<_> = partition.groups().iter().map(ProcessGroup::pool).collect();
        assert_eq!(pools, vec![Some(p1), Some(p2)]);
        assert_eq!(partition.message_flows(), &[message]);
    }

    #[test]
    fn test_lanes_are_flattened() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        let l1 = b.add_lane(Some(pool), "L1").unwrap();
        let inner = b.add_lane(Some(l1), "Inner").unwrap();
        let l2 = b.add_lane(Some(pool), "L2").unwrap();
        let a = b.add_node(Some(inner), "A", NodeKind::Task(None)).unwrap();
        let c = b.add_node(Some(l2), "C", NodeKind::Task(None)).unwrap();
        let flow = b.connect(Some(l2), a, Connector::Sequence, c).unwrap();
        let message = b
            .add_connection(Some(l1), Connection::new("A", Connector::Message, "X"))
            .unwrap();

        let partition = Partition::new(&b.build());

        assert_eq!(partition.groups().len(), 1);
        let group = &partition.groups()[0];
        assert_eq!(group.nodes(), &[a, c]);
        assert_eq!(group.flows(), &[flow]);
        assert_eq!(partition.message_flows(), &[message]);
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let mut b = ModelBuilder::new();
        b.add_node(None, "A", NodeKind::Task(None)).unwrap();
        b.add_pool("Empty");

        let partition = Partition::new(&b.build());

        assert_eq!(partition.groups().len(), 1);
        assert_eq!(partition.groups()[0].pool(), None);
    }

    #[test]
    fn test_empty_model_has_global_group() {
        let partition = Partition::new(&ModelBuilder::new().build());

        assert_eq!(partition.groups().len(), 1);
        assert!(partition.groups()[0].nodes().is_empty());
    }

    #[test]
    fn test_root_message_flow_alone_does_not_force_global() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        b.add_node(Some(pool), "A", NodeKind::Task(None)).unwrap();
        b.add_connection(None, Connection::new("A", Connector::Message, "A"))
            .unwrap();

        let partition = Partition::new(&b.build());

        assert_eq!(partition.groups().len(), 1);
        assert_eq!(partition.groups()[0].pool(), Some(pool));
    }
}
