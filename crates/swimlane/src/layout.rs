//! Deterministic diagram placement.
//!
//! Every process group becomes one horizontal row. Nodes are placed left to
//! right in tree order at a fixed pitch; rows are stacked in group order:
//!
//! ```text
//! y = origin_y                 [Start]──▶[Task]──▶[End]       global group
//! y = origin_y + row_spacing   ┌ P1 ──────────────────┐
//!                              │ [A]──▶[B]             │      pool group
//!                              └──────────────────────┘
//! ```
//!
//! Shapes carry no information beyond their box, so the layout works purely
//! on [`ElementId`]s; identifiers are attached later.

use indexmap::IndexMap;
use log::trace;

use swimlane_core::{
    geometry::{Bounds, Insets, Point, Size},
    model::{ElementId, Model, NodeKind},
};

use crate::{config::LayoutConfig, structure::Partition};

/// Box size of a node of the given kind.
pub fn footprint(kind: NodeKind) -> Size {
    match kind {
        NodeKind::Event { .. } => Size::new(36.0, 36.0),
        NodeKind::Gateway(_) => Size::new(50.0, 50.0),
        NodeKind::Task(_) => Size::new(100.0, 80.0),
    }
}

/// Placement of one process group.
#[derive(Debug, Clone, Default)]
pub struct RowLayout {
    boxes: IndexMap<ElementId, Bounds>,
    pool_bounds: Option<Bounds>,
}

impl RowLayout {
    /// Node boxes in placement order.
    pub fn boxes(&self) -> impl Iterator<Item = (ElementId, Bounds)> + '_ {
        self.boxes.iter().map(|(id, bounds)| (*id, *bounds))
    }

    /// Padded union of the node boxes, only for pool rows with nodes.
    pub fn pool_bounds(&self) -> Option<Bounds> {
        self.pool_bounds
    }

    /// Two-point edge between the centers of two boxes of this row.
    ///
    /// Falls back to a degenerate edge at the origin if either endpoint is
    /// missing or not placed in this row.
    pub fn edge(&self, source: Option<ElementId>, target: Option<ElementId>) -> [Point; 2] {
        edge_between(&self.boxes, source, target)
    }
}

/// Placement of a whole partition.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    rows: Vec<RowLayout>,
    all_boxes: IndexMap<ElementId, Bounds>,
}

impl Layout {
    /// Lays out `partition`, one row per group, in group order.
    pub fn new(model: &Model, partition: &Partition, config: &LayoutConfig) -> Self {
        let padding = Insets::uniform(config.pool_padding());
        let mut layout = Self::default();

        for (index, group) in partition.groups().iter().enumerate() {
            let y = config.origin_y() + index as f32 * config.row_spacing();
            let mut row = RowLayout::default();

            let placed = group
                .nodes()
                .iter()
                .filter_map(|id| model.node(*id).map(|node| (*id, node.kind())));
            for (column, (id, kind)) in placed.enumerate() {
                let x = config.origin_x() + column as f32 * config.node_spacing();
                let bounds = Bounds::new_from_top_left(Point::new(x, y), footprint(kind));
                trace!(node:% = id, bounds:?; "Placed node");
                row.boxes.insert(id, bounds);
            }

            if group.pool().is_some() {
                row.pool_bounds = row
                    .boxes
                    .values()
                    .copied()
                    .reduce(|acc, bounds| acc.merge(&bounds))
                    .map(|union| union.add_padding(padding));
            }

            layout
                .all_boxes
                .extend(row.boxes.iter().map(|(id, bounds)| (*id, *bounds)));
            layout.rows.push(row);
        }

        layout
    }

    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    /// Edge between boxes of any rows, as used by message flows.
    pub fn edge(&self, source: Option<ElementId>, target: Option<ElementId>) -> [Point; 2] {
        edge_between(&self.all_boxes, source, target)
    }
}

fn edge_between(
    boxes: &IndexMap<ElementId, Bounds>,
    source: Option<ElementId>,
    target: Option<ElementId>,
) -> [Point; 2] {
    let source = source.and_then(|id| boxes.get(&id));
    let target = target.and_then(|id| boxes.get(&id));
    match (source, target) {
        (Some(source), Some(target)) => [source.center().round(), target.center().round()],
        _ => [Point::default(), Point::default()],
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use swimlane_core::model::{Connector, EventType, GatewayType, ModelBuilder};

    use super::*;

    fn node_bounds(row: &RowLayout, node: ElementId) -> Bounds {
        row.boxes()
            .find(|(id, _)| *id == node)
            .map(|(_, bounds)| bounds)
            .unwrap()
    }

    fn assert_box(bounds: Bounds, x: f32, y: f32, w: f32, h: f32) {
        assert!(approx_eq!(f32, bounds.min_x(), x), "min_x {}", bounds.min_x());
        assert!(approx_eq!(f32, bounds.min_y(), y), "min_y {}", bounds.min_y());
        assert!(approx_eq!(f32, bounds.width(), w), "width {}", bounds.width());
        assert!(approx_eq!(f32, bounds.height(), h), "height {}", bounds.height());
    }

    #[test]
    fn test_footprints() {
        assert_eq!(footprint(NodeKind::event(EventType::Start)), Size::new(36.0, 36.0));
        assert_eq!(
            footprint(NodeKind::gateway(GatewayType::Parallel)),
            Size::new(50.0, 50.0)
        );
        assert_eq!(footprint(NodeKind::Task(None)), Size::new(100.0, 80.0));
    }

    #[test]
    fn test_rows_and_columns() {
        let mut b = ModelBuilder::new();
        let start = b
            .add_node(None, "Start", NodeKind::event(EventType::Start))
            .unwrap();
        let gate = b.add_node(None, "Gate", NodeKind::Gateway(None)).unwrap();
        let pool = b.add_pool("P");
        let task = b.add_node(Some(pool), "Task", NodeKind::Task(None)).unwrap();
        let model = b.build();

        let partition = Partition::new(&model);
        let layout = Layout::new(&model, &partition, &LayoutConfig::default());

        let global = &layout.rows()[0];
        assert_box(node_bounds(global, start), 100.0, 80.0, 36.0, 36.0);
        assert_box(node_bounds(global, gate), 280.0, 80.0, 50.0, 50.0);
        assert!(global.pool_bounds().is_none());

        let pooled = &layout.rows()[1];
        assert_box(node_bounds(pooled, task), 100.0, 300.0, 100.0, 80.0);
        assert_box(pooled.pool_bounds().unwrap(), 60.0, 260.0, 180.0, 160.0);
    }

    #[test]
    fn test_pool_bounds_cover_all_nodes() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        let lane = b.add_lane(Some(pool), "L").unwrap();
        b.add_node(Some(lane), "E", NodeKind::event(EventType::End))
            .unwrap();
        b.add_node(Some(pool), "T", NodeKind::Task(None)).unwrap();
        let model = b.build();

        let partition = Partition::new(&model);
        let layout = Layout::new(&model, &partition, &LayoutConfig::default());

        // Event at (100, 80) 36x36 and task at (280, 80) 100x80, padded by 40.
        assert_box(layout.rows()[0].pool_bounds().unwrap(), 60.0, 40.0, 360.0, 160.0);
    }

    #[test]
    fn test_pool_without_nodes_has_no_bounds() {
        let mut b = ModelBuilder::new();
        let pool = b.add_pool("P");
        b.add_lane(Some(pool), "Idle").unwrap();
        let model = b.build();

        let partition = Partition::new(&model);
        let layout = Layout::new(&model, &partition, &LayoutConfig::default());

        assert!(layout.rows()[0].pool_bounds().is_none());
    }

    #[test]
    fn test_edges_use_rounded_centers() {
        let mut b = ModelBuilder::new();
        let start = b
            .add_node(None, "Start", NodeKind::event(EventType::Start))
            .unwrap();
        let end = b
            .add_node(None, "End", NodeKind::event(EventType::End))
            .unwrap();
        let model = b.build();

        let config = LayoutConfig::default().with_node_spacing(180.5);
        let partition = Partition::new(&model);
        let layout = Layout::new(&model, &partition, &config);

        let [from, to] = layout.rows()[0].edge(Some(start), Some(end));
        assert_eq!(from, Point::new(118.0, 98.0));
        assert_eq!(to, Point::new(299.0, 98.0));
    }

    #[test]
    fn test_edge_to_other_row_is_degenerate() {
        let mut b = ModelBuilder::new();
        let p1 = b.add_pool("P1");
        let p2 = b.add_pool("P2");
        let a = b.add_node(Some(p1), "A", NodeKind::Task(None)).unwrap();
        let c = b.add_node(Some(p2), "C", NodeKind::Task(None)).unwrap();
        b.connect(None, a, Connector::Message, c).unwrap();
        let model = b.build();

        let partition = Partition::new(&model);
        let layout = Layout::new(&model, &partition, &LayoutConfig::default());

        assert_eq!(
            layout.rows()[0].edge(Some(a), Some(c)),
            [Point::default(), Point::default()]
        );
        assert_eq!(layout.rows()[0].edge(Some(a), None), [Point::default(); 2]);
        assert_eq!(
            layout.edge(Some(a), Some(c)),
            [Point::new(150.0, 120.0), Point::new(150.0, 340.0)]
        );
    }
}
