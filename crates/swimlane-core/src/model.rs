//! The process model tree.
//!
//! A [`Model`] is an arena of [`Element`]s addressed by [`ElementId`]
//! handles. Containers own the ordered list of their children; every child
//! stores a handle back to its parent. The parent handle is a plain index,
//! so ascending the tree never involves shared ownership.
//!
//! ```text
//! root ─┬─ Node "Start"
//!       ├─ Pool "Shop" ─┬─ Lane "Sales" ── Node "Order"
//!       │               └─ Connection Order --> Ship
//!       └─ Connection Start --> End
//! ```
//!
//! Models are created with a [`ModelBuilder`] and are read-only afterwards,
//! except for binding connection references during linking.

mod builder;
mod element;

pub use builder::ModelBuilder;
pub use element::{
    Connection, Connector, Container, Element, EventTrigger, EventType, GatewayType, Node,
    NodeKind, Reference, ReferenceRole, TaskType,
};

use std::fmt;

use crate::error::ModelError;

/// Handle of an element inside a [`Model`].
///
/// Handles are only meaningful for the model that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Returns the arena index of this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    parent: Option<ElementId>,
    element: Element,
}

/// An immutable, containment-linked process model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    entries: Vec<Entry>,
    root: Vec<ElementId>,
}

impl Model {
    /// Top-level elements in declaration order.
    pub fn root(&self) -> &[ElementId] {
        &self.root
    }

    /// Number of elements in the model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the element behind `id`.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.entries.get(id.0).map(|entry| &entry.element)
    }

    /// Returns the node behind `id`, if it is a node.
    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.element(id).and_then(Element::as_node)
    }

    /// Returns the connection behind `id`, if it is a connection.
    pub fn connection(&self, id: ElementId) -> Option<&Connection> {
        self.element(id).and_then(Element::as_connection)
    }

    /// Returns the pool or lane behind `id`.
    pub fn container(&self, id: ElementId) -> Option<&Container> {
        self.element(id).and_then(Element::as_container)
    }

    /// Returns the parent of `id`, or `None` for top-level elements.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.entries.get(id.0).and_then(|entry| entry.parent)
    }

    /// Direct children of `id`; empty for anything that is not a container.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.container(id).map(Container::elements).unwrap_or(&[])
    }

    /// Iterates over the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            model: self,
            next: self.parent(id),
        }
    }

    /// The nearest enclosing pool or lane of `id`.
    pub fn enclosing_container(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id)
            .find(|ancestor| self.container(*ancestor).is_some())
    }

    /// The nearest enclosing pool of `id`, looking through lanes.
    pub fn enclosing_pool(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id)
            .find(|ancestor| self.element(*ancestor).is_some_and(Element::is_pool))
    }

    /// All elements below `id` in depth-first pre-order.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_preorder(self.children(id), &mut out);
        out
    }

    /// All elements of the model in depth-first pre-order.
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.entries.len());
        self.collect_preorder(&self.root, &mut out);
        out
    }

    /// Nodes transitively contained in the container `id`.
    pub fn nodes_within(&self, id: ElementId) -> Vec<ElementId> {
        self.descendants(id)
            .into_iter()
            .filter(|descendant| self.node(*descendant).is_some())
            .collect()
    }

    /// Top-level pools in declaration order.
    pub fn pools(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.root
            .iter()
            .copied()
            .filter(|id| self.element(*id).is_some_and(Element::is_pool))
    }

    /// All connections of the model in tree order.
    pub fn connections(&self) -> Vec<ElementId> {
        self.walk()
            .into_iter()
            .filter(|id| self.connection(*id).is_some())
            .collect()
    }

    /// Display name of a node, pool or lane. Connections have none.
    pub fn name(&self, id: ElementId) -> Option<&str> {
        match self.element(id)? {
            Element::Node(node) => Some(node.name()),
            Element::Pool(container) | Element::Lane(container) => Some(container.name()),
            Element::Connection(_) => None,
        }
    }

    /// Binds a connection reference to a node.
    ///
    /// # Errors
    ///
    /// Returns an error if `connection` is not a connection or `node` is not
    /// a node of this model.
    pub fn bind_reference(
        &mut self,
        connection: ElementId,
        role: ReferenceRole,
        node: ElementId,
    ) -> Result<(), ModelError> {
        if self.node(node).is_none() {
            return Err(ModelError::NotANode(node));
        }
        match self.entries.get_mut(connection.0).map(|entry| &mut entry.element) {
            Some(Element::Connection(conn)) => {
                conn.reference_mut(role).bind(node);
                Ok(())
            }
            Some(_) => Err(ModelError::NotAConnection(connection)),
            None => Err(ModelError::UnknownElement(connection)),
        }
    }

    fn collect_preorder(&self, ids: &[ElementId], out: &mut Vec<ElementId>) {
        for id in ids {
            out.push(*id);
            self.collect_preorder(self.children(*id), out);
        }
    }

    fn push(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let id = ElementId(self.entries.len());
        self.entries.push(Entry { parent, element });
        id
    }
}

/// Iterator over the ancestors of an element, nearest first.
///
/// Created by [`Model::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'m> {
    model: &'m Model,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.model.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Model, [ElementId; 6]) {
        let mut builder = ModelBuilder::new();
        let start = builder
            .add_node(None, "Start", NodeKind::event(EventType::Start))
            .unwrap();
        let pool = builder.add_pool("Shop");
        let lane = builder.add_lane(Some(pool), "Sales").unwrap();
        let inner = builder.add_lane(Some(lane), "Desk").unwrap();
        let order = builder
            .add_node(Some(inner), "Order", NodeKind::task(TaskType::User))
            .unwrap();
        let flow = builder
            .add_connection(Some(pool), Connection::new("Order", Connector::Sequence, "Order"))
            .unwrap();
        (builder.build(), [start, pool, lane, inner, order, flow])
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (model, [_, pool, lane, inner, order, _]) = sample();

        let ancestors: Vec<_> = model.ancestors(order).collect();
        assert_eq!(ancestors, vec![inner, lane, pool]);
        assert_eq!(model.enclosing_container(order), Some(inner));
        assert_eq!(model.enclosing_pool(order), Some(pool));
    }

    #[test]
    fn test_top_level_has_no_enclosing_pool() {
        let (model, [start, pool, ..]) = sample();

        assert_eq!(model.parent(start), None);
        assert_eq!(model.enclosing_pool(start), None);
        assert_eq!(model.enclosing_pool(pool), None);
    }

    #[test]
    fn test_walk_is_preorder() {
        let (model, [start, pool, lane, inner, order, flow]) = sample();

        assert_eq!(model.walk(), vec![start, pool, lane, inner, order, flow]);
        assert_eq!(model.descendants(pool), vec![lane, inner, order, flow]);
        assert_eq!(model.nodes_within(pool), vec![order]);
        assert_eq!(model.connections(), vec![flow]);
        assert_eq!(model.pools().collect::<Vec<_>>(), vec![pool]);
    }

    #[test]
    fn test_bind_reference() {
        let (mut model, [start, _, _, _, order, flow]) = sample();

        model
            .bind_reference(flow, ReferenceRole::Source, order)
            .unwrap();
        assert_eq!(model.connection(flow).unwrap().source().node(), Some(order));
        assert_eq!(model.connection(flow).unwrap().target().node(), None);

        assert_eq!(
            model.bind_reference(start, ReferenceRole::Source, order),
            Err(ModelError::NotAConnection(start))
        );
        assert_eq!(
            model.bind_reference(flow, ReferenceRole::Target, flow),
            Err(ModelError::NotANode(flow))
        );
    }

    #[test]
    fn test_names() {
        let (model, [start, pool, _, _, _, flow]) = sample();

        assert_eq!(model.name(start), Some("Start"));
        assert_eq!(model.name(pool), Some("Shop"));
        assert_eq!(model.name(flow), None);
        assert_eq!(model.len(), 6);
    }
}
