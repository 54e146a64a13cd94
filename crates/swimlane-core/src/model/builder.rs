//! Incremental construction of a [`Model`].

use log::trace;

use crate::{
    error::ModelError,
    model::{
        Connection, Connector, Container, Element, ElementId, Model, Node, NodeKind, Reference,
    },
};

/// Builder for [`Model`] trees.
///
/// Every `add_*` method takes the handle of the parent container, or `None`
/// to append to the top level. Children are kept in insertion order.
///
/// # Examples
///
/// ```
/// use swimlane_core::model::{Connection, Connector, EventType, ModelBuilder, NodeKind};
///
/// let mut builder = ModelBuilder::new();
/// let pool = builder.add_pool("Shop");
/// let lane = builder.add_lane(Some(pool), "Sales").unwrap();
/// builder.add_node(Some(lane), "Start", NodeKind::event(EventType::Start)).unwrap();
/// builder.add_node(Some(lane), "End", NodeKind::event(EventType::End)).unwrap();
/// builder
///     .add_connection(Some(lane), Connection::new("Start", Connector::Sequence, "End"))
///     .unwrap();
///
/// let model = builder.build();
/// assert_eq!(model.len(), 5);
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pool to the top level.
    pub fn add_pool(&mut self, name: impl Into<String>) -> ElementId {
        let name = name.into();
        trace!(name; "Adding pool");
        let id = self.model.push(None, Element::Pool(Container::new(name)));
        self.model.root.push(id);
        id
    }

    /// Append a lane to a pool or to another lane.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TopLevelLane`] when `parent` is `None`.
    pub fn add_lane(
        &mut self,
        parent: Option<ElementId>,
        name: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        let name = name.into();
        let Some(parent) = parent else {
            return Err(ModelError::TopLevelLane(name));
        };
        trace!(name, parent:%; "Adding lane");
        self.append(Some(parent), Element::Lane(Container::new(name)))
    }

    /// Append a flow node.
    pub fn add_node(
        &mut self,
        parent: Option<ElementId>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<ElementId, ModelError> {
        self.append(parent, Element::Node(Node::new(name, kind)))
    }

    /// Append a connection as written in the source, references unresolved.
    pub fn add_connection(
        &mut self,
        parent: Option<ElementId>,
        connection: Connection,
    ) -> Result<ElementId, ModelError> {
        self.append(parent, Element::Connection(connection))
    }

    /// Append a connection whose references are already bound to `source`
    /// and `target`. The reference text is taken from the node names.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotANode`] if either endpoint is not a node.
    pub fn connect(
        &mut self,
        parent: Option<ElementId>,
        source: ElementId,
        connector: Connector,
        target: ElementId,
    ) -> Result<ElementId, ModelError> {
        let source_ref = self.resolved_reference(source)?;
        let target_ref = self.resolved_reference(target)?;
        self.add_connection(
            parent,
            Connection::with_references(source_ref, connector, target_ref),
        )
    }

    /// Finish building.
    pub fn build(self) -> Model {
        self.model
    }

    fn resolved_reference(&self, node: ElementId) -> Result<Reference, ModelError> {
        self.model
            .node(node)
            .map(|n| Reference::resolved(n.name(), node))
            .ok_or(ModelError::NotANode(node))
    }

    fn append(
        &mut self,
        parent: Option<ElementId>,
        element: Element,
    ) -> Result<ElementId, ModelError> {
        let Some(parent) = parent else {
            let id = self.model.push(None, element);
            self.model.root.push(id);
            return Ok(id);
        };

        match self.model.element(parent) {
            None => return Err(ModelError::UnknownElement(parent)),
            Some(Element::Pool(_) | Element::Lane(_)) => {}
            Some(_) => return Err(ModelError::NotAContainer(parent)),
        }

        let id = self.model.push(Some(parent), element);
        if let Some(Element::Pool(container) | Element::Lane(container)) = self
            .model
            .entries
            .get_mut(parent.index())
            .map(|entry| &mut entry.element)
        {
            container.push(id);
        }
        Ok(id)
    }
}
