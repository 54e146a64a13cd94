//! Element variants of the process model tree.
//!
//! Every entry of a [`Model`](super::Model) holds one [`Element`]: a flow
//! [`Node`], a [`Connection`] between nodes, or a named [`Container`] acting
//! as a pool or a lane.

use std::{fmt, str::FromStr};

use crate::{error::ModelError, model::ElementId};

/// Event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Start,
    End,
    Intermediate,
    Catch,
}

impl EventType {
    /// Returns the keyword used for this subtype in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Start => "start",
            EventType::End => "end",
            EventType::Intermediate => "intermediate",
            EventType::Catch => "catch",
        }
    }
}

/// Trigger attached to an event, rendered as an event definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTrigger {
    Message,
    Timer,
    Signal,
    Error,
    Terminate,
}

impl EventTrigger {
    /// Returns the keyword used for this trigger in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTrigger::Message => "message",
            EventTrigger::Timer => "timer",
            EventTrigger::Signal => "signal",
            EventTrigger::Error => "error",
            EventTrigger::Terminate => "terminate",
        }
    }
}

/// Task subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Task,
    User,
    Service,
    Manual,
    Script,
    Send,
    Receive,
    BusinessRule,
}

impl TaskType {
    /// Returns the keyword used for this subtype in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Task => "task",
            TaskType::User => "user",
            TaskType::Service => "service",
            TaskType::Manual => "manual",
            TaskType::Script => "script",
            TaskType::Send => "send",
            TaskType::Receive => "receive",
            TaskType::BusinessRule => "business-rule",
        }
    }
}

/// Gateway subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayType {
    Exclusive,
    Parallel,
    Inclusive,
    EventBased,
    Complex,
}

impl GatewayType {
    /// Returns the keyword used for this subtype in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayType::Exclusive => "exclusive",
            GatewayType::Parallel => "parallel",
            GatewayType::Inclusive => "inclusive",
            GatewayType::EventBased => "event-based",
            GatewayType::Complex => "complex",
        }
    }
}

macro_rules! impl_keyword_parsing {
    ($ty:ident, $what:literal, [$($variant:ident),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($ty::$variant),+]
                    .into_iter()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or_else(|| ModelError::UnknownKeyword {
                        kind: $what,
                        keyword: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_keyword_parsing!(EventType, "event type", [Start, End, Intermediate, Catch]);
impl_keyword_parsing!(
    EventTrigger,
    "event trigger",
    [Message, Timer, Signal, Error, Terminate]
);
impl_keyword_parsing!(
    TaskType,
    "task type",
    [Task, User, Service, Manual, Script, Send, Receive, BusinessRule]
);
impl_keyword_parsing!(
    GatewayType,
    "gateway type",
    [Exclusive, Parallel, Inclusive, EventBased, Complex]
);

/// The kind of a flow node together with its optional subtype.
///
/// A missing subtype is legal in the tree; consumers fall back to the
/// per-kind default returned by the `*_type()` accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Event {
        event_type: Option<EventType>,
        trigger: Option<EventTrigger>,
    },
    Task(Option<TaskType>),
    Gateway(Option<GatewayType>),
}

impl NodeKind {
    /// An event with the given subtype and no trigger.
    pub fn event(event_type: EventType) -> Self {
        NodeKind::Event {
            event_type: Some(event_type),
            trigger: None,
        }
    }

    /// A task with the given subtype.
    pub fn task(task_type: TaskType) -> Self {
        NodeKind::Task(Some(task_type))
    }

    /// A gateway with the given subtype.
    pub fn gateway(gateway_type: GatewayType) -> Self {
        NodeKind::Gateway(Some(gateway_type))
    }

    /// Sets the trigger of an event kind. Non-event kinds are returned unchanged.
    pub fn with_trigger(self, trigger: EventTrigger) -> Self {
        match self {
            NodeKind::Event { event_type, .. } => NodeKind::Event {
                event_type,
                trigger: Some(trigger),
            },
            other => other,
        }
    }

    /// Event subtype, [`EventType::Intermediate`] when unset. `None` for
    /// tasks and gateways.
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            NodeKind::Event { event_type, .. } => {
                Some(event_type.unwrap_or(EventType::Intermediate))
            }
            _ => None,
        }
    }

    /// Task subtype, [`TaskType::Task`] when unset.
    pub fn task_type(&self) -> Option<TaskType> {
        match self {
            NodeKind::Task(task_type) => Some(task_type.unwrap_or(TaskType::Task)),
            _ => None,
        }
    }

    /// Gateway subtype, [`GatewayType::Exclusive`] when unset.
    pub fn gateway_type(&self) -> Option<GatewayType> {
        match self {
            NodeKind::Gateway(gateway_type) => {
                Some(gateway_type.unwrap_or(GatewayType::Exclusive))
            }
            _ => None,
        }
    }

    pub fn trigger(&self) -> Option<EventTrigger> {
        match self {
            NodeKind::Event { trigger, .. } => *trigger,
            _ => None,
        }
    }
}

/// A flow node: an event, a task or a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` if this node is an event.
    pub fn is_event(&self) -> bool {
        matches!(self.kind, NodeKind::Event { .. })
    }

    /// Returns `true` if this node is a gateway.
    pub fn is_gateway(&self) -> bool {
        matches!(self.kind, NodeKind::Gateway(_))
    }
}

/// The connector token of a connection, which fixes its semantic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// `-->`
    Sequence,
    /// `..>`
    DirectedAssociation,
    /// `..`
    Association,
    /// `~>`
    Message,
}

impl Connector {
    /// Returns the source token of this connector.
    pub fn token(&self) -> &'static str {
        match self {
            Connector::Sequence => "-->",
            Connector::DirectedAssociation => "..>",
            Connector::Association => "..",
            Connector::Message => "~>",
        }
    }

    /// Returns `true` for the cross-pool message-flow connector.
    pub fn is_message_flow(&self) -> bool {
        matches!(self, Connector::Message)
    }

    /// Returns `true` for either association connector.
    pub fn is_association(&self) -> bool {
        matches!(
            self,
            Connector::Association | Connector::DirectedAssociation
        )
    }
}

impl FromStr for Connector {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-->" => Ok(Connector::Sequence),
            "..>" => Ok(Connector::DirectedAssociation),
            ".." => Ok(Connector::Association),
            "~>" => Ok(Connector::Message),
            _ => Err(ModelError::UnknownKeyword {
                kind: "connector",
                keyword: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Which end of a connection a reference sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceRole {
    Source,
    Target,
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceRole::Source => write!(f, "source"),
            ReferenceRole::Target => write!(f, "target"),
        }
    }
}

/// A named reference to a node, bound during linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    text: String,
    node: Option<ElementId>,
}

impl Reference {
    /// An unresolved reference carrying only its source text.
    pub fn unresolved(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            node: None,
        }
    }

    /// A reference already bound to `node`.
    pub fn resolved(text: impl Into<String>, node: ElementId) -> Self {
        Self {
            text: text.into(),
            node: Some(node),
        }
    }

    /// The name as written in the source.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The bound node, if linking succeeded.
    pub fn node(&self) -> Option<ElementId> {
        self.node
    }

    pub fn is_resolved(&self) -> bool {
        self.node.is_some()
    }

    pub(crate) fn bind(&mut self, node: ElementId) {
        self.node = Some(node);
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    source: Reference,
    target: Reference,
    connector: Connector,
    label: Option<String>,
}

impl Connection {
    /// Create a connection with unresolved references.
    pub fn new(source: impl Into<String>, connector: Connector, target: impl Into<String>) -> Self {
        Self::with_references(
            Reference::unresolved(source),
            connector,
            Reference::unresolved(target),
        )
    }

    /// Create a connection from explicit references.
    pub fn with_references(source: Reference, connector: Connector, target: Reference) -> Self {
        Self {
            source,
            target,
            connector,
            label: None,
        }
    }

    /// Set the label of this connection.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn source(&self) -> &Reference {
        &self.source
    }

    pub fn target(&self) -> &Reference {
        &self.target
    }

    /// Returns the reference in the given role.
    pub fn reference(&self, role: ReferenceRole) -> &Reference {
        match role {
            ReferenceRole::Source => &self.source,
            ReferenceRole::Target => &self.target,
        }
    }

    pub(crate) fn reference_mut(&mut self, role: ReferenceRole) -> &mut Reference {
        match role {
            ReferenceRole::Source => &mut self.source,
            ReferenceRole::Target => &mut self.target,
        }
    }

    pub fn connector(&self) -> Connector {
        self.connector
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A named container holding an ordered list of child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
    elements: Vec<ElementId>,
}

impl Container {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct children in declaration order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn push(&mut self, id: ElementId) {
        self.elements.push(id);
    }
}

/// One entry of the model tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(Node),
    Connection(Connection),
    Pool(Container),
    Lane(Container),
}

impl Element {
    /// Returns the node if this element is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the connection if this element is one.
    pub fn as_connection(&self) -> Option<&Connection> {
        match self {
            Element::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    /// Returns the container if this element is a pool or a lane.
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Element::Pool(container) | Element::Lane(container) => Some(container),
            _ => None,
        }
    }

    pub fn is_pool(&self) -> bool {
        matches!(self, Element::Pool(_))
    }

    pub fn is_lane(&self) -> bool {
        matches!(self, Element::Lane(_))
    }

    /// A short human-readable name of the variant, used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Node(node) => match node.kind() {
                NodeKind::Event { .. } => "event",
                NodeKind::Task(_) => "task",
                NodeKind::Gateway(_) => "gateway",
            },
            Element::Connection(_) => "connection",
            Element::Pool(_) => "pool",
            Element::Lane(_) => "lane",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_keywords_round_trip() {
        assert_eq!("business-rule".parse::<TaskType>().unwrap(), TaskType::BusinessRule);
        assert_eq!("event-based".parse::<GatewayType>().unwrap(), GatewayType::EventBased);
        assert_eq!("start".parse::<EventType>().unwrap(), EventType::Start);
        assert_eq!("timer".parse::<EventTrigger>().unwrap(), EventTrigger::Timer);
        assert_eq!(TaskType::BusinessRule.to_string(), "business-rule");
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "loop".parse::<TaskType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown task type `loop`");
    }

    #[test]
    fn test_connector_tokens() {
        for connector in [
            Connector::Sequence,
            Connector::DirectedAssociation,
            Connector::Association,
            Connector::Message,
        ] {
            assert_eq!(connector.token().parse::<Connector>().unwrap(), connector);
        }
        assert!(Connector::Message.is_message_flow());
        assert!(Connector::Association.is_association());
        assert!(!Connector::Sequence.is_association());
        assert!("->".parse::<Connector>().is_err());
    }

    #[test]
    fn test_with_trigger_only_affects_events() {
        let event = NodeKind::event(EventType::Start).with_trigger(EventTrigger::Message);
        assert_eq!(
            event,
            NodeKind::Event {
                event_type: Some(EventType::Start),
                trigger: Some(EventTrigger::Message),
            }
        );

        let task = NodeKind::task(TaskType::User).with_trigger(EventTrigger::Timer);
        assert_eq!(task, NodeKind::task(TaskType::User));
    }

    #[test]
    fn test_subtype_defaults() {
        let event = NodeKind::Event {
            event_type: None,
            trigger: None,
        };
        assert_eq!(event.event_type(), Some(EventType::Intermediate));
        assert_eq!(event.task_type(), None);
        assert_eq!(NodeKind::Task(None).task_type(), Some(TaskType::Task));
        assert_eq!(
            NodeKind::Gateway(None).gateway_type(),
            Some(GatewayType::Exclusive)
        );
        assert_eq!(NodeKind::Gateway(None).trigger(), None);
    }

    #[test]
    fn test_connection_label_and_references() {
        let connection = Connection::new("A", Connector::Sequence, "B").with_label("go");

        assert_eq!(connection.label(), Some("go"));
        assert_eq!(connection.reference(ReferenceRole::Source).text(), "A");
        assert_eq!(connection.reference(ReferenceRole::Target).text(), "B");
        assert!(!connection.source().is_resolved());
    }
}
