//! The compiled BPMN document.
//!
//! [`Definitions::compile`] turns a partitioned model into a tree of plain
//! records that mirrors the XML one to one. All identifiers are assigned
//! here, by a single [`IdRegistry`], in this order:
//!
//! 1. `Definitions_1`
//! 2. every node of every group, in group then tree order
//! 3. per group: process, lane sets and lanes, event definitions, flows
//! 4. message flows, participants, collaboration
//! 5. diagram and plane
//!
//! Node identifiers come first so that a flow can name a node of another
//! group, as an illegal pool-crossing flow does.

use indexmap::IndexMap;
use log::{debug, trace};

use swimlane_core::{
    geometry::{Bounds, Point},
    model::{
        Connection, Connector, Element, ElementId, EventTrigger, EventType, GatewayType, Model,
        NodeKind, TaskType,
    },
};

use crate::{
    identifier::{IdRegistry, base, di_id},
    layout::Layout,
    structure::{Partition, ProcessGroup},
};

/// Root of the compiled document.
#[derive(Debug, Clone, PartialEq)]
pub struct Definitions {
    pub(crate) id: String,
    pub(crate) processes: Vec<Process>,
    pub(crate) collaboration: Option<Collaboration>,
    pub(crate) diagram: Option<Diagram>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub(crate) id: String,
    pub(crate) lane_set: Option<LaneSet>,
    pub(crate) nodes: Vec<FlowNode>,
    pub(crate) flows: Vec<Flow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneSet {
    pub(crate) id: String,
    pub(crate) lanes: Vec<Lane>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub(crate) id: String,
    pub(crate) name: String,
    /// Nodes anywhere inside the lane, nested lanes included.
    pub(crate) flow_node_refs: Vec<String>,
    pub(crate) child_lane_set: Option<LaneSet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub(crate) tag: &'static str,
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) incoming: Vec<String>,
    pub(crate) outgoing: Vec<String>,
    pub(crate) event_definition: Option<EventDefinition>,
}

impl FlowNode {
    /// `true` if the node is written as a self-closed element.
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty() && self.event_definition.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDefinition {
    pub(crate) tag: &'static str,
    pub(crate) id: String,
}

/// BPMN classification of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Sequence,
    Association { directed: bool },
    Message,
}

impl FlowKind {
    pub fn from_connector(connector: Connector) -> Self {
        match connector {
            Connector::Sequence => FlowKind::Sequence,
            Connector::DirectedAssociation => FlowKind::Association { directed: true },
            Connector::Association => FlowKind::Association { directed: false },
            Connector::Message => FlowKind::Message,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            FlowKind::Sequence => "sequenceFlow",
            FlowKind::Association { .. } => "association",
            FlowKind::Message => "messageFlow",
        }
    }

    fn id_base(self) -> &'static str {
        match self {
            FlowKind::Sequence => base::SEQUENCE_FLOW,
            FlowKind::Association { .. } => base::ASSOCIATION,
            FlowKind::Message => base::MESSAGE_FLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub(crate) kind: FlowKind,
    pub(crate) id: String,
    /// Connection label. Associations never carry one.
    pub(crate) name: Option<String>,
    pub(crate) source_ref: Option<String>,
    pub(crate) target_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) process_ref: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collaboration {
    pub(crate) id: String,
    pub(crate) participants: Vec<Participant>,
    pub(crate) message_flows: Vec<Flow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub(crate) id: String,
    pub(crate) plane_id: String,
    /// Collaboration id, or the first process id without a collaboration.
    pub(crate) plane_element: String,
    pub(crate) shapes: Vec<Shape>,
    pub(crate) edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: String,
    pub(crate) element_ref: String,
    pub(crate) bounds: Bounds,
    /// Set for participant shapes, which are drawn as horizontal swimlanes.
    pub(crate) is_horizontal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) id: String,
    pub(crate) element_ref: String,
    pub(crate) waypoints: [Point; 2],
}

/// BPMN element name of a node kind, with missing subtypes defaulted.
pub fn node_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Event { event_type, .. } => {
            match event_type.unwrap_or(EventType::Intermediate) {
                EventType::Start => "startEvent",
                EventType::End => "endEvent",
                EventType::Intermediate => "intermediateThrowEvent",
                EventType::Catch => "intermediateCatchEvent",
            }
        }
        NodeKind::Task(task_type) => match task_type.unwrap_or(TaskType::Task) {
            TaskType::Task => "task",
            TaskType::User => "userTask",
            TaskType::Service => "serviceTask",
            TaskType::Manual => "manualTask",
            TaskType::Script => "scriptTask",
            TaskType::Send => "sendTask",
            TaskType::Receive => "receiveTask",
            TaskType::BusinessRule => "businessRuleTask",
        },
        NodeKind::Gateway(gateway_type) => {
            match gateway_type.unwrap_or(GatewayType::Exclusive) {
                GatewayType::Exclusive => "exclusiveGateway",
                GatewayType::Parallel => "parallelGateway",
                GatewayType::Inclusive => "inclusiveGateway",
                GatewayType::EventBased => "eventBasedGateway",
                GatewayType::Complex => "complexGateway",
            }
        }
    }
}

/// Element name and id base of an event trigger definition.
fn trigger_definition(trigger: EventTrigger) -> (&'static str, &'static str) {
    match trigger {
        EventTrigger::Message => ("messageEventDefinition", "MessageEventDefinition"),
        EventTrigger::Timer => ("timerEventDefinition", "TimerEventDefinition"),
        EventTrigger::Signal => ("signalEventDefinition", "SignalEventDefinition"),
        EventTrigger::Error => ("errorEventDefinition", "ErrorEventDefinition"),
        EventTrigger::Terminate => ("terminateEventDefinition", "TerminateEventDefinition"),
    }
}

impl Definitions {
    /// Compiles a partitioned and laid-out model.
    ///
    /// Never fails: unresolved references lose their `sourceRef`/`targetRef`
    /// attribute and edges without placed endpoints collapse to the origin.
    pub fn compile(model: &Model, partition: &Partition, layout: &Layout) -> Self {
        let mut ids = IdRegistry::new();
        let id = ids.fresh(base::DEFINITIONS);

        for group in partition.groups() {
            for node in group.nodes() {
                if let Some(name) = model.name(*node) {
                    ids.element_id(*node, name);
                }
            }
        }

        let processes: Vec<Process> = partition
            .groups()
            .iter()
            .map(|group| compile_process(model, group, &mut ids))
            .collect();

        let message_flows: Vec<Flow> = partition
            .message_flows()
            .iter()
            .filter_map(|flow| compile_flow(model, *flow, &mut ids))
            .collect();

        let participants: Vec<Participant> = partition
            .groups()
            .iter()
            .zip(&processes)
            .filter_map(|(group, process)| {
                let pool = group.pool()?;
                let name = model.name(pool)?.to_string();
                Some(Participant {
                    id: ids.element_id(pool, &name),
                    name,
                    process_ref: process.id.clone(),
                })
            })
            .collect();

        let collaboration = (!participants.is_empty() || !message_flows.is_empty()).then(|| {
            Collaboration {
                id: ids.fresh(base::COLLABORATION),
                participants,
                message_flows,
            }
        });

        let plane_element = collaboration
            .as_ref()
            .map(|collaboration| collaboration.id.clone())
            .or_else(|| processes.first().map(|process| process.id.clone()));
        let diagram = plane_element.and_then(|plane_element| {
            compile_diagram(model, partition, layout, &ids, plane_element)
        });
        // Allocated after the shapes so that an empty diagram takes no ids.
        let diagram = diagram.map(|mut diagram| {
            diagram.id = ids.fresh(base::DIAGRAM);
            diagram.plane_id = ids.fresh(base::PLANE);
            diagram
        });

        debug!(
            processes = processes.len(),
            collaboration = collaboration.is_some(),
            diagram = diagram.is_some();
            "Compiled definitions"
        );

        Self {
            id,
            processes,
            collaboration,
            diagram,
        }
    }
}

fn compile_process(model: &Model, group: &ProcessGroup, ids: &mut IdRegistry) -> Process {
    let id = ids.fresh(base::PROCESS);
    let lane_set = group
        .pool()
        .and_then(|pool| compile_lane_set(model, model.children(pool), ids));

    let mut events: IndexMap<ElementId, EventDefinition> = IndexMap::new();
    for node in group.nodes() {
        let trigger = model.node(*node).and_then(|n| n.kind().trigger());
        if let Some(trigger) = trigger {
            let (tag, id_base) = trigger_definition(trigger);
            let id = ids.fresh(id_base);
            events.insert(*node, EventDefinition { tag, id });
        }
    }

    let flows: Vec<Flow> = group
        .flows()
        .iter()
        .filter_map(|flow| compile_flow(model, *flow, ids))
        .collect();

    let mut incoming: IndexMap<ElementId, Vec<String>> = IndexMap::new();
    let mut outgoing: IndexMap<ElementId, Vec<String>> = IndexMap::new();
    for (flow_id, connection) in group
        .flows()
        .iter()
        .filter_map(|flow| Some((ids.get(*flow)?, model.connection(*flow)?)))
    {
        if let Some(source) = connection.source().node() {
            outgoing.entry(source).or_default().push(flow_id.to_string());
        }
        if let Some(target) = connection.target().node() {
            incoming.entry(target).or_default().push(flow_id.to_string());
        }
    }

    let nodes = group
        .nodes()
        .iter()
        .filter_map(|node_id| {
            let node = model.node(*node_id)?;
            Some(FlowNode {
                tag: node_tag(node.kind()),
                id: ids.get(*node_id)?.to_string(),
                name: node.name().to_string(),
                incoming: incoming.swap_remove(node_id).unwrap_or_default(),
                outgoing: outgoing.swap_remove(node_id).unwrap_or_default(),
                event_definition: events.swap_remove(node_id),
            })
        })
        .collect();

    trace!(process = id.as_str(), flows = flows.len(); "Compiled process");

    Process {
        id,
        lane_set,
        nodes,
        flows,
    }
}

/// Lane set of the lanes among `children`, or `None` if there are none.
fn compile_lane_set(model: &Model, children: &[ElementId], ids: &mut IdRegistry) -> Option<LaneSet> {
    let lanes: Vec<ElementId> = children
        .iter()
        .copied()
        .filter(|id| model.element(*id).is_some_and(Element::is_lane))
        .collect();
    if lanes.is_empty() {
        return None;
    }

    let id = ids.fresh(base::LANE_SET);
    let lanes = lanes
        .into_iter()
        .filter_map(|lane| {
            let name = model.name(lane)?.to_string();
            let id = ids.element_id(lane, &name);
            let flow_node_refs = model
                .nodes_within(lane)
                .into_iter()
                .filter_map(|node| ids.get(node).map(str::to_string))
                .collect();
            let child_lane_set = compile_lane_set(model, model.children(lane), ids);
            Some(Lane {
                id,
                name,
                flow_node_refs,
                child_lane_set,
            })
        })
        .collect();

    Some(LaneSet { id, lanes })
}

fn compile_flow(model: &Model, flow: ElementId, ids: &mut IdRegistry) -> Option<Flow> {
    let connection: &Connection = model.connection(flow)?;
    let kind = FlowKind::from_connector(connection.connector());
    let name = match kind {
        FlowKind::Association { .. } => None,
        _ => connection.label().map(str::to_string),
    };

    Some(Flow {
        kind,
        id: ids.element_id(flow, kind.id_base()),
        name,
        source_ref: connection
            .source()
            .node()
            .and_then(|node| ids.get(node))
            .map(str::to_string),
        target_ref: connection
            .target()
            .node()
            .and_then(|node| ids.get(node))
            .map(str::to_string),
    })
}

/// Shapes and edges, or `None` when there is nothing to draw.
///
/// The diagram and plane ids are left empty for the caller to fill in.
fn compile_diagram(
    model: &Model,
    partition: &Partition,
    layout: &Layout,
    ids: &IdRegistry,
    plane_element: String,
) -> Option<Diagram> {
    let mut shapes = Vec::new();
    let mut edges = Vec::new();

    for (group, row) in partition.groups().iter().zip(layout.rows()) {
        let participant = group
            .pool()
            .and_then(|pool| ids.get(pool))
            .zip(row.pool_bounds());
        if let Some((participant, bounds)) = participant {
            shapes.push(Shape {
                id: di_id(participant),
                element_ref: participant.to_string(),
                bounds,
                is_horizontal: true,
            });
        }

        for (node, bounds) in row.boxes() {
            if let Some(node_id) = ids.get(node) {
                shapes.push(Shape {
                    id: di_id(node_id),
                    element_ref: node_id.to_string(),
                    bounds,
                    is_horizontal: false,
                });
            }
        }

        for flow in group.flows() {
            if let Some(edge) = compile_edge(model, *flow, ids, |source, target| {
                row.edge(source, target)
            }) {
                edges.push(edge);
            }
        }
    }

    for flow in partition.message_flows() {
        if let Some(edge) = compile_edge(model, *flow, ids, |source, target| {
            layout.edge(source, target)
        }) {
            edges.push(edge);
        }
    }

    if shapes.is_empty() && edges.is_empty() {
        return None;
    }

    Some(Diagram {
        id: String::new(),
        plane_id: String::new(),
        plane_element,
        shapes,
        edges,
    })
}

fn compile_edge(
    model: &Model,
    flow: ElementId,
    ids: &IdRegistry,
    route: impl Fn(Option<ElementId>, Option<ElementId>) -> [Point; 2],
) -> Option<Edge> {
    let connection = model.connection(flow)?;
    let flow_id = ids.get(flow)?;
    Some(Edge {
        id: di_id(flow_id),
        element_ref: flow_id.to_string(),
        waypoints: route(connection.source().node(), connection.target().node()),
    })
}
