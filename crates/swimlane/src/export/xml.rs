//! BPMN 2.0 XML serialization.
//!
//! The document layout is fixed:
//!
//! ```text
//! <bpmn:definitions ...>
//!   <bpmn:process/>        one per group, global first
//!   <bpmn:collaboration/>  if there are participants or message flows
//!   <bpmndi:BPMNDiagram/>  if there is anything to draw
//! </bpmn:definitions>
//! ```

use log::debug;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use swimlane_core::geometry::{Bounds, Point};

use crate::{
    config::ExportConfig,
    definitions::{
        Collaboration, Definitions, Diagram, Edge, Flow, FlowKind, FlowNode, LaneSet, Process,
        Shape,
    },
    export::{Error, Exporter},
};

pub const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMNDI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
pub const DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";
pub const TARGET_NS: &str = "http://bpmn.io/schema/bpmn";

/// Writes [`Definitions`] as an indented BPMN 2.0 XML document.
#[derive(Debug, Clone, Default)]
pub struct XmlExporter {
    config: ExportConfig,
}

impl XmlExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl Exporter for XmlExporter {
    fn export_definitions(&self, definitions: &Definitions) -> Result<String, Error> {
        let writer = match self.config.indent() {
            0 => Writer::new(Vec::new()),
            indent => Writer::new_with_indent(Vec::new(), b' ', indent),
        };
        let mut xml = XmlWriter { writer };

        xml.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.start(
            "bpmn:definitions",
            &[
                ("xmlns:bpmn", BPMN_NS),
                ("xmlns:bpmndi", BPMNDI_NS),
                ("xmlns:dc", DC_NS),
                ("xmlns:di", DI_NS),
                ("id", definitions.id.as_str()),
                ("targetNamespace", TARGET_NS),
            ],
        )?;

        for process in &definitions.processes {
            xml.process(process)?;
        }
        if let Some(collaboration) = &definitions.collaboration {
            xml.collaboration(collaboration)?;
        }
        if let Some(diagram) = &definitions.diagram {
            xml.diagram(diagram)?;
        }

        xml.end("bpmn:definitions")?;

        let mut document = String::from_utf8(xml.writer.into_inner())?;
        document.push('\n');
        debug!(bytes = document.len(); "Serialized BPMN document");
        Ok(document)
    }
}

struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn write(&mut self, event: Event<'_>) -> Result<(), Error> {
        self.writer
            .write_event(event)
            .map_err(|err| Error::Write(err.to_string()))
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        self.write(Event::Start(element(name, attributes)))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), Error> {
        self.write(Event::Empty(element(name, attributes)))
    }

    fn end(&mut self, name: &str) -> Result<(), Error> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), Error> {
        self.start(name, &[])?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn process(&mut self, process: &Process) -> Result<(), Error> {
        let attributes = [("id", process.id.as_str()), ("isExecutable", "false")];
        if process.lane_set.is_none() && process.nodes.is_empty() && process.flows.is_empty() {
            return self.empty("bpmn:process", &attributes);
        }

        self.start("bpmn:process", &attributes)?;
        if let Some(lane_set) = &process.lane_set {
            self.lane_set("bpmn:laneSet", lane_set)?;
        }
        for node in &process.nodes {
            self.flow_node(node)?;
        }
        for flow in &process.flows {
            self.flow(flow)?;
        }
        self.end("bpmn:process")
    }

    fn lane_set(&mut self, tag: &str, lane_set: &LaneSet) -> Result<(), Error> {
        self.start(tag, &[("id", lane_set.id.as_str())])?;
        for lane in &lane_set.lanes {
            let attributes = [("id", lane.id.as_str()), ("name", lane.name.as_str())];
            if lane.flow_node_refs.is_empty() && lane.child_lane_set.is_none() {
                self.empty("bpmn:lane", &attributes)?;
                continue;
            }
            self.start("bpmn:lane", &attributes)?;
            for node in &lane.flow_node_refs {
                self.text_element("bpmn:flowNodeRef", node)?;
            }
            if let Some(child) = &lane.child_lane_set {
                self.lane_set("bpmn:childLaneSet", child)?;
            }
            self.end("bpmn:lane")?;
        }
        self.end(tag)
    }

    fn flow_node(&mut self, node: &FlowNode) -> Result<(), Error> {
        let tag = format!("bpmn:{}", node.tag);
        let attributes = [("id", node.id.as_str()), ("name", node.name.as_str())];
        if node.is_empty() {
            return self.empty(&tag, &attributes);
        }

        self.start(&tag, &attributes)?;
        for flow in &node.incoming {
            self.text_element("bpmn:incoming", flow)?;
        }
        for flow in &node.outgoing {
            self.text_element("bpmn:outgoing", flow)?;
        }
        if let Some(definition) = &node.event_definition {
            self.empty(
                &format!("bpmn:{}", definition.tag),
                &[("id", definition.id.as_str())],
            )?;
        }
        self.end(&tag)
    }

    fn flow(&mut self, flow: &Flow) -> Result<(), Error> {
        let mut attributes = vec![("id", flow.id.as_str())];
        if let Some(name) = &flow.name {
            attributes.push(("name", name.as_str()));
        }
        if let Some(source) = &flow.source_ref {
            attributes.push(("sourceRef", source.as_str()));
        }
        if let Some(target) = &flow.target_ref {
            attributes.push(("targetRef", target.as_str()));
        }
        if let FlowKind::Association { directed } = flow.kind {
            attributes.push(("associationDirection", if directed { "One" } else { "None" }));
        }
        self.empty(&format!("bpmn:{}", flow.kind.tag()), &attributes)
    }

    fn collaboration(&mut self, collaboration: &Collaboration) -> Result<(), Error> {
        let attributes = [("id", collaboration.id.as_str())];
        if collaboration.participants.is_empty() && collaboration.message_flows.is_empty() {
            return self.empty("bpmn:collaboration", &attributes);
        }

        self.start("bpmn:collaboration", &attributes)?;
        for participant in &collaboration.participants {
            self.empty(
                "bpmn:participant",
                &[
                    ("id", participant.id.as_str()),
                    ("name", participant.name.as_str()),
                    ("processRef", participant.process_ref.as_str()),
                ],
            )?;
        }
        for flow in &collaboration.message_flows {
            self.flow(flow)?;
        }
        self.end("bpmn:collaboration")
    }

    fn diagram(&mut self, diagram: &Diagram) -> Result<(), Error> {
        self.start("bpmndi:BPMNDiagram", &[("id", diagram.id.as_str())])?;
        self.start(
            "bpmndi:BPMNPlane",
            &[
                ("id", diagram.plane_id.as_str()),
                ("bpmnElement", diagram.plane_element.as_str()),
            ],
        )?;
        for shape in &diagram.shapes {
            self.shape(shape)?;
        }
        for edge in &diagram.edges {
            self.edge(edge)?;
        }
        self.end("bpmndi:BPMNPlane")?;
        self.end("bpmndi:BPMNDiagram")
    }

    fn shape(&mut self, shape: &Shape) -> Result<(), Error> {
        let mut attributes = vec![
            ("id", shape.id.as_str()),
            ("bpmnElement", shape.element_ref.as_str()),
        ];
        if shape.is_horizontal {
            attributes.push(("isHorizontal", "true"));
        }
        self.start("bpmndi:BPMNShape", &attributes)?;
        self.bounds(shape.bounds)?;
        self.end("bpmndi:BPMNShape")
    }

    fn bounds(&mut self, bounds: Bounds) -> Result<(), Error> {
        let x = bounds.min_x().to_string();
        let y = bounds.min_y().to_string();
        let width = bounds.width().to_string();
        let height = bounds.height().to_string();
        self.empty(
            "dc:Bounds",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
            ],
        )
    }

    fn edge(&mut self, edge: &Edge) -> Result<(), Error> {
        self.start(
            "bpmndi:BPMNEdge",
            &[("id", edge.id.as_str()), ("bpmnElement", edge.element_ref.as_str())],
        )?;
        for point in edge.waypoints {
            self.waypoint(point)?;
        }
        self.end("bpmndi:BPMNEdge")
    }

    fn waypoint(&mut self, point: Point) -> Result<(), Error> {
        let x = point.x().to_string();
        let y = point.y().to_string();
        self.empty("di:waypoint", &[("x", x.as_str()), ("y", y.as_str())])
    }
}

fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    element
}
