//! Semantic validation of linked process models.
//!
//! Validation is a set of read-only walks over the model tree built on the
//! [`Visitor`] trait. Every check appends to a shared
//! [`DiagnosticCollector`] instead of aborting, so one bad connection never
//! hides problems elsewhere in the model.
//!
//! ## Checks Performed
//!
//! - **Connection legality**: every reference is resolved, sequence flows and
//!   associations stay inside one pool (or outside all pools), message flows
//!   connect two distinct pools, and self-loops are flagged
//! - **Duplicate names**: node names are unique per pool/lane scope, with an
//!   advisory warning when a name recurs in a different container
//! - **Empty containers**: pools and lanes without any direct element

use indexmap::{IndexMap, map::Entry};
use log::debug;

use swimlane_core::model::{
    Connection, Connector, Container, Element, ElementId, Model, Node, ReferenceRole,
};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode, Field, ValidationError};

/// Scope path used for elements outside of every pool.
pub const GLOBAL_SCOPE: &str = "global";

/// Visitor trait for read-only traversal of a [`Model`].
///
/// Default implementations recurse into pools and lanes so implementors can
/// override only the methods they care about.
pub trait Visitor {
    /// Visit a complete model
    fn visit_model(&mut self, model: &Model) {
        self.visit_elements(model, model.root());
    }

    /// Visit a list of sibling elements
    fn visit_elements(&mut self, model: &Model, elements: &[ElementId]) {
        for id in elements {
            self.visit_element(model, *id);
        }
    }

    /// Visit a single element
    fn visit_element(&mut self, model: &Model, id: ElementId) {
        match model.element(id) {
            Some(Element::Node(node)) => self.visit_node(model, id, node),
            Some(Element::Connection(connection)) => {
                self.visit_connection(model, id, connection)
            }
            Some(Element::Pool(pool)) => self.visit_pool(model, id, pool),
            Some(Element::Lane(lane)) => self.visit_lane(model, id, lane),
            None => {}
        }
    }

    /// Visit a flow node
    fn visit_node(&mut self, _model: &Model, _id: ElementId, _node: &Node) {}

    /// Visit a connection
    fn visit_connection(&mut self, _model: &Model, _id: ElementId, _connection: &Connection) {}

    /// Visit a pool and its elements
    fn visit_pool(&mut self, model: &Model, _id: ElementId, pool: &Container) {
        self.visit_elements(model, pool.elements());
    }

    /// Visit a lane and its elements
    fn visit_lane(&mut self, model: &Model, _id: ElementId, lane: &Container) {
        self.visit_elements(model, lane.elements());
    }
}

/// Run every check and return all diagnostics, errors and warnings alike.
pub fn validate(model: &Model) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    run_checks(model, &mut collector);
    collector.into_diagnostics()
}

/// Run every check, failing if any error was found.
///
/// On success the returned vector holds the warnings.
///
/// # Errors
///
/// Returns a [`ValidationError`] carrying all diagnostics when at least one
/// of them is an error.
pub fn validate_model(model: &Model) -> Result<Vec<Diagnostic>, ValidationError> {
    let mut collector = DiagnosticCollector::new();
    run_checks(model, &mut collector);
    collector.finish()
}

fn run_checks(model: &Model, collector: &mut DiagnosticCollector) {
    for connection in model.connections() {
        check_connection(model, connection, collector);
    }
    check_duplicate_node_names(model, collector);
    check_empty_containers(model, collector);

    debug!(
        elements = model.len(),
        diagnostics = collector.diagnostics().len(),
        has_errors = collector.has_errors();
        "Validated model"
    );
}

/// Check the references and pool placement of one connection.
///
/// Does nothing if `id` is not a connection.
pub fn check_connection(model: &Model, id: ElementId, collector: &mut DiagnosticCollector) {
    let Some(connection) = model.connection(id) else {
        return;
    };
    let connector = connection.connector();

    let mut endpoints = [None, None];
    for (slot, role) in endpoints
        .iter_mut()
        .zip([ReferenceRole::Source, ReferenceRole::Target])
    {
        let reference = connection.reference(role);
        match reference.node() {
            Some(node) => *slot = Some(node),
            None => collector.emit(
                Diagnostic::error(format!(
                    "unresolved {role} reference `{}`",
                    reference.text()
                ))
                .with_code(ErrorCode::E100)
                .with_label(
                    id,
                    Some(role.into()),
                    format!("no node named `{}` is visible here", reference.text()),
                )
                .with_help(unresolved_help(connector)),
            ),
        }
    }

    let [Some(source), Some(target)] = endpoints else {
        return;
    };

    let source_pool = model.enclosing_pool(source);
    let target_pool = model.enclosing_pool(target);
    let noun = connector_noun(connector);

    if connector.is_message_flow() {
        match (source_pool, target_pool) {
            (None, _) | (_, None) => {
                let role = if source_pool.is_none() {
                    ReferenceRole::Source
                } else {
                    ReferenceRole::Target
                };
                let node = if source_pool.is_none() { source } else { target };
                collector.emit(
                    Diagnostic::error(format!(
                        "message flow {role} `{}` is not inside a pool",
                        display_name(model, node)
                    ))
                    .with_code(ErrorCode::E202)
                    .with_label(id, Some(role.into()), "endpoint outside of every pool")
                    .with_secondary_label(node, Some(Field::Name), "declared here")
                    .with_help("message flows connect nodes of two different pools"),
                );
            }
            (Some(a), Some(b)) if a == b => collector.emit(
                Diagnostic::error(format!(
                    "message flow stays within pool `{}`",
                    display_name(model, a)
                ))
                .with_code(ErrorCode::E203)
                .with_label(id, None, "both endpoints share one pool")
                .with_secondary_label(a, Some(Field::Name), "pool declared here")
                .with_help("use a sequence flow `-->` inside a pool"),
            ),
            _ => {}
        }
    } else {
        match (source_pool, target_pool) {
            (Some(a), Some(b)) if a != b => collector.emit(
                Diagnostic::error(format!(
                    "{noun} crosses from pool `{}` to pool `{}`",
                    display_name(model, a),
                    display_name(model, b)
                ))
                .with_code(ErrorCode::E200)
                .with_label(id, Some(Field::Target), "target lives in another pool")
                .with_help("use a message flow `~>` to connect different pools"),
            ),
            (Some(_), None) | (None, Some(_)) => {
                let (pooled, unpooled) = if source_pool.is_some() {
                    (source, target)
                } else {
                    (target, source)
                };
                collector.emit(
                    Diagnostic::error(format!(
                        "{noun} connects pooled node `{}` with unpooled node `{}`",
                        display_name(model, pooled),
                        display_name(model, unpooled)
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(id, None, "mixes pooled and unpooled nodes")
                    .with_secondary_label(unpooled, Some(Field::Name), "declared outside of every pool"),
                );
            }
            _ => {}
        }
    }

    if source == target {
        collector.emit(
            Diagnostic::warning(format!(
                "{noun} connects `{}` to itself",
                display_name(model, source)
            ))
            .with_code(ErrorCode::W001)
            .with_label(id, None, "self-loop"),
        );
    }
}

/// Check that node names are unique within each pool/lane scope.
pub fn check_duplicate_node_names(model: &Model, collector: &mut DiagnosticCollector) {
    let mut checker = NameChecker {
        collector,
        path: Vec::new(),
        containers: Vec::new(),
        scopes: IndexMap::new(),
        everywhere: IndexMap::new(),
    };
    checker.visit_model(model);
}

/// Warn about pools and lanes with no direct elements.
pub fn check_empty_containers(model: &Model, collector: &mut DiagnosticCollector) {
    EmptyContainerChecker { collector }.visit_model(model);
}

/// Scope path of an element: the dotted names of its enclosing pools and
/// lanes, outermost first, or [`GLOBAL_SCOPE`].
pub fn scope_path(model: &Model, id: ElementId) -> String {
    let mut names: Vec<&str> = model
        .ancestors(id)
        .filter_map(|ancestor| model.container(ancestor).map(Container::name))
        .collect();
    if names.is_empty() {
        return GLOBAL_SCOPE.to_string();
    }
    names.reverse();
    names.join(".")
}

struct NameChecker<'c> {
    collector: &'c mut DiagnosticCollector,
    /// Names of the pools and lanes currently entered.
    path: Vec<String>,
    /// Handles of the pools and lanes currently entered.
    containers: Vec<ElementId>,
    /// scope path -> name -> first node
    scopes: IndexMap<String, IndexMap<String, ElementId>>,
    /// name -> (first node, its container)
    everywhere: IndexMap<String, (ElementId, Option<ElementId>)>,
}

impl NameChecker<'_> {
    fn enter(&mut self, model: &Model, id: ElementId, container: &Container) {
        self.path.push(container.name().to_string());
        self.containers.push(id);
        self.visit_elements(model, container.elements());
        self.containers.pop();
        self.path.pop();
    }

    fn current_scope(&self) -> String {
        if self.path.is_empty() {
            GLOBAL_SCOPE.to_string()
        } else {
            self.path.join(".")
        }
    }
}

impl Visitor for NameChecker<'_> {
    fn visit_node(&mut self, model: &Model, id: ElementId, node: &Node) {
        let scope = self.current_scope();
        let seen = self.scopes.entry(scope.clone()).or_default();
        match seen.entry(node.name().to_string()) {
            Entry::Occupied(first) => {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "duplicate node name `{}` in scope `{scope}`",
                        node.name()
                    ))
                    .with_code(ErrorCode::E300)
                    .with_label(id, Some(Field::Name), "duplicate definition")
                    .with_secondary_label(*first.get(), Some(Field::Name), "first defined here")
                    .with_help("rename one of the nodes"),
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let container = self.containers.last().copied();
        match self.everywhere.get(node.name()) {
            Some(&(first, first_container))
                if container.is_some() && first_container != container =>
            {
                let elsewhere = first_container
                    .and_then(|c| model.name(c))
                    .unwrap_or(GLOBAL_SCOPE);
                self.collector.emit(
                    Diagnostic::warning(format!(
                        "node name `{}` is also used in `{elsewhere}`",
                        node.name()
                    ))
                    .with_code(ErrorCode::W002)
                    .with_label(id, Some(Field::Name), "name reused here")
                    .with_secondary_label(first, Some(Field::Name), "first used here"),
                );
            }
            Some(_) => {}
            None => {
                self.everywhere
                    .insert(node.name().to_string(), (id, container));
            }
        }
    }

    fn visit_pool(&mut self, model: &Model, id: ElementId, pool: &Container) {
        self.enter(model, id, pool);
    }

    fn visit_lane(&mut self, model: &Model, id: ElementId, lane: &Container) {
        self.enter(model, id, lane);
    }
}

struct EmptyContainerChecker<'c> {
    collector: &'c mut DiagnosticCollector,
}

impl Visitor for EmptyContainerChecker<'_> {
    fn visit_pool(&mut self, model: &Model, id: ElementId, pool: &Container) {
        if pool.is_empty() {
            self.collector.emit(
                Diagnostic::warning(format!("pool `{}` is empty", pool.name()))
                    .with_code(ErrorCode::W003)
                    .with_label(id, Some(Field::Elements), "no elements declared")
                    .with_help("empty pools produce no process"),
            );
        }
        self.visit_elements(model, pool.elements());
    }

    fn visit_lane(&mut self, model: &Model, id: ElementId, lane: &Container) {
        if lane.is_empty() {
            self.collector.emit(
                Diagnostic::warning(format!("lane `{}` is empty", lane.name()))
                    .with_code(ErrorCode::W004)
                    .with_label(id, Some(Field::Elements), "no elements declared"),
            );
        }
        self.visit_elements(model, lane.elements());
    }
}

fn connector_noun(connector: Connector) -> &'static str {
    match connector {
        Connector::Sequence => "sequence flow",
        Connector::DirectedAssociation | Connector::Association => "association",
        Connector::Message => "message flow",
    }
}

fn unresolved_help(connector: Connector) -> &'static str {
    if connector.is_message_flow() {
        "message flows can only reference nodes declared inside a pool"
    } else {
        "declare the node in the same pool, or at the top level for unpooled connections"
    }
}

fn display_name(model: &Model, id: ElementId) -> &str {
    model.name(id).unwrap_or("?")
}
