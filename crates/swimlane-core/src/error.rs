//! Error type for model construction.

use thiserror::Error;

use crate::model::ElementId;

/// Errors raised while building or linking a [`Model`](crate::model::Model).
///
/// These describe misuse of the builder API, never semantic problems of the
/// process itself; those are reported as diagnostics by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("element {0} does not exist in this model")]
    UnknownElement(ElementId),

    #[error("element {0} is not a pool or a lane")]
    NotAContainer(ElementId),

    #[error("element {0} is not a node")]
    NotANode(ElementId),

    #[error("element {0} is not a connection")]
    NotAConnection(ElementId),

    #[error("lane `{0}` must be declared inside a pool or another lane")]
    TopLevelLane(String),

    #[error("unknown {kind} `{keyword}`")]
    UnknownKeyword { kind: &'static str, keyword: String },
}
