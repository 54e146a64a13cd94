//! Error codes for the Swimlane diagnostic system.
//!
//! Codes are organized by concern:
//! - `E1xx` - Reference errors
//! - `E2xx` - Containment errors
//! - `E3xx` - Naming errors
//! - `W0xx` - Advisory warnings

use std::fmt;

use crate::error::Severity;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Reference Errors (E1xx)
    // =========================================================================
    /// Unresolved reference.
    ///
    /// A connection endpoint names a node that is not visible from the
    /// connection's scope.
    E100,

    // =========================================================================
    // Containment Errors (E2xx)
    // =========================================================================
    /// Connection crosses a pool boundary.
    ///
    /// Sequence flows and associations must stay within one pool.
    E200,

    /// Connection mixes pooled and unpooled nodes.
    ///
    /// One endpoint lives in a pool and the other at the top level.
    E201,

    /// Message flow endpoint outside of any pool.
    ///
    /// Message flows connect participants, so both endpoints need a pool.
    E202,

    /// Message flow within a single pool.
    ///
    /// Message flows must connect two distinct pools.
    E203,

    // =========================================================================
    // Naming Errors (E3xx)
    // =========================================================================
    /// Duplicate node name.
    ///
    /// Two nodes in the same pool, lane or top-level scope share a name.
    E300,

    // =========================================================================
    // Warnings (W0xx)
    // =========================================================================
    /// Self-loop.
    ///
    /// A connection starts and ends at the same node.
    W001,

    /// Name reused across containers.
    ///
    /// A node name already appears in a different pool or lane.
    W002,

    /// Empty pool.
    W003,

    /// Empty lane.
    W004,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
            ErrorCode::W003 => "W003",
            ErrorCode::W004 => "W004",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unresolved reference",
            ErrorCode::E200 => "connection crosses pool boundary",
            ErrorCode::E201 => "connection mixes pooled and unpooled nodes",
            ErrorCode::E202 => "message flow endpoint outside of a pool",
            ErrorCode::E203 => "message flow within a single pool",
            ErrorCode::E300 => "duplicate node name",
            ErrorCode::W001 => "self-loop",
            ErrorCode::W002 => "name reused across containers",
            ErrorCode::W003 => "empty pool",
            ErrorCode::W004 => "empty lane",
        }
    }

    /// The fixed severity of diagnostics carrying this code.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::W001 | ErrorCode::W002 | ErrorCode::W003 | ErrorCode::W004 => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
