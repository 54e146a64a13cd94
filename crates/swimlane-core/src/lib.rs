//! Swimlane Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Swimlane
//! process-diagram language:
//!
//! - **Model**: the containment tree of events, tasks, gateways, connections,
//!   pools and lanes ([`model`] module)
//! - **Geometry**: basic geometric types used by layout ([`geometry`] module)
//! - **Errors**: builder misuse errors ([`ModelError`])

pub mod geometry;
pub mod model;

mod error;

pub use error::ModelError;
