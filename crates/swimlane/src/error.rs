//! Error types for Swimlane operations.
//!
//! This module provides the main error type [`SwimlaneError`] which wraps
//! the error conditions of every compilation stage.

use std::io;

use thiserror::Error;

use swimlane_core::ModelError;
use swimlane_semantic::ValidationError;

/// The main error type for Swimlane operations.
///
/// # Diagnostic Variants
///
/// The `Validation` variant carries every diagnostic of the failed run,
/// warnings included, so callers can report all of them at once.
#[derive(Debug, Error)]
pub enum SwimlaneError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(#[from] crate::export::Error),
}
