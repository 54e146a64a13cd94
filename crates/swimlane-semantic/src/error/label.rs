//! Labeled model locations for diagnostic messages.
//!
//! A label associates a message with an element of the model, and
//! optionally with the field of that element at fault.

use std::fmt;

use swimlane_core::model::{ElementId, ReferenceRole};

/// The field of an element a label points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Source,
    Target,
    Elements,
}

impl From<ReferenceRole> for Field {
    fn from(role: ReferenceRole) -> Self {
        match role {
            ReferenceRole::Source => Field::Source,
            ReferenceRole::Target => Field::Target,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Source => write!(f, "source"),
            Field::Target => write!(f, "target"),
            Field::Elements => write!(f, "elements"),
        }
    }
}

/// A labeled element of the model.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the offending element.
/// - **Secondary labels** provide context, such as "first defined here".
#[derive(Debug, Clone)]
pub struct Label {
    element: ElementId,
    field: Option<Field>,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(element: ElementId, field: Option<Field>, message: impl Into<String>) -> Self {
        Self {
            element,
            field,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(
        element: ElementId,
        field: Option<Field>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element,
            field,
            message: message.into(),
            is_primary: false,
        }
    }

    /// The element this label applies to.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The field of the element at fault, if any.
    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
