//! Diagnostics and the result aggregator
//!
//! A [`Diagnostic`] is created once by the comparator and never mutated; the
//! aggregator only reorders the list. Ordering is severity descending, then
//! element category ascending, then element name ascending — stable and
//! deterministic for identical inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::SchemaNode;
use crate::severity::Severity;

/// Which part of the document a diagnostic points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Components,
    Extensions,
    ExternalDocs,
    Info,
    Paths,
    SecurityRequirements,
    Servers,
    Tags,
}

impl Element {
    /// Fixed category order used as the second sort key.
    pub fn rank(&self) -> u8 {
        match self {
            Element::Components => 0,
            Element::Extensions => 1,
            Element::ExternalDocs => 2,
            Element::Info => 3,
            Element::Paths => 4,
            Element::SecurityRequirements => 5,
            Element::Servers => 6,
            Element::Tags => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Components => "Components",
            Element::Extensions => "Extensions",
            Element::ExternalDocs => "ExternalDocs",
            Element::Info => "Info",
            Element::Paths => "Paths",
            Element::SecurityRequirements => "SecurityRequirements",
            Element::Servers => "Servers",
            Element::Tags => "Tags",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported difference between the two documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub element: Element,
    pub severity: Severity,
    pub element_name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_schema: Option<SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_schema: Option<SchemaNode>,
}

impl Diagnostic {
    pub fn new(
        element: Element,
        severity: Severity,
        element_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element,
            severity,
            element_name: element_name.into(),
            message: message.into(),
            current_schema: None,
            previous_schema: None,
        }
    }

    /// Attach the schema payloads a schema-map mismatch refers to.
    pub fn with_schemas(mut self, current: SchemaNode, previous: SchemaNode) -> Self {
        self.current_schema = Some(current);
        self.previous_schema = Some(previous);
        self
    }
}

/// Sort diagnostics into their final deterministic order.
///
/// Stable sort by (severity rank descending, element rank ascending,
/// element name ascending); individual diagnostics are untouched.
pub fn finalize(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        b.severity
            .rank()
            .cmp(&a.severity.rank())
            .then_with(|| a.element.rank().cmp(&b.element.rank()))
            .then_with(|| a.element_name.cmp(&b.element_name))
    });
    diagnostics
}

/// Whether any diagnostic breaks the compared API.
pub fn is_broken(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity.is_breaking())
}
