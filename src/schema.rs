//! Schema nodes and the field-level equality check
//!
//! Equality here collects complaints instead of returning a bare boolean, so
//! a mismatch diagnostic can say exactly which constraints diverged.
//!
//! The null policy is deliberately asymmetric: a field participates in the
//! comparison only when BOTH sides carry a present value. A constraint set on
//! one side and absent on the other is skipped, never a mismatch — so a
//! comparison in which every field is skipped reports the schemas equal.
//! A removed constraint is therefore invisible to this check; the behavior is
//! intentional and pinned by tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Structural definition of a single value's shape and constraints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Set by an adapter when a `$ref` could not be resolved.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unresolved_reference: bool,
}

/// Outcome of a schema comparison
#[derive(Debug, Clone)]
pub struct SchemaComparison {
    /// False iff at least one mutually-present field mismatched.
    pub equal: bool,
    /// One entry per mismatched field: `"<field>: <a> vs <b>"`.
    pub complaints: Vec<String>,
}

fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn check_flag(field: &str, a: bool, b: bool, complaints: &mut Vec<String>) {
    if a != b {
        complaints.push(format!("{}: {} vs {}", field, a, b));
    }
}

fn check_text(field: &str, a: &Option<String>, b: &Option<String>, complaints: &mut Vec<String>) {
    if text_present(a) && text_present(b) && a != b {
        complaints.push(format!(
            "{}: {} vs {}",
            field,
            a.as_deref().unwrap_or_default(),
            b.as_deref().unwrap_or_default()
        ));
    }
}

fn check_opt<T: PartialEq + Display + Copy>(
    field: &str,
    a: Option<T>,
    b: Option<T>,
    complaints: &mut Vec<String>,
) {
    if let (Some(a), Some(b)) = (a, b) {
        if a != b {
            complaints.push(format!("{}: {} vs {}", field, a, b));
        }
    }
}

/// Field-level equality between two schema nodes.
///
/// Optional fields are compared only when present on both sides (strings
/// must additionally be non-blank); the always-present flags always
/// participate. See the module docs for the asymmetric-null policy.
pub fn compare_schemas(a: &SchemaNode, b: &SchemaNode) -> SchemaComparison {
    let mut complaints = Vec::new();

    check_flag("deprecated", a.deprecated, b.deprecated, &mut complaints);
    check_text("description", &a.description, &b.description, &mut complaints);
    check_opt(
        "exclusiveMaximum",
        a.exclusive_maximum,
        b.exclusive_maximum,
        &mut complaints,
    );
    check_opt(
        "exclusiveMinimum",
        a.exclusive_minimum,
        b.exclusive_minimum,
        &mut complaints,
    );
    check_text("format", &a.format, &b.format, &mut complaints);
    check_opt("maximum", a.maximum, b.maximum, &mut complaints);
    check_opt("maxItems", a.max_items, b.max_items, &mut complaints);
    check_opt("maxLength", a.max_length, b.max_length, &mut complaints);
    check_opt(
        "maxProperties",
        a.max_properties,
        b.max_properties,
        &mut complaints,
    );
    check_opt("minimum", a.minimum, b.minimum, &mut complaints);
    check_opt("minItems", a.min_items, b.min_items, &mut complaints);
    check_opt("minLength", a.min_length, b.min_length, &mut complaints);
    check_opt(
        "minProperties",
        a.min_properties,
        b.min_properties,
        &mut complaints,
    );
    check_opt("multipleOf", a.multiple_of, b.multiple_of, &mut complaints);
    check_flag("nullable", a.nullable, b.nullable, &mut complaints);
    check_text("pattern", &a.pattern, &b.pattern, &mut complaints);
    check_flag("readOnly", a.read_only, b.read_only, &mut complaints);
    check_text("title", &a.title, &b.title, &mut complaints);
    check_text("type", &a.schema_type, &b.schema_type, &mut complaints);
    check_opt("uniqueItems", a.unique_items, b.unique_items, &mut complaints);
    check_flag(
        "unresolvedReference",
        a.unresolved_reference,
        b.unresolved_reference,
        &mut complaints,
    );
    check_flag("writeOnly", a.write_only, b.write_only, &mut complaints);

    SchemaComparison {
        equal: complaints.is_empty(),
        complaints,
    }
}

impl SchemaNode {
    /// Render every present field into one delimited string.
    ///
    /// Used for diagnostic payloads only; equality goes through
    /// [`compare_schemas`].
    pub fn to_report(&self, sep: &str) -> String {
        let mut out = String::new();
        let mut push = |segment: String| {
            out.push_str(&segment);
            out.push_str(sep);
        };

        push(format!("Deprecated: {}", self.deprecated));
        if text_present(&self.description) {
            push(format!(
                "Description: {}",
                self.description.as_deref().unwrap_or_default()
            ));
        }
        if !self.enum_values.is_empty() {
            let values: Vec<String> = self.enum_values.iter().map(|v| v.to_string()).collect();
            push(format!("Enum: {}", values.join(",")));
        }
        if let Some(v) = self.exclusive_maximum {
            push(format!("ExclusiveMaximum: {}", v));
        }
        if let Some(v) = self.exclusive_minimum {
            push(format!("ExclusiveMinimum: {}", v));
        }
        if text_present(&self.format) {
            push(format!("Format: {}", self.format.as_deref().unwrap_or_default()));
        }
        if let Some(v) = self.maximum {
            push(format!("Maximum: {}", v));
        }
        if let Some(v) = self.max_items {
            push(format!("Max Items: {}", v));
        }
        if let Some(v) = self.max_length {
            push(format!("Max Length: {}", v));
        }
        if let Some(v) = self.max_properties {
            push(format!("Max Properties: {}", v));
        }
        if let Some(v) = self.minimum {
            push(format!("Minimum: {}", v));
        }
        if let Some(v) = self.min_items {
            push(format!("Min Items: {}", v));
        }
        if let Some(v) = self.min_length {
            push(format!("Min Length: {}", v));
        }
        if let Some(v) = self.min_properties {
            push(format!("Min Properties: {}", v));
        }
        if let Some(v) = self.multiple_of {
            push(format!("Multiple Of: {}", v));
        }
        push(format!("Nullable: {}", self.nullable));
        if text_present(&self.pattern) {
            push(format!(
                "Pattern: {}",
                self.pattern.as_deref().unwrap_or_default()
            ));
        }
        if !self.properties.is_empty() {
            let names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
            push(format!("Properties: {}", names.join(", ")));
        }
        push(format!("ReadOnly: {}", self.read_only));
        if let Some(reference) = &self.reference {
            push(format!("Reference: {}", reference));
        }
        if !self.required.is_empty() {
            push(format!("Required: {}", self.required.join(", ")));
        }
        if text_present(&self.title) {
            push(format!("Title: {}", self.title.as_deref().unwrap_or_default()));
        }
        if text_present(&self.schema_type) {
            push(format!(
                "Type: {}",
                self.schema_type.as_deref().unwrap_or_default()
            ));
        }
        if let Some(v) = self.unique_items {
            push(format!("Unique Items: {}", v));
        }
        push(format!("Unresolved Reference: {}", self.unresolved_reference));
        push(format!("Write Only: {}", self.write_only));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_schemas_equal() {
        let a = SchemaNode {
            schema_type: Some("string".into()),
            max_length: Some(10),
            ..Default::default()
        };
        let result = compare_schemas(&a, &a.clone());
        assert!(result.equal);
        assert!(result.complaints.is_empty());
    }

    #[test]
    fn test_one_sided_field_is_skipped() {
        let a = SchemaNode {
            minimum: Some(1.0),
            ..Default::default()
        };
        let b = SchemaNode::default();
        let result = compare_schemas(&a, &b);
        assert!(result.equal, "one-sided minimum must not be a mismatch");
    }

    #[test]
    fn test_mutual_field_mismatch_complains_once() {
        let a = SchemaNode {
            minimum: Some(1.0),
            ..Default::default()
        };
        let b = SchemaNode {
            minimum: Some(2.0),
            ..Default::default()
        };
        let result = compare_schemas(&a, &b);
        assert!(!result.equal);
        assert_eq!(result.complaints, vec!["minimum: 1 vs 2"]);
    }

    #[test]
    fn test_flags_always_participate() {
        let a = SchemaNode {
            nullable: true,
            ..Default::default()
        };
        let b = SchemaNode::default();
        let result = compare_schemas(&a, &b);
        assert!(!result.equal);
        assert_eq!(result.complaints, vec!["nullable: true vs false"]);
    }

    #[test]
    fn test_blank_text_counts_as_absent() {
        let a = SchemaNode {
            format: Some("  ".into()),
            ..Default::default()
        };
        let b = SchemaNode {
            format: Some("int64".into()),
            ..Default::default()
        };
        assert!(compare_schemas(&a, &b).equal);
    }

    #[test]
    fn test_report_renders_present_fields() {
        let schema = SchemaNode {
            schema_type: Some("integer".into()),
            format: Some("int32".into()),
            minimum: Some(0.0),
            ..Default::default()
        };
        let report = schema.to_report("; ");
        assert!(report.contains("Type: integer"));
        assert!(report.contains("Format: int32"));
        assert!(report.contains("Minimum: 0"));
        assert!(!report.contains("Pattern:"));
    }
}
