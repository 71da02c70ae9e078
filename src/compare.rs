//! The comparison engine
//!
//! One synchronous pass over both documents. Every keyed collection goes
//! through the same two-directional diff routine, driven by a table of
//! [`MapSpec`] entries, so the lookup/compare/emit pattern exists exactly
//! once. A key present on only one side yields a single "missing" diagnostic
//! (emitted by the direction that observed the hole); a key present on both
//! sides with divergent values yields one "mismatched" diagnostic per
//! direction.
//!
//! Severities are never hardcoded: every diagnostic carries the policy's
//! severity for the comparison point that produced it.

use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use tracing::debug;

use crate::diagnostic::{Diagnostic, Element};
use crate::document::{ApiDocument, ExternalDocs, Info, Server, Tag};
use crate::error::{CompareError, Result, Side};
use crate::rules::{RuleId, RulePolicy};
use crate::schema::{compare_schemas, SchemaNode};
use crate::severity::Severity;
use crate::version;

/// Orientation labels for one direction of a two-sided pass.
#[derive(Debug, Clone, Copy)]
struct Orientation {
    /// The side being walked.
    left: &'static str,
    /// The side being probed for matches.
    right: &'static str,
    /// True when `left` is the current document.
    left_is_current: bool,
}

const CURRENT_FIRST: Orientation = Orientation {
    left: "Current",
    right: "Previous",
    left_is_current: true,
};

const PREVIOUS_FIRST: Orientation = Orientation {
    left: "Previous",
    right: "Current",
    left_is_current: false,
};

/// One table entry: a pair of keyed opaque maps and the rules governing
/// their diagnostics.
struct MapSpec<'v> {
    element: Element,
    prefix: &'static str,
    missing_rule: RuleId,
    mismatch_rule: RuleId,
    current: &'v BTreeMap<String, Value>,
    previous: &'v BTreeMap<String, Value>,
}

/// Inline value reprs longer than this fall back to a line-diff summary.
const INLINE_REPR_MAX: usize = 120;

/// Most changed lines quoted in a mismatch summary.
const SUMMARY_MAX_LINES: usize = 8;

/// Compares two documents under a rule policy.
///
/// Holds only a shared reference to the policy, so one policy instance can
/// serve any number of concurrent comparisons; each call owns its own
/// diagnostic list.
pub struct Comparator<'a> {
    rules: &'a RulePolicy,
}

impl<'a> Comparator<'a> {
    pub fn new(rules: &'a RulePolicy) -> Self {
        Self { rules }
    }

    /// Compare `current` against `previous`, producing an unordered
    /// diagnostic list. Callers pass the result through
    /// [`crate::diagnostic::finalize`] for the deterministic ordering.
    ///
    /// Fails before emitting anything if either document lacks its `info`
    /// or `components` section.
    pub fn compare(
        &self,
        current: &ApiDocument,
        previous: &ApiDocument,
    ) -> Result<Vec<Diagnostic>> {
        let cur_info = require(&current.info, Side::Current, "info")?;
        let prev_info = require(&previous.info, Side::Previous, "info")?;
        let cur_components = require(&current.components, Side::Current, "components")?;
        let prev_components = require(&previous.components, Side::Previous, "components")?;

        let mut out = Vec::new();

        self.compare_versions(cur_info, prev_info, &mut out);
        self.compare_info(cur_info, prev_info, &mut out);
        self.compare_servers(&current.servers, &previous.servers, &mut out);

        self.diff_schema_maps(
            &cur_components.schemas,
            &prev_components.schemas,
            &mut out,
        );

        // Every opaque keyed collection, one routine.
        let opaque_maps = [
            MapSpec {
                element: Element::Paths,
                prefix: "Paths",
                missing_rule: RuleId::PathsMissing,
                mismatch_rule: RuleId::PathsMismatch,
                current: &current.paths,
                previous: &previous.paths,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Callbacks",
                missing_rule: RuleId::CallbacksMissing,
                mismatch_rule: RuleId::CallbacksMismatch,
                current: &cur_components.callbacks,
                previous: &prev_components.callbacks,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Examples",
                missing_rule: RuleId::ExamplesMissing,
                mismatch_rule: RuleId::ExamplesMismatch,
                current: &cur_components.examples,
                previous: &prev_components.examples,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Extensions",
                missing_rule: RuleId::ExtensionsMissing,
                mismatch_rule: RuleId::ExtensionsMismatch,
                current: &cur_components.extensions,
                previous: &prev_components.extensions,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Headers",
                missing_rule: RuleId::HeadersMissing,
                mismatch_rule: RuleId::HeadersMismatch,
                current: &cur_components.headers,
                previous: &prev_components.headers,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Links",
                missing_rule: RuleId::LinksMissing,
                mismatch_rule: RuleId::LinksMismatch,
                current: &cur_components.links,
                previous: &prev_components.links,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Parameters",
                missing_rule: RuleId::ParametersMissing,
                mismatch_rule: RuleId::ParametersMismatch,
                current: &cur_components.parameters,
                previous: &prev_components.parameters,
            },
            MapSpec {
                element: Element::Components,
                prefix: "RequestBodies",
                missing_rule: RuleId::RequestBodiesMissing,
                mismatch_rule: RuleId::RequestBodiesMismatch,
                current: &cur_components.request_bodies,
                previous: &prev_components.request_bodies,
            },
            MapSpec {
                element: Element::Components,
                prefix: "Responses",
                missing_rule: RuleId::ResponsesMissing,
                mismatch_rule: RuleId::ResponsesMismatch,
                current: &cur_components.responses,
                previous: &prev_components.responses,
            },
            MapSpec {
                element: Element::Components,
                prefix: "SecuritySchemes",
                missing_rule: RuleId::SecuritySchemesMissing,
                mismatch_rule: RuleId::SecuritySchemesMismatch,
                current: &cur_components.security_schemes,
                previous: &prev_components.security_schemes,
            },
            MapSpec {
                element: Element::Extensions,
                prefix: "Extensions",
                missing_rule: RuleId::ExtensionsMissing,
                mismatch_rule: RuleId::ExtensionsMismatch,
                current: &current.extensions,
                previous: &previous.extensions,
            },
        ];

        for spec in &opaque_maps {
            self.diff_opaque_maps(spec, &mut out);
        }

        self.compare_external_docs(
            current.external_docs.as_ref(),
            previous.external_docs.as_ref(),
            &mut out,
        );
        self.compare_tags(&current.tags, &previous.tags, &mut out);

        debug!(diagnostics = out.len(), "comparison complete");
        Ok(out)
    }

    fn rule(&self, id: RuleId) -> Severity {
        self.rules.severity_for(id)
    }

    fn compare_versions(&self, cur: &Info, prev: &Info, out: &mut Vec<Diagnostic>) {
        let prev_major = version::major_version(&prev.version);
        let cur_major = version::major_version(&cur.version);
        if version::is_breaking(prev_major, cur_major) {
            out.push(Diagnostic::new(
                Element::Info,
                self.rule(RuleId::BreakingChange),
                "Version",
                format!(
                    "Breaking major version change: {} => {}",
                    prev.version, cur.version
                ),
            ));
        }
        if cur.version != prev.version {
            out.push(Diagnostic::new(
                Element::Info,
                self.rule(RuleId::InfoVersion),
                "Version",
                format!("{} => {}", prev.version, cur.version),
            ));
        }
    }

    fn compare_info(&self, cur: &Info, prev: &Info, out: &mut Vec<Diagnostic>) {
        let fields = [
            (RuleId::InfoTitle, "Title", &cur.title, &prev.title),
            (
                RuleId::InfoDescription,
                "Description",
                &cur.description,
                &prev.description,
            ),
            (
                RuleId::InfoContactName,
                "Contact.Name",
                &cur.contact.name,
                &prev.contact.name,
            ),
            (
                RuleId::InfoContactEmail,
                "Contact.Email",
                &cur.contact.email,
                &prev.contact.email,
            ),
            (
                RuleId::InfoContactUrl,
                "Contact.Url",
                &cur.contact.url,
                &prev.contact.url,
            ),
            (
                RuleId::InfoLicenseName,
                "License.Name",
                &cur.license.name,
                &prev.license.name,
            ),
            (
                RuleId::InfoLicenseUrl,
                "License.Url",
                &cur.license.url,
                &prev.license.url,
            ),
        ];

        for (id, name, cur_value, prev_value) in fields {
            if cur_value != prev_value {
                out.push(Diagnostic::new(
                    Element::Info,
                    self.rule(id),
                    name,
                    format!("{} => {}", prev_value, cur_value),
                ));
            }
        }

        // Terms of service only participates when both sides declare one.
        if let (Some(cur_tos), Some(prev_tos)) = (&cur.terms_of_service, &prev.terms_of_service) {
            if cur_tos != prev_tos {
                out.push(Diagnostic::new(
                    Element::Info,
                    self.rule(RuleId::InfoTermsOfService),
                    "TermsOfService",
                    format!("{} => {}", prev_tos, cur_tos),
                ));
            }
        }
    }

    fn compare_servers(&self, current: &[Server], previous: &[Server], out: &mut Vec<Diagnostic>) {
        self.diff_servers_one_way(current, previous, CURRENT_FIRST, out);
        self.diff_servers_one_way(previous, current, PREVIOUS_FIRST, out);
    }

    /// Servers are matched independently by description and by url; an entry
    /// with no counterpart on the probed side emits one missing diagnostic.
    fn diff_servers_one_way(
        &self,
        left: &[Server],
        right: &[Server],
        orientation: Orientation,
        out: &mut Vec<Diagnostic>,
    ) {
        for server in left {
            if !right.iter().any(|s| s.description == server.description) {
                out.push(Diagnostic::new(
                    Element::Servers,
                    self.rule(RuleId::ServerDescription),
                    server.description.clone(),
                    format!("{} Missing: {}", orientation.right, server.description),
                ));
            }
            if !right.iter().any(|s| s.url == server.url) {
                out.push(Diagnostic::new(
                    Element::Servers,
                    self.rule(RuleId::ServerUrl),
                    server.url.clone(),
                    format!("{} Missing: {}", orientation.right, server.url),
                ));
            }
        }
    }

    fn diff_schema_maps(
        &self,
        current: &BTreeMap<String, SchemaNode>,
        previous: &BTreeMap<String, SchemaNode>,
        out: &mut Vec<Diagnostic>,
    ) {
        self.diff_schemas_one_way(current, previous, CURRENT_FIRST, out);
        self.diff_schemas_one_way(previous, current, PREVIOUS_FIRST, out);
    }

    fn diff_schemas_one_way(
        &self,
        left: &BTreeMap<String, SchemaNode>,
        right: &BTreeMap<String, SchemaNode>,
        orientation: Orientation,
        out: &mut Vec<Diagnostic>,
    ) {
        for (key, left_schema) in left {
            let Some(right_schema) = right.get(key) else {
                out.push(Diagnostic::new(
                    Element::Components,
                    self.rule(RuleId::SchemasMissing),
                    format!("Schemas.{}", key),
                    format!("{} Missing Key: {}", orientation.right, key),
                ));
                continue;
            };

            let comparison = compare_schemas(left_schema, right_schema);
            if !comparison.equal {
                let (current_schema, previous_schema) = if orientation.left_is_current {
                    (left_schema.clone(), right_schema.clone())
                } else {
                    (right_schema.clone(), left_schema.clone())
                };
                out.push(
                    Diagnostic::new(
                        Element::Components,
                        self.rule(RuleId::SchemasMismatch),
                        format!("Schemas.{}", key),
                        format!(
                            "Mismatched Value: {}: {}",
                            key,
                            comparison.complaints.join("; ")
                        ),
                    )
                    .with_schemas(current_schema, previous_schema),
                );
            }
        }
    }

    fn diff_opaque_maps(&self, spec: &MapSpec<'_>, out: &mut Vec<Diagnostic>) {
        self.diff_opaque_one_way(spec, spec.current, spec.previous, CURRENT_FIRST, out);
        self.diff_opaque_one_way(spec, spec.previous, spec.current, PREVIOUS_FIRST, out);
    }

    fn diff_opaque_one_way(
        &self,
        spec: &MapSpec<'_>,
        left: &BTreeMap<String, Value>,
        right: &BTreeMap<String, Value>,
        orientation: Orientation,
        out: &mut Vec<Diagnostic>,
    ) {
        for (key, left_value) in left {
            // Guarded lookup: an absent match is an expected "missing"
            // condition, and nothing is ever read off it.
            let Some(right_value) = right.get(key) else {
                out.push(Diagnostic::new(
                    spec.element,
                    self.rule(spec.missing_rule),
                    format!("{}.{}", spec.prefix, key),
                    format!("{} Missing Key: {}", orientation.right, key),
                ));
                continue;
            };

            if left_value != right_value {
                out.push(Diagnostic::new(
                    spec.element,
                    self.rule(spec.mismatch_rule),
                    format!("{}.{}", spec.prefix, key),
                    mismatch_message(key, left_value, right_value, orientation),
                ));
            }
        }
    }

    fn compare_external_docs(
        &self,
        current: Option<&ExternalDocs>,
        previous: Option<&ExternalDocs>,
        out: &mut Vec<Diagnostic>,
    ) {
        // Both sides must carry the section for it to be comparable.
        let (Some(cur), Some(prev)) = (current, previous) else {
            return;
        };

        if cur.description != prev.description {
            out.push(Diagnostic::new(
                Element::ExternalDocs,
                self.rule(RuleId::ExternalDocsDescription),
                "ExternalDocs.Description",
                format!("Current: {}, Previous: {}", cur.description, prev.description),
            ));
        }
        if cur.url != prev.url {
            out.push(Diagnostic::new(
                Element::ExternalDocs,
                self.rule(RuleId::ExternalDocsUrl),
                "ExternalDocs.Url",
                format!("Current: {}, Previous: {}", cur.url, prev.url),
            ));
        }

        self.diff_opaque_maps(
            &MapSpec {
                element: Element::ExternalDocs,
                prefix: "ExternalDocs.Extensions",
                missing_rule: RuleId::ExternalDocsExtensionsMissing,
                mismatch_rule: RuleId::ExternalDocsExtensionsMismatch,
                current: &cur.extensions,
                previous: &prev.extensions,
            },
            out,
        );
    }

    fn compare_tags(&self, current: &[Tag], previous: &[Tag], out: &mut Vec<Diagnostic>) {
        self.diff_tags_one_way(current, previous, CURRENT_FIRST, out);
        self.diff_tags_one_way(previous, current, PREVIOUS_FIRST, out);
    }

    fn diff_tags_one_way(
        &self,
        left: &[Tag],
        right: &[Tag],
        orientation: Orientation,
        out: &mut Vec<Diagnostic>,
    ) {
        for tag in left {
            let Some(matched) = right.iter().find(|t| t.name == tag.name) else {
                out.push(Diagnostic::new(
                    Element::Tags,
                    self.rule(RuleId::TagMissing),
                    format!("Tags.{}", tag.name),
                    format!("{} Missing Tag: {}", orientation.right, tag.name),
                ));
                continue;
            };

            if matched.description != tag.description {
                out.push(Diagnostic::new(
                    Element::Tags,
                    self.rule(RuleId::TagMismatch),
                    format!("Tags.{}.Description", tag.name),
                    format!(
                        "Mismatched: {}: {}, {}: {}",
                        orientation.left, tag.description, orientation.right, matched.description
                    ),
                ));
            }

            if let (Some(left_ref), Some(right_ref)) =
                (&tag.external_resource, &matched.external_resource)
            {
                if left_ref != right_ref {
                    out.push(Diagnostic::new(
                        Element::Tags,
                        self.rule(RuleId::TagMismatch),
                        format!("Tags.{}.ExternalResource", tag.name),
                        format!(
                            "Mismatched: {}: {}, {}: {}",
                            orientation.left, left_ref, orientation.right, right_ref
                        ),
                    ));
                }
            }
        }
    }
}

fn require<'a, T>(
    section: &'a Option<T>,
    side: Side,
    name: &'static str,
) -> Result<&'a T> {
    section
        .as_ref()
        .ok_or(CompareError::MissingSection { side, section: name })
}

fn render_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string())
}

fn mismatch_message(key: &str, left: &Value, right: &Value, orientation: Orientation) -> String {
    let left_repr = render_value(left);
    let right_repr = render_value(right);
    if left_repr.len() <= INLINE_REPR_MAX && right_repr.len() <= INLINE_REPR_MAX {
        format!(
            "Mismatched Value: {}: {}: {}, {}: {}",
            key, orientation.left, left_repr, orientation.right, right_repr
        )
    } else {
        format!(
            "Mismatched Value: {}: {}",
            key,
            value_diff_summary(left, right)
        )
    }
}

/// Line-level summary of how two large opaque values diverge.
fn value_diff_summary(left: &Value, right: &Value) -> String {
    let left_text = serde_json::to_string_pretty(left).unwrap_or_default();
    let right_text = serde_json::to_string_pretty(right).unwrap_or_default();
    let diff = TextDiff::from_lines(&left_text, &right_text);

    let mut changed = Vec::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => continue,
        };
        changed.push(format!("{} {}", sign, change.value().trim()));
    }

    let total = changed.len();
    if total > SUMMARY_MAX_LINES {
        let shown = changed[..SUMMARY_MAX_LINES].join("; ");
        format!("{}; … {} more changed lines", shown, total - SUMMARY_MAX_LINES)
    } else {
        changed.join("; ")
    }
}
