//! End-to-end tests for the comparison engine
//!
//! Documents are built through the serde adapter so these tests also cover
//! the OpenAPI-shaped JSON → model path.

use serde_json::json;

use openapi_compare::{
    compare_schemas, finalize, is_broken, is_breaking, major_version, ApiDocument, Comparator,
    Diagnostic, Element, RuleId, RulePolicy, SchemaNode, Severity,
};

fn doc(value: serde_json::Value) -> ApiDocument {
    serde_json::from_value(value).expect("valid document")
}

fn base() -> serde_json::Value {
    json!({
        "openapi": "3.0.1",
        "info": {
            "title": "Pet Store",
            "description": "Manage pets",
            "version": "1.0.0",
            "contact": { "name": "API Team", "email": "api@example.com", "url": "https://example.com" },
            "license": { "name": "MIT", "url": "https://opensource.org/licenses/MIT" }
        },
        "servers": [ { "description": "prod", "url": "https://api.example.com" } ],
        "paths": {
            "/pets": { "get": { "summary": "List pets" } },
            "/pets/{id}": { "get": { "summary": "One pet" } }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": { "name": { "type": "string" } }
                }
            },
            "parameters": { "limit": { "in": "query", "name": "limit" } }
        },
        "tags": [ { "name": "pets", "description": "Pet operations" } ],
        "x-audience": "public"
    })
}

fn compare(current: &ApiDocument, previous: &ApiDocument) -> Vec<Diagnostic> {
    let rules = RulePolicy::default();
    let diagnostics = Comparator::new(&rules)
        .compare(current, previous)
        .expect("both documents are well-formed");
    finalize(diagnostics)
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn identity_comparison_is_clean() {
    let document = doc(base());
    let diagnostics = compare(&document, &document);
    assert!(diagnostics.is_empty(), "got: {:#?}", diagnostics);
    assert!(!is_broken(&diagnostics));
}

#[test]
fn identity_holds_under_any_policy() {
    let mut rules = RulePolicy::default();
    for id in RuleId::ALL {
        rules.set(id, Severity::Critical);
    }
    let document = doc(base());
    let diagnostics = Comparator::new(&rules)
        .compare(&document, &document)
        .unwrap();
    assert!(diagnostics.is_empty());
}

// =============================================================================
// Single-field change
// =============================================================================

#[test]
fn title_change_yields_one_policy_severity_diagnostic() {
    let previous = doc(base());
    let mut changed = base();
    changed["info"]["title"] = json!("Pet Store V2");
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.element, Element::Info);
    assert_eq!(d.element_name, "Title");
    assert_eq!(
        d.severity,
        RulePolicy::default().severity_for(RuleId::InfoTitle)
    );
    assert!(d.message.contains("Pet Store"));
    assert!(d.message.contains("Pet Store V2"));
}

#[test]
fn severity_follows_policy_override() {
    let mut rules = RulePolicy::default();
    rules.set(RuleId::InfoTitle, Severity::Critical);

    let previous = doc(base());
    let mut changed = base();
    changed["info"]["title"] = json!("Renamed");
    let current = doc(changed);

    let diagnostics = Comparator::new(&rules).compare(&current, &previous).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Critical);
}

// =============================================================================
// One-sided key
// =============================================================================

#[test]
fn path_only_in_current_yields_single_missing_diagnostic() {
    let previous = doc(base());
    let mut changed = base();
    changed["paths"]["/owners"] = json!({ "get": { "summary": "List owners" } });
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 1, "got: {:#?}", diagnostics);
    let d = &diagnostics[0];
    assert_eq!(d.element, Element::Paths);
    assert_eq!(
        d.severity,
        RulePolicy::default().severity_for(RuleId::PathsMissing)
    );
    assert!(d.message.contains("Previous Missing Key: /owners"));
}

#[test]
fn path_only_in_previous_attributes_to_current() {
    let current = doc(base());
    let mut changed = base();
    changed["paths"]["/owners"] = json!({ "get": {} });
    let previous = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("Current Missing Key: /owners"));
}

#[test]
fn divergent_path_value_yields_one_diagnostic_per_direction() {
    let previous = doc(base());
    let mut changed = base();
    changed["paths"]["/pets"] = json!({ "get": { "summary": "List all pets" } });
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|d| d.element == Element::Paths && d.message.contains("/pets")));
}

// =============================================================================
// Sort order and broken predicate
// =============================================================================

#[test]
fn finalize_orders_by_severity_then_category_then_name() {
    let diagnostics = vec![
        Diagnostic::new(Element::Servers, Severity::Warning, "B", "m"),
        Diagnostic::new(Element::Paths, Severity::Critical, "x", "m"),
        Diagnostic::new(Element::Info, Severity::Error, "y", "m"),
        Diagnostic::new(Element::Tags, Severity::Information, "z", "m"),
        Diagnostic::new(Element::Servers, Severity::Warning, "A", "m"),
        Diagnostic::new(Element::Components, Severity::Warning, "C", "m"),
    ];
    let sorted = finalize(diagnostics);

    let severities: Vec<Severity> = sorted.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        vec![
            Severity::Critical,
            Severity::Error,
            Severity::Warning,
            Severity::Warning,
            Severity::Warning,
            Severity::Information
        ]
    );
    // Components ranks before Servers; equal (severity, category) ties break
    // on element name.
    assert_eq!(sorted[2].element, Element::Components);
    assert_eq!(sorted[3].element_name, "A");
    assert_eq!(sorted[4].element_name, "B");
}

#[test]
fn broken_requires_error_or_critical() {
    let mut diagnostics = vec![
        Diagnostic::new(Element::Info, Severity::Information, "a", "m"),
        Diagnostic::new(Element::Info, Severity::Warning, "b", "m"),
        Diagnostic::new(Element::Info, Severity::None, "c", "m"),
    ];
    assert!(!is_broken(&diagnostics));

    diagnostics.push(Diagnostic::new(Element::Paths, Severity::Error, "d", "m"));
    assert!(is_broken(&diagnostics));
}

// =============================================================================
// Breaking version heuristic
// =============================================================================

#[test]
fn major_version_heuristic() {
    assert_eq!(major_version("v2.3.1"), 2);
    assert_eq!(major_version("no-digits-here"), 0);
    assert!(is_breaking(1, 2));
    assert!(!is_breaking(0, 2));
}

#[test]
fn major_bump_emits_breaking_change_and_version_diagnostics() {
    let previous = doc(base());
    let mut changed = base();
    changed["info"]["version"] = json!("2.0.0");
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 2, "got: {:#?}", diagnostics);

    let rules = RulePolicy::default();
    assert!(diagnostics.iter().any(|d| {
        d.severity == rules.severity_for(RuleId::BreakingChange)
            && d.message.contains("Breaking major version change")
    }));
    assert!(diagnostics
        .iter()
        .any(|d| d.severity == rules.severity_for(RuleId::InfoVersion)
            && d.message.contains("1.0.0 => 2.0.0")));
    assert!(is_broken(&diagnostics));
}

#[test]
fn minor_bump_emits_only_version_diagnostic() {
    let previous = doc(base());
    let mut changed = base();
    changed["info"]["version"] = json!("1.1.0");
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].element_name, "Version");
    assert!(!diagnostics[0].message.contains("Breaking"));
}

// =============================================================================
// Schema equality: asymmetric null policy
// =============================================================================

#[test]
fn asymmetric_null_skip_reports_equal() {
    let a = SchemaNode {
        minimum: Some(1.0),
        ..Default::default()
    };
    let b = SchemaNode::default();
    let result = compare_schemas(&a, &b);
    assert!(result.equal);
    assert!(result.complaints.is_empty());
}

#[test]
fn mutual_minimum_mismatch_complains_exactly_once() {
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
    assert_eq!(result.complaints.len(), 1);
    assert!(result.complaints[0].starts_with("minimum:"));
}

#[test]
fn removed_constraint_is_invisible_end_to_end() {
    // A minLength constraint dropped entirely between versions produces no
    // schema diagnostic at all: the field is one-sided, so it is skipped.
    let mut with_constraint = base();
    with_constraint["components"]["schemas"]["Pet"]["properties"]["name"] =
        json!({ "type": "string", "minLength": 1 });
    let previous = doc(with_constraint);
    let current = doc(base());

    let diagnostics = compare(&current, &previous);
    assert!(diagnostics.is_empty(), "got: {:#?}", diagnostics);
}

#[test]
fn schema_mismatch_carries_payloads_and_complaints() {
    let previous = doc(base());
    let mut changed = base();
    changed["components"]["schemas"]["Pet"]["nullable"] = json!(true);
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    // One mismatch per direction.
    assert_eq!(diagnostics.len(), 2);
    for d in &diagnostics {
        assert_eq!(d.element, Element::Components);
        assert_eq!(d.element_name, "Schemas.Pet");
        assert!(d.message.contains("nullable"));
        let current_schema = d.current_schema.as_ref().expect("current payload");
        let previous_schema = d.previous_schema.as_ref().expect("previous payload");
        assert!(current_schema.nullable);
        assert!(!previous_schema.nullable);
    }
}

// =============================================================================
// Rule-file round trip
// =============================================================================

#[test]
fn rule_file_round_trip_preserves_every_rule() {
    let policy = RulePolicy::default();
    let bytes = policy.to_json().unwrap();
    let reloaded = RulePolicy::load(&bytes).unwrap();
    for id in RuleId::ALL {
        assert_eq!(
            reloaded.severity_for(id),
            policy.severity_for(id),
            "severity drifted for {}",
            id
        );
    }
    assert_eq!(reloaded.default_level(), policy.default_level());
}

// =============================================================================
// Remaining sections
// =============================================================================

#[test]
fn server_only_in_current_reports_previous_missing() {
    let previous = doc(base());
    let mut changed = base();
    changed["servers"] = json!([
        { "description": "prod", "url": "https://api.example.com" },
        { "description": "staging", "url": "https://staging.example.com" }
    ]);
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 2, "description and url probes: {:#?}", diagnostics);
    assert!(diagnostics.iter().all(|d| d.element == Element::Servers));
    assert!(diagnostics
        .iter()
        .any(|d| d.message == "Previous Missing: staging"));
    assert!(diagnostics
        .iter()
        .any(|d| d.message == "Previous Missing: https://staging.example.com"));
}

#[test]
fn tag_missing_and_description_mismatch() {
    let mut left = base();
    left["tags"] = json!([
        { "name": "pets", "description": "Pet operations" },
        { "name": "owners", "description": "Owner operations" }
    ]);
    let current = doc(left);

    let mut right = base();
    right["tags"] = json!([ { "name": "pets", "description": "Pets" } ]);
    let previous = doc(right);

    let diagnostics = compare(&current, &previous);
    assert!(diagnostics
        .iter()
        .any(|d| d.element == Element::Tags && d.message.contains("Previous Missing Tag: owners")));
    // description mismatch surfaces from both directions
    let mismatches: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.element_name == "Tags.pets.Description")
        .collect();
    assert_eq!(mismatches.len(), 2);
}

#[test]
fn vendor_extension_change_reports_under_extensions() {
    let previous = doc(base());
    let mut changed = base();
    changed["x-audience"] = json!("internal");
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.element == Element::Extensions));
    assert!(diagnostics[0].message.contains("x-audience"));
}

#[test]
fn missing_components_section_is_a_precondition_error() {
    let current = doc(base());
    let mut stripped = base();
    stripped.as_object_mut().unwrap().remove("components");
    let previous = doc(stripped);

    let rules = RulePolicy::default();
    let err = Comparator::new(&rules).compare(&current, &previous).unwrap_err();
    assert!(err.to_string().contains("components"));
}

// =============================================================================
// Report emitters over a real comparison
// =============================================================================

#[test]
fn reports_render_sorted_diagnostics() {
    let previous = doc(base());
    let mut changed = base();
    changed["info"]["title"] = json!("Pet Store V2");
    changed["info"]["version"] = json!("2.0.0");
    let current = doc(changed);

    let diagnostics = compare(&current, &previous);
    assert!(is_broken(&diagnostics));

    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("report.csv");
    openapi_compare::report::write_csv(&diagnostics, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("\"Severity\",\"Element\",\"Element Name\",\"Message\""));
    // Severity-descending: the Critical breaking-change row precedes Info rows.
    let first_row = csv.lines().nth(1).unwrap();
    assert!(first_row.starts_with("\"Critical\""));

    let json_path = dir.path().join("report.json");
    openapi_compare::report::write_json(&diagnostics, &json_path).unwrap();
    let parsed: Vec<Diagnostic> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.len(), diagnostics.len());

    let html_path = dir.path().join("report.html");
    openapi_compare::report::write_html(&diagnostics, &html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<table>"));
    assert!(html.contains("Pet Store V2"));
}
