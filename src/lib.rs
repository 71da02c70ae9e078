//! OpenAPI Compare
//!
//! Structural comparison of two versions of an API document, producing a
//! severity-ranked list of diagnostics and a backward-compatibility verdict.
//!
//! ## Features
//!
//! - **Rule Policy**: every comparison point maps to a configurable
//!   severity, with built-in defaults and JSON file overrides
//! - **Two-Directional Diff**: each keyed section is walked from both sides,
//!   so additions, removals, and divergences all surface
//! - **Schema Complaints**: schema mismatches report the exact fields that
//!   diverged, not just a boolean
//! - **Deterministic Output**: diagnostics sort by severity, category, and
//!   element name — identical inputs always produce identical reports
//! - **Report Emitters**: CSV, JSON, and HTML renderings of the final list
//!
//! ## Usage
//!
//! ```no_run
//! use openapi_compare::{Comparator, RulePolicy, ApiDocument};
//!
//! # fn load(_: &str) -> ApiDocument { ApiDocument::default() }
//! let current: ApiDocument = load("current.json");
//! let previous: ApiDocument = load("previous.json");
//!
//! let rules = RulePolicy::default();
//! let diagnostics = Comparator::new(&rules)
//!     .compare(&current, &previous)
//!     .expect("documents carry info and components");
//! let diagnostics = openapi_compare::finalize(diagnostics);
//! let broken = openapi_compare::is_broken(&diagnostics);
//! # let _ = broken;
//! ```

pub mod compare;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod report;
pub mod rules;
pub mod schema;
pub mod severity;
pub mod version;

pub use compare::Comparator;
pub use config::CompareConfig;
pub use diagnostic::{finalize, is_broken, Diagnostic, Element};
pub use document::{ApiDocument, Components, Contact, ExternalDocs, Info, License, Server, Tag};
pub use error::{CompareError, Result, Side};
pub use rules::{RuleId, RulePolicy};
pub use schema::{compare_schemas, SchemaComparison, SchemaNode};
pub use severity::Severity;
pub use version::{is_breaking, major_version};
