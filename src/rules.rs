//! Rule policy: maps each comparison point to a severity
//!
//! Modeled as an enumerable map keyed by rule id rather than a struct of
//! named fields, so defaults, file overrides, and completeness checks all go
//! through the same path. A policy is immutable for the duration of a
//! comparison run and safe to share across runs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CompareError, Result};
use crate::severity::Severity;

/// Identifier of one comparison point.
///
/// Displayed and serialized as its dotted name (e.g. `Info.Title`,
/// `Components.Schemas.Missing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    InfoTitle,
    InfoDescription,
    InfoTermsOfService,
    InfoContactName,
    InfoContactEmail,
    InfoContactUrl,
    InfoLicenseName,
    InfoLicenseUrl,
    InfoVersion,
    BreakingChange,
    ServerDescription,
    ServerUrl,
    PathsMissing,
    PathsMismatch,
    SchemasMissing,
    SchemasMismatch,
    ParametersMissing,
    ParametersMismatch,
    ResponsesMissing,
    ResponsesMismatch,
    RequestBodiesMissing,
    RequestBodiesMismatch,
    HeadersMissing,
    HeadersMismatch,
    LinksMissing,
    LinksMismatch,
    CallbacksMissing,
    CallbacksMismatch,
    ExamplesMissing,
    ExamplesMismatch,
    SecuritySchemesMissing,
    SecuritySchemesMismatch,
    ExtensionsMissing,
    ExtensionsMismatch,
    ExternalDocsDescription,
    ExternalDocsUrl,
    ExternalDocsExtensionsMissing,
    ExternalDocsExtensionsMismatch,
    TagMissing,
    TagMismatch,
}

impl RuleId {
    /// Every known comparison point.
    pub const ALL: [RuleId; 40] = [
        RuleId::InfoTitle,
        RuleId::InfoDescription,
        RuleId::InfoTermsOfService,
        RuleId::InfoContactName,
        RuleId::InfoContactEmail,
        RuleId::InfoContactUrl,
        RuleId::InfoLicenseName,
        RuleId::InfoLicenseUrl,
        RuleId::InfoVersion,
        RuleId::BreakingChange,
        RuleId::ServerDescription,
        RuleId::ServerUrl,
        RuleId::PathsMissing,
        RuleId::PathsMismatch,
        RuleId::SchemasMissing,
        RuleId::SchemasMismatch,
        RuleId::ParametersMissing,
        RuleId::ParametersMismatch,
        RuleId::ResponsesMissing,
        RuleId::ResponsesMismatch,
        RuleId::RequestBodiesMissing,
        RuleId::RequestBodiesMismatch,
        RuleId::HeadersMissing,
        RuleId::HeadersMismatch,
        RuleId::LinksMissing,
        RuleId::LinksMismatch,
        RuleId::CallbacksMissing,
        RuleId::CallbacksMismatch,
        RuleId::ExamplesMissing,
        RuleId::ExamplesMismatch,
        RuleId::SecuritySchemesMissing,
        RuleId::SecuritySchemesMismatch,
        RuleId::ExtensionsMissing,
        RuleId::ExtensionsMismatch,
        RuleId::ExternalDocsDescription,
        RuleId::ExternalDocsUrl,
        RuleId::ExternalDocsExtensionsMissing,
        RuleId::ExternalDocsExtensionsMismatch,
        RuleId::TagMissing,
        RuleId::TagMismatch,
    ];

    /// The dotted rule name used in rule files.
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::InfoTitle => "Info.Title",
            RuleId::InfoDescription => "Info.Description",
            RuleId::InfoTermsOfService => "Info.TermsOfService",
            RuleId::InfoContactName => "Info.Contact.Name",
            RuleId::InfoContactEmail => "Info.Contact.Email",
            RuleId::InfoContactUrl => "Info.Contact.Url",
            RuleId::InfoLicenseName => "Info.License.Name",
            RuleId::InfoLicenseUrl => "Info.License.Url",
            RuleId::InfoVersion => "Info.Version",
            RuleId::BreakingChange => "BreakingChange",
            RuleId::ServerDescription => "Server.Description",
            RuleId::ServerUrl => "Server.Url",
            RuleId::PathsMissing => "Paths.Missing",
            RuleId::PathsMismatch => "Paths.Mismatch",
            RuleId::SchemasMissing => "Components.Schemas.Missing",
            RuleId::SchemasMismatch => "Components.Schemas.Mismatch",
            RuleId::ParametersMissing => "Components.Parameters.Missing",
            RuleId::ParametersMismatch => "Components.Parameters.Mismatch",
            RuleId::ResponsesMissing => "Components.Responses.Missing",
            RuleId::ResponsesMismatch => "Components.Responses.Mismatch",
            RuleId::RequestBodiesMissing => "Components.RequestBodies.Missing",
            RuleId::RequestBodiesMismatch => "Components.RequestBodies.Mismatch",
            RuleId::HeadersMissing => "Components.Headers.Missing",
            RuleId::HeadersMismatch => "Components.Headers.Mismatch",
            RuleId::LinksMissing => "Components.Links.Missing",
            RuleId::LinksMismatch => "Components.Links.Mismatch",
            RuleId::CallbacksMissing => "Components.Callbacks.Missing",
            RuleId::CallbacksMismatch => "Components.Callbacks.Mismatch",
            RuleId::ExamplesMissing => "Components.Examples.Missing",
            RuleId::ExamplesMismatch => "Components.Examples.Mismatch",
            RuleId::SecuritySchemesMissing => "Components.SecuritySchemes.Missing",
            RuleId::SecuritySchemesMismatch => "Components.SecuritySchemes.Mismatch",
            RuleId::ExtensionsMissing => "Extensions.Missing",
            RuleId::ExtensionsMismatch => "Extensions.Mismatch",
            RuleId::ExternalDocsDescription => "ExternalDocs.Description",
            RuleId::ExternalDocsUrl => "ExternalDocs.Url",
            RuleId::ExternalDocsExtensionsMissing => "ExternalDocs.Extensions.Missing",
            RuleId::ExternalDocsExtensionsMismatch => "ExternalDocs.Extensions.Mismatch",
            RuleId::TagMissing => "Tag.Missing",
            RuleId::TagMismatch => "Tag.Mismatch",
        }
    }

    /// Built-in severity when no rule file overrides it.
    pub fn default_severity(&self) -> Severity {
        match self {
            RuleId::InfoTitle
            | RuleId::InfoDescription
            | RuleId::InfoTermsOfService
            | RuleId::InfoContactName
            | RuleId::InfoContactEmail
            | RuleId::InfoContactUrl => Severity::Information,
            RuleId::InfoLicenseName | RuleId::InfoLicenseUrl => Severity::None,
            RuleId::InfoVersion => Severity::Error,
            RuleId::BreakingChange => Severity::Critical,
            RuleId::ServerDescription => Severity::Information,
            RuleId::ServerUrl => Severity::None,
            RuleId::PathsMissing | RuleId::PathsMismatch => Severity::Error,
            RuleId::TagMissing | RuleId::TagMismatch => Severity::Warning,
            // Component-level and extension-level drift defaults to Warning
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| format!("unknown rule id '{}'", s))
    }
}

/// Key used in rule files for the catch-all severity.
const DEFAULT_LEVEL_KEY: &str = "DefaultLevel";

/// The configurable mapping from comparison point to severity
#[derive(Debug, Clone)]
pub struct RulePolicy {
    default_level: Severity,
    levels: BTreeMap<RuleId, Severity>,
}

impl Default for RulePolicy {
    fn default() -> Self {
        let levels = RuleId::ALL
            .into_iter()
            .map(|id| (id, id.default_severity()))
            .collect();
        Self {
            default_level: Severity::Information,
            levels,
        }
    }
}

impl RulePolicy {
    /// Severity configured for a comparison point.
    ///
    /// Total: an id absent from the map falls back to the default level
    /// rather than failing.
    pub fn severity_for(&self, id: RuleId) -> Severity {
        self.levels.get(&id).copied().unwrap_or(self.default_level)
    }

    /// The catch-all severity for unrecognized comparison points.
    pub fn default_level(&self) -> Severity {
        self.default_level
    }

    /// Override the severity for one comparison point.
    pub fn set(&mut self, id: RuleId, severity: Severity) {
        self.levels.insert(id, severity);
    }

    /// Load a policy from its JSON rule-file form.
    ///
    /// The file is a flat map of rule name to severity name. Unknown rule
    /// names are ignored; rules the file does not mention keep their
    /// built-in defaults. A malformed document or a bad severity name on a
    /// known rule is fatal — no partially-loaded policy is returned.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_slice(bytes).map_err(CompareError::RulePolicy)?;

        let mut policy = Self::default();
        for (key, value) in raw {
            if key == DEFAULT_LEVEL_KEY {
                policy.default_level =
                    serde_json::from_value(value).map_err(CompareError::RulePolicy)?;
            } else if let Ok(id) = key.parse::<RuleId>() {
                let severity: Severity =
                    serde_json::from_value(value).map_err(CompareError::RulePolicy)?;
                policy.set(id, severity);
            } else {
                tracing::debug!(rule = %key, "ignoring unknown rule in rule file");
            }
        }
        Ok(policy)
    }

    /// Serialize to the rule-file form. Round-trips losslessly through
    /// [`RulePolicy::load`] for every defined rule.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut flat: BTreeMap<&str, Severity> = self
            .levels
            .iter()
            .map(|(id, sev)| (id.name(), *sev))
            .collect();
        flat.insert(DEFAULT_LEVEL_KEY, self.default_level);
        Ok(serde_json::to_vec_pretty(&flat)?)
    }
}
