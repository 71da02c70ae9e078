//! In-memory model of an API document
//!
//! This is the parsed form the comparator consumes. The serde derives double
//! as the document-model adapter: an OpenAPI-shaped JSON document
//! deserializes straight into [`ApiDocument`]. Sections the comparator does
//! not introspect (path items, non-schema component entries) stay as opaque
//! [`serde_json::Value`]s and are compared by deep equality only.
//!
//! All maps are `BTreeMap` so traversal order — and with it the set of
//! emitted diagnostics — is deterministic for identical inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::schema::SchemaNode;

/// A parsed API document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocument {
    /// Declared document-format version (e.g. "3.0.1"). Not compared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    /// Metadata block. Required for comparison; its absence is a
    /// precondition violation, not a diffable state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// Path string to opaque path-item value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, Value>,

    /// Reusable component definitions. Required for comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    /// Document-level security requirements. Carried, not compared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,

    /// Vendor extensions and any other keys the model does not name.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Document metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub license: License,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One server entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

/// Reusable component maps
///
/// The schema map is typed; the rest are opaque values compared by deep
/// equality. Unknown keys (vendor extensions) collect into `extensions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_bodies: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub callbacks: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// Pointer to external documentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// One tag declaration, matched across documents by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Reference to an external resource describing the tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_resource: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapter_accepts_openapi_shape() {
        let doc: ApiDocument = serde_json::from_value(json!({
            "openapi": "3.0.1",
            "info": {
                "title": "Pet Store",
                "description": "Pets",
                "version": "1.0.0",
                "contact": { "name": "API Team", "email": "api@example.com", "url": "https://example.com" },
                "license": { "name": "MIT", "url": "https://opensource.org/licenses/MIT" }
            },
            "servers": [ { "description": "prod", "url": "https://api.example.com" } ],
            "paths": { "/pets": { "get": {} } },
            "components": {
                "schemas": { "Pet": { "type": "object", "required": ["name"] } },
                "parameters": { "limit": { "in": "query" } },
                "x-internal": true
            },
            "tags": [ { "name": "pets", "description": "Pet ops" } ],
            "x-audience": "public"
        }))
        .unwrap();

        let info = doc.info.as_ref().unwrap();
        assert_eq!(info.title, "Pet Store");
        assert_eq!(info.contact.email, "api@example.com");
        assert_eq!(doc.servers.len(), 1);
        assert!(doc.paths.contains_key("/pets"));

        let components = doc.components.as_ref().unwrap();
        assert!(components.schemas.contains_key("Pet"));
        assert!(components.parameters.contains_key("limit"));
        assert_eq!(components.extensions.get("x-internal"), Some(&json!(true)));
        assert_eq!(doc.extensions.get("x-audience"), Some(&json!("public")));
    }

    #[test]
    fn test_missing_sections_stay_absent() {
        let doc: ApiDocument = serde_json::from_value(json!({ "openapi": "3.0.0" })).unwrap();
        assert!(doc.info.is_none());
        assert!(doc.components.is_none());
        assert!(doc.paths.is_empty());
    }
}
