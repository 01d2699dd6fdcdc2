//! API description document: loading, reference resolution, operation lookup.
//!
//! The document is parsed once at startup into a raw `serde_json::Value` tree and is
//! read-only afterwards. Lookups are deliberately permissive: a missing or malformed
//! fragment never takes the process down, it surfaces as `None` and the caller decides
//! whether that is a skip, a fallback, or an error.

use crate::error::{MailgunToolsError, Result};
use regex::Regex;
use serde_json::Value;
use std::path::Path;

/// One operation entry from the description, plus its canonical identifier.
#[derive(Debug, Clone)]
pub struct LocatedOperation {
    /// Canonical identifier derived from the verb and URL template, e.g.
    /// `GET--v3-domains` for `GET /v3/domains`. The verb's case is preserved here;
    /// tool names lower-case it when they are derived.
    pub operation_id: String,
    pub summary: Option<String>,
    pub parameters: Vec<RawParameter>,
    /// The raw `requestBody` fragment, if the operation declares one.
    pub request_body: Option<Value>,
}

/// Where an operation parameter is carried in the HTTP request.
///
/// Locations other than `path` and `query` (header, cookie) are folded into `Body`:
/// the dispatch layer routes everything that is not a path or query parameter into
/// the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

impl ParamLocation {
    fn from_in(location: &str) -> Self {
        match location {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            _ => ParamLocation::Body,
        }
    }
}

/// One declared operation parameter, still carrying its raw schema fragment.
#[derive(Debug, Clone)]
pub struct RawParameter {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub description: Option<String>,
}

/// The API description document, parsed once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    /// Wrap an already-parsed document tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is not a mapping.
    pub fn new(root: Value) -> Result<Self> {
        if !root.is_object() {
            return Err(MailgunToolsError::Spec(
                "description document root is not a mapping".to_string(),
            ));
        }
        Ok(Self { root })
    }

    /// Load and parse the description file. JSON documents parse as-is; anything else
    /// goes through the YAML parser (JSON is a subset of YAML, so a single fallback
    /// chain covers both).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or does not
    /// contain a mapping at the root.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MailgunToolsError::SpecReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
        let root: Value = serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|e| MailgunToolsError::SpecParse {
                path: path.display().to_string(),
                source: e,
            })?;
        Self::new(root)
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.root
    }

    /// Resolve an internal reference pointer of the form `#/segment/segment/...` by
    /// walking the document with successive key lookups. Anything else (external
    /// refs, dangling paths, traversal through a non-mapping node) yields `None`.
    #[must_use]
    pub fn resolve_ref(&self, reference: &str) -> Option<&Value> {
        let path = reference.strip_prefix("#/")?;
        path.split('/')
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    /// Look up the operation for `verb` + `template` (verb match is case-insensitive;
    /// the template must match exactly). Returns `None` when the document does not
    /// define that combination, which callers treat as skip-and-warn.
    #[must_use]
    pub fn locate(&self, verb: &str, template: &str) -> Option<LocatedOperation> {
        let operation = self
            .root
            .get("paths")?
            .get(template)?
            .get(verb.to_ascii_lowercase())?;

        let summary = operation
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string);

        let parameters = operation
            .get("parameters")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(parse_parameter).collect())
            .unwrap_or_default();

        Some(LocatedOperation {
            operation_id: canonical_operation_id(verb, template),
            summary,
            parameters,
            request_body: operation.get("requestBody").cloned(),
        })
    }
}

/// Join verb and template with a hyphen and collapse every run of characters outside
/// `[a-zA-Z0-9-]` to a single hyphen: `get` + `/test/path` becomes `get--test-path`.
#[must_use]
pub fn canonical_operation_id(verb: &str, template: &str) -> String {
    let re = Regex::new(r"[^a-zA-Z0-9-]+").unwrap();
    re.replace_all(&format!("{verb}-{template}"), "-")
        .into_owned()
}

/// Lenient parameter extraction: entries without a usable name are dropped rather
/// than failing the whole operation.
fn parse_parameter(entry: &Value) -> Option<RawParameter> {
    let name = entry.get("name")?.as_str()?.to_string();
    let location = entry
        .get("in")
        .and_then(Value::as_str)
        .map_or(ParamLocation::Body, ParamLocation::from_in);
    let required = entry
        .get("required")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(RawParameter {
        name,
        location,
        required,
        schema: entry.get("schema").cloned(),
        description: entry
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
