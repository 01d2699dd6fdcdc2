//! Tool registry and dispatch for the Mailgun API.
//!
//! `MailgunToolSource::new` walks the endpoint allow-list once at startup: each entry
//! is located in the API description, its path, query, and request-body parameters
//! are merged into one argument schema, and the result is recorded as a
//! `RegisteredTool`. The registry is immutable afterwards. `call_tool` replays the
//! parameter pipeline per invocation and performs exactly one outbound HTTP request.

use crate::document::{ApiDocument, LocatedOperation, ParamLocation};
use crate::error::{MailgunToolsError, Result};
use crate::params::{
    append_query_string, form_pairs, partition_arguments, substitute_path_params,
};
use crate::schema::{self, SchemaShape};
use regex::Regex;
use reqwest::{Client, Method};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Request-body content types, tried in order; the first one present wins.
const BODY_CONTENT_TYPES: [&str; 3] = [
    "application/json",
    "multipart/form-data",
    "application/x-www-form-urlencoded",
];

/// Connection settings for the remote API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: Url,
    pub api_key: String,
}

/// One allow-list entry that matched the API description, ready to serve calls.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub method: Method,
    pub path_template: String,
    pub parameters: Vec<ToolParameter>,
}

/// One expected argument of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolParameter {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub shape: SchemaShape,
}

/// The tool registry plus the HTTP client used to serve calls.
pub struct MailgunToolSource {
    client: Client,
    config: SourceConfig,
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl MailgunToolSource {
    /// Build the registry from the API description and the endpoint allow-list.
    ///
    /// Registration is never fatal: entries that are malformed, use an unsupported
    /// method, are absent from the description, or collide with an already
    /// registered identifier are skipped with a warning.
    #[must_use]
    pub fn new(document: &ApiDocument, endpoints: &[&str], config: SourceConfig) -> Self {
        let mut tools: Vec<RegisteredTool> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in endpoints {
            let Some((verb, template)) = entry.split_once(' ') else {
                tracing::warn!("Malformed endpoint entry, skipping: {entry}");
                continue;
            };
            let Some(method) = resolve_method(verb) else {
                tracing::warn!("Unsupported HTTP method, skipping: {entry}");
                continue;
            };
            let Some(operation) = document.locate(verb, template) else {
                tracing::warn!("Endpoint not found in API description, skipping: {verb} {template}");
                continue;
            };

            let tool = build_tool(&operation, method, verb, template, document);
            if index.contains_key(&tool.name) {
                tracing::warn!(
                    "Duplicate tool identifier '{}', skipping: {verb} {template}",
                    tool.name
                );
                continue;
            }
            index.insert(tool.name.clone(), tools.len());
            tools.push(tool);
        }

        tracing::info!("Registered {} tools from the API description", tools.len());

        Self {
            client: Client::new(),
            config,
            tools,
            index,
        }
    }

    /// The registered tools, in allow-list order.
    #[must_use]
    pub fn tools(&self) -> &[RegisteredTool] {
        &self.tools
    }

    /// List the MCP `Tool`s exposed by this source.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|t| {
                let mut tool = Tool::new(
                    t.name.clone(),
                    t.description.clone(),
                    Arc::new(input_schema(t)),
                );
                tool.annotations = Some(annotations_for_method(&t.method));
                tool
            })
            .collect()
    }

    /// Execute a tool call.
    ///
    /// Only an unknown tool name or arguments that fail schema validation surface as
    /// `Err`. Everything that goes wrong past that point, including a missing path
    /// argument, a transport failure, or a non-2xx response, is folded into an
    /// error-flagged `CallToolResult` so the protocol layer keeps serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool name is unknown or the arguments do not match
    /// the tool's schema.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult> {
        let tool = self
            .index
            .get(name)
            .map(|i| &self.tools[*i])
            .ok_or_else(|| MailgunToolsError::Runtime(format!("Tool not found: {name}")))?;

        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(MailgunToolsError::InvalidArguments(format!(
                    "arguments must be an object, got {other}"
                )));
            }
        };
        validate_arguments(tool, &args)?;

        match self.dispatch(tool, args).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                tracing::warn!("Tool '{}' failed: {e}", tool.name);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }

    async fn dispatch(&self, tool: &RegisteredTool, mut args: Map<String, Value>) -> Result<String> {
        let path_params: Vec<String> = tool
            .parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Path)
            .map(|p| p.name.clone())
            .collect();
        let query_params: Vec<String> = tool
            .parameters
            .iter()
            .filter(|p| p.location == ParamLocation::Query)
            .map(|p| p.name.clone())
            .collect();

        let path = substitute_path_params(&tool.path_template, &path_params, &mut args)?;
        let (query, body) = partition_arguments(&tool.method, &query_params, args);
        let path_and_query = append_query_string(&path, &query);

        let url = join_url(&self.config.base_url, &path_and_query)?;
        let mut request = self
            .client
            .request(tool.method.clone(), url)
            .basic_auth("api", Some(&self.config.api_key));
        if tool.method != Method::GET && !body.is_empty() {
            request = request.form(&form_pairs(&body));
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailgunToolsError::Http(format!("Request failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MailgunToolsError::Http(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return Err(MailgunToolsError::Http(format!(
                "API returned {} {reason}: {text}",
                status.as_u16()
            )));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            MailgunToolsError::Http(format!("Failed to parse response as JSON: {e}"))
        })?;
        serde_json::to_string_pretty(&body)
            .map_err(|e| MailgunToolsError::Runtime(format!("Failed to render response: {e}")))
    }
}

/// Check the supplied arguments against the tool's schema before any request work.
///
/// Missing path arguments are deliberately not caught here: the parameter pipeline
/// reports those with the parameter name so they come back as a tool error result
/// rather than a protocol-level rejection.
fn validate_arguments(tool: &RegisteredTool, args: &Map<String, Value>) -> Result<()> {
    for parameter in &tool.parameters {
        match args.get(&parameter.name) {
            Some(value) => parameter.shape.validate(value).map_err(|e| {
                MailgunToolsError::InvalidArguments(format!(
                    "argument '{}': {e}",
                    parameter.name
                ))
            })?,
            None if parameter.required && parameter.location != ParamLocation::Path => {
                return Err(MailgunToolsError::InvalidArguments(format!(
                    "missing required argument '{}'",
                    parameter.name
                )));
            }
            None => {}
        }
    }
    Ok(())
}

fn build_tool(
    operation: &LocatedOperation,
    method: Method,
    verb: &str,
    template: &str,
    document: &ApiDocument,
) -> RegisteredTool {
    let mut parameters: Vec<ToolParameter> = operation
        .parameters
        .iter()
        .map(|p| ToolParameter {
            name: p.name.clone(),
            location: p.location,
            // Path parameters are required no matter how the description flags them.
            required: p.required || p.location == ParamLocation::Path,
            shape: schema::translate_optional(p.schema.as_ref(), document),
        })
        .collect();

    if let Some(request_body) = &operation.request_body {
        parameters.extend(body_parameters(request_body, document));
    }

    RegisteredTool {
        name: sanitize_tool_name(&operation.operation_id),
        description: operation
            .summary
            .clone()
            .unwrap_or_else(|| format!("{verb} {template}")),
        method,
        path_template: template.to_string(),
        parameters,
    }
}

/// Extract the request-body properties as individual body-located parameters.
///
/// A referenced body schema is resolved one level before its properties are read;
/// property-level references are handled by the schema translator itself.
fn body_parameters(request_body: &Value, document: &ApiDocument) -> Vec<ToolParameter> {
    let Some(content) = request_body.get("content").and_then(Value::as_object) else {
        return Vec::new();
    };
    let Some(media) = BODY_CONTENT_TYPES.iter().find_map(|ct| content.get(*ct)) else {
        return Vec::new();
    };
    let Some(fragment) = media.get("schema") else {
        return Vec::new();
    };

    let fragment = match fragment.get("$ref").and_then(Value::as_str) {
        Some(reference) => match document.resolve_ref(reference) {
            Some(resolved) => resolved,
            None => {
                tracing::warn!("Unresolved request body reference: {reference}");
                return Vec::new();
            }
        },
        None => fragment,
    };

    let required: Vec<&str> = fragment
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let Some(properties) = fragment.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, prop)| ToolParameter {
            name: name.clone(),
            location: ParamLocation::Body,
            required: required.contains(&name.as_str()),
            shape: schema::translate(prop, document),
        })
        .collect()
}

/// Render the merged argument schema advertised for one tool.
fn input_schema(tool: &RegisteredTool) -> JsonObject {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for parameter in &tool.parameters {
        properties.insert(parameter.name.clone(), parameter.shape.to_json_schema());
        if parameter.required {
            required.push(parameter.name.clone());
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    schema
}

fn annotations_for_method(method: &Method) -> ToolAnnotations {
    let open_world_hint = Some(true);

    if *method == Method::GET {
        return ToolAnnotations {
            title: None,
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint,
        };
    }

    if *method == Method::PUT || *method == Method::DELETE {
        return ToolAnnotations {
            title: None,
            read_only_hint: Some(false),
            destructive_hint: Some(true),
            idempotent_hint: Some(true),
            open_world_hint,
        };
    }

    ToolAnnotations {
        title: None,
        read_only_hint: Some(false),
        destructive_hint: Some(false),
        idempotent_hint: Some(false),
        open_world_hint,
    }
}

/// Lower-case the canonical operation identifier, collapse anything left outside
/// `[a-z0-9-]` to a single hyphen, and trim hyphens from both ends. The trim
/// matters for templates ending in a placeholder, where the closing brace would
/// otherwise leave a dangling hyphen.
fn sanitize_tool_name(operation_id: &str) -> String {
    let re = Regex::new(r"[^a-z0-9-]+").unwrap();
    re.replace_all(&operation_id.to_ascii_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

fn resolve_method(verb: &str) -> Option<Method> {
    match verb.to_ascii_uppercase().as_str() {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        "PATCH" => Some(Method::PATCH),
        _ => None,
    }
}

fn join_url(base_url: &Url, path_and_query: &str) -> Result<Url> {
    let url = format!("{}{path_and_query}", base_url.as_str().trim_end_matches('/'));
    Url::parse(&url).map_err(|e| MailgunToolsError::Runtime(format!("Invalid URL: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
