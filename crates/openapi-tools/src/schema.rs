//! Schema translation: description fragments into runtime-checked validators.
//!
//! Translation builds an explicit intermediate representation (`SchemaShape`) from a
//! raw fragment, and two separate interpreters walk it afterwards: `validate` checks
//! invocation arguments, `to_json_schema` renders the advertised tool input schema.
//! Translation never fails. A fragment that cannot be understood, including a
//! reference that does not resolve, degrades to an accept-anything shape so that one
//! bad fragment never costs the whole tool set.

use crate::document::ApiDocument;
use regex::Regex;
use serde_json::{Map, Value, json};

/// A translated schema fragment: the shape of one expected argument value.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaShape {
    pub kind: SchemaKind,
    pub description: Option<String>,
}

/// One variant per supported schema shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Accepts any value, including null. Produced for missing schemas and for
    /// fragments translation cannot understand.
    Any,
    Boolean,
    String {
        /// Apply email-format validation on top of the string check.
        email: bool,
    },
    /// Closed set of string values. Takes precedence over every other string
    /// constraint on the same fragment.
    Enum { values: Vec<String> },
    /// Covers both `number` and `integer` declarations; bounds are inclusive. The
    /// `integer` flag only affects the advertised schema, not validation.
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
        integer: bool,
    },
    Array { items: Box<SchemaShape> },
    /// Declared properties are checked, undeclared keys pass through. An empty
    /// property list is the open key-value mapping produced by a bare typed object.
    Object { properties: Vec<ObjectProperty> },
    /// `oneOf` / `anyOf`: a value is accepted by the first matching variant.
    Union { variants: Vec<SchemaShape> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub name: String,
    pub required: bool,
    pub shape: SchemaShape,
}

impl SchemaShape {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    fn with_description(kind: SchemaKind, description: Option<String>) -> Self {
        Self { kind, description }
    }

    /// Accept-anything shape, used wherever translation has nothing better.
    #[must_use]
    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Check one argument value against this shape.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first mismatch found.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match &self.kind {
            SchemaKind::Any => Ok(()),
            SchemaKind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(format!("expected a boolean, got {}", kind_of(other))),
            },
            SchemaKind::String { email } => match value {
                Value::String(s) => {
                    if *email && !is_email(s) {
                        Err(format!("'{s}' is not a valid email address"))
                    } else {
                        Ok(())
                    }
                }
                other => Err(format!("expected a string, got {}", kind_of(other))),
            },
            SchemaKind::Enum { values } => match value {
                Value::String(s) if values.iter().any(|v| v == s) => Ok(()),
                Value::String(s) => Err(format!(
                    "'{s}' is not one of the allowed values [{}]",
                    values.join(", ")
                )),
                other => Err(format!("expected a string, got {}", kind_of(other))),
            },
            SchemaKind::Number {
                minimum, maximum, ..
            } => match value.as_f64() {
                Some(n) => {
                    if let Some(min) = minimum
                        && n < *min
                    {
                        return Err(format!("{n} is below the minimum of {min}"));
                    }
                    if let Some(max) = maximum
                        && n > *max
                    {
                        return Err(format!("{n} is above the maximum of {max}"));
                    }
                    Ok(())
                }
                None => Err(format!("expected a number, got {}", kind_of(value))),
            },
            SchemaKind::Array { items } => match value {
                Value::Array(entries) => {
                    for (index, entry) in entries.iter().enumerate() {
                        items
                            .validate(entry)
                            .map_err(|e| format!("element {index}: {e}"))?;
                    }
                    Ok(())
                }
                other => Err(format!("expected an array, got {}", kind_of(other))),
            },
            SchemaKind::Object { properties } => match value {
                Value::Object(fields) => {
                    for property in properties {
                        match fields.get(&property.name) {
                            Some(field) => property
                                .shape
                                .validate(field)
                                .map_err(|e| format!("property '{}': {e}", property.name))?,
                            None if property.required => {
                                return Err(format!(
                                    "missing required property '{}'",
                                    property.name
                                ));
                            }
                            None => {}
                        }
                    }
                    Ok(())
                }
                other => Err(format!("expected an object, got {}", kind_of(other))),
            },
            SchemaKind::Union { variants } => {
                if variants.iter().any(|v| v.validate(value).is_ok()) {
                    Ok(())
                } else {
                    Err(format!(
                        "{} does not match any allowed variant",
                        kind_of(value)
                    ))
                }
            }
        }
    }

    /// Render this shape as a JSON Schema fragment for the advertised tool input.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut schema = match &self.kind {
            SchemaKind::Any => json!({}),
            SchemaKind::Boolean => json!({ "type": "boolean" }),
            SchemaKind::String { email: false } => json!({ "type": "string" }),
            SchemaKind::String { email: true } => {
                json!({ "type": "string", "format": "email" })
            }
            SchemaKind::Enum { values } => json!({ "type": "string", "enum": values }),
            SchemaKind::Number {
                minimum,
                maximum,
                integer,
            } => {
                let mut out = json!({ "type": if *integer { "integer" } else { "number" } });
                if let Some(min) = minimum {
                    out["minimum"] = json!(min);
                }
                if let Some(max) = maximum {
                    out["maximum"] = json!(max);
                }
                out
            }
            SchemaKind::Array { items } => {
                json!({ "type": "array", "items": items.to_json_schema() })
            }
            SchemaKind::Object { properties } => {
                let mut props = Map::new();
                let mut required = Vec::new();
                for property in properties {
                    props.insert(property.name.clone(), property.shape.to_json_schema());
                    if property.required {
                        required.push(property.name.clone());
                    }
                }
                let mut out = json!({ "type": "object", "properties": props });
                if !required.is_empty() {
                    out["required"] = json!(required);
                }
                out
            }
            SchemaKind::Union { variants } => {
                let branches: Vec<Value> =
                    variants.iter().map(SchemaShape::to_json_schema).collect();
                json!({ "oneOf": branches })
            }
        };
        if let Some(description) = &self.description {
            schema["description"] = json!(description);
        }
        schema
    }
}

/// Translate one raw schema fragment into a `SchemaShape`, resolving internal
/// references against `doc`. Never fails: unknown constructs yield `Any`.
#[must_use]
pub fn translate(fragment: &Value, doc: &ApiDocument) -> SchemaShape {
    let Some(map) = fragment.as_object() else {
        return SchemaShape::any();
    };

    if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
        return translate_reference(reference, fragment, doc);
    }

    let description = map
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    // Enum wins over everything else declared on the same fragment.
    if let Some(values) = map.get("enum").and_then(Value::as_array) {
        let values = values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        return SchemaShape::with_description(SchemaKind::Enum { values }, description);
    }

    let kind = match map.get("type").and_then(Value::as_str) {
        Some("string") => SchemaKind::String {
            email: map.get("format").and_then(Value::as_str) == Some("email"),
        },
        Some(declared @ ("number" | "integer")) => SchemaKind::Number {
            minimum: map.get("minimum").and_then(Value::as_f64),
            maximum: map.get("maximum").and_then(Value::as_f64),
            integer: declared == "integer",
        },
        Some("boolean") => SchemaKind::Boolean,
        Some("array") => SchemaKind::Array {
            items: Box::new(
                map.get("items")
                    .map_or_else(SchemaShape::any, |items| translate(items, doc)),
            ),
        },
        Some("object") => translate_object(map, doc),
        _ => {
            if let Some(variants) = union_branches(map) {
                SchemaKind::Union {
                    variants: variants.iter().map(|v| translate(v, doc)).collect(),
                }
            } else if map.contains_key("properties") {
                translate_object(map, doc)
            } else {
                SchemaKind::Any
            }
        }
    };
    SchemaShape::with_description(kind, description)
}

/// Optional-fragment entry point: treats an absent schema as accept-anything.
#[must_use]
pub fn translate_optional(fragment: Option<&Value>, doc: &ApiDocument) -> SchemaShape {
    fragment.map_or_else(SchemaShape::any, |f| translate(f, doc))
}

fn translate_reference(reference: &str, site: &Value, doc: &ApiDocument) -> SchemaShape {
    if let Some(resolved) = doc.resolve_ref(reference) {
        let mut shape = translate(resolved, doc);
        if shape.description.is_none() {
            shape.description = site
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        return shape;
    }
    // The upstream description references an event-severity schema it never defines.
    // Substitute its known value set instead of degrading the whole parameter.
    if reference.contains("EventSeverityType") {
        return SchemaShape::with_description(
            SchemaKind::Enum {
                values: vec!["temporary".to_string(), "permanent".to_string()],
            },
            Some("Event severity".to_string()),
        );
    }
    SchemaShape::with_description(
        SchemaKind::Any,
        Some(format!("Unresolved reference: {reference}")),
    )
}

fn translate_object(map: &Map<String, Value>, doc: &ApiDocument) -> SchemaKind {
    let required: Vec<&str> = map
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let properties = map
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, fragment)| ObjectProperty {
                    name: name.clone(),
                    required: required.contains(&name.as_str()),
                    shape: translate(fragment, doc),
                })
                .collect()
        })
        .unwrap_or_default();
    SchemaKind::Object { properties }
}

fn union_branches(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.get("oneOf")
        .or_else(|| map.get("anyOf"))
        .and_then(Value::as_array)
}

fn is_email(candidate: &str) -> bool {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    re.is_match(candidate)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
