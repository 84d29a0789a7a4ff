//! The schema algebra for form answers.
//!
//! A [`Type`] is a pure, recursive description of the shape a form answer
//! must take. It carries no runtime data; the two consumers are the
//! validator ([`Type::validate`]) and the presentation layers that turn a
//! type into prompt text or a provider JSON schema ([`Type::to_json_schema`]).

use derive_more::{Display, Error};
use serde_json::{Map, Value, json};

/// A named, described component of a product or union type.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Field or alternative name.
    pub name: String,
    /// Human-readable description, shown to the answering participant.
    pub description: String,
    /// Shape of this fragment's value.
    pub ty: Type,
}

impl Fragment {
    /// Creates a fragment.
    pub fn new(name: impl Into<String>, description: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ty,
        }
    }
}

/// The closed set of value shapes a form answer can take.
///
/// A `Product` requires every field to be present; a `Union` requires
/// exactly one alternative to hold, encoded as a single-key object
/// `{ "<alternative>": <value> }`. An empty `Product` or `Union` is legal
/// but unanswerable; callers are responsible for not issuing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// The unit value, encoded as JSON `null`.
    Unit,
    /// A UTF-8 string.
    String,
    /// A JSON number.
    Number,
    /// A boolean.
    Boolean,
    /// The JSON `null` value.
    Null,
    /// A record with all named fields present.
    Product(Vec<Fragment>),
    /// A tagged choice of exactly one named alternative.
    Union(Vec<Fragment>),
    /// A homogeneous sequence.
    List(Box<Type>),
}

impl Type {
    /// Checks `value` against this type.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] naming the path at which the value first
    /// diverges from the expected shape.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> Result<(), SchemaError> {
        match self {
            Type::Unit | Type::Null => match value {
                Value::Null => Ok(()),
                other => Err(SchemaError::new(path, format!("expected null, got {other}"))),
            },
            Type::String => match value {
                Value::String(_) => Ok(()),
                other => Err(SchemaError::new(
                    path,
                    format!("expected string, got {other}"),
                )),
            },
            Type::Number => match value {
                Value::Number(_) => Ok(()),
                other => Err(SchemaError::new(
                    path,
                    format!("expected number, got {other}"),
                )),
            },
            Type::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(SchemaError::new(
                    path,
                    format!("expected boolean, got {other}"),
                )),
            },
            Type::Product(fields) => {
                let object = value.as_object().ok_or_else(|| {
                    SchemaError::new(path, format!("expected object, got {value}"))
                })?;
                for field in fields {
                    let inner = object.get(&field.name).ok_or_else(|| {
                        SchemaError::new(path, format!("missing field {:?}", field.name))
                    })?;
                    field
                        .ty
                        .validate_at(&format!("{path}.{}", field.name), inner)?;
                }
                if let Some(stray) = object.keys().find(|k| !fields.iter().any(|f| &f.name == *k))
                {
                    return Err(SchemaError::new(path, format!("unknown field {stray:?}")));
                }
                Ok(())
            }
            Type::Union(alternatives) => {
                let object = value.as_object().ok_or_else(|| {
                    SchemaError::new(path, format!("expected tagged object, got {value}"))
                })?;
                if object.len() != 1 {
                    return Err(SchemaError::new(
                        path,
                        format!("expected exactly one alternative, got {}", object.len()),
                    ));
                }
                let (tag, inner) = object
                    .iter()
                    .next()
                    .ok_or_else(|| SchemaError::new(path, "empty tagged object"))?;
                let alternative = alternatives
                    .iter()
                    .find(|a| &a.name == tag)
                    .ok_or_else(|| SchemaError::new(path, format!("unknown alternative {tag:?}")))?;
                alternative.ty.validate_at(&format!("{path}.{tag}"), inner)
            }
            Type::List(element) => {
                let items = value.as_array().ok_or_else(|| {
                    SchemaError::new(path, format!("expected array, got {value}"))
                })?;
                for (index, item) in items.iter().enumerate() {
                    element.validate_at(&format!("{path}[{index}]"), item)?;
                }
                Ok(())
            }
        }
    }

    /// Coerces a line of typed console input into a value of this type.
    ///
    /// Scalars are parsed directly; a bare alternative name is accepted for
    /// unions whose alternative carries no payload; anything structured
    /// falls back to a JSON parse followed by [`Type::validate`].
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the input cannot be read as this type.
    pub fn coerce_str(&self, raw: &str) -> Result<Value, SchemaError> {
        let raw = raw.trim();
        match self {
            Type::Unit | Type::Null => {
                if raw.is_empty() || raw == "null" {
                    Ok(Value::Null)
                } else {
                    Err(SchemaError::new("$", format!("expected empty input, got {raw:?}")))
                }
            }
            Type::String => Ok(Value::String(raw.to_string())),
            Type::Number => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| SchemaError::new("$", format!("{raw:?} is not a number"))),
            Type::Boolean => match raw {
                "true" | "yes" | "y" => Ok(Value::Bool(true)),
                "false" | "no" | "n" => Ok(Value::Bool(false)),
                other => Err(SchemaError::new("$", format!("{other:?} is not a boolean"))),
            },
            Type::Union(alternatives) => {
                // A bare name selects a payload-free alternative.
                if let Some(alternative) = alternatives
                    .iter()
                    .find(|a| a.name == raw && matches!(a.ty, Type::Unit | Type::Null))
                {
                    let mut tagged = Map::new();
                    tagged.insert(alternative.name.clone(), Value::Null);
                    return Ok(Value::Object(tagged));
                }
                self.coerce_json(raw)
            }
            Type::Product(_) | Type::List(_) => self.coerce_json(raw),
        }
    }

    fn coerce_json(&self, raw: &str) -> Result<Value, SchemaError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| SchemaError::new("$", format!("not valid JSON: {e}")))?;
        self.validate(&value)?;
        Ok(value)
    }

    /// Renders this type as a JSON Schema fragment for structured output.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Type::Unit | Type::Null => json!({ "type": "null" }),
            Type::String => json!({ "type": "string" }),
            Type::Number => json!({ "type": "number" }),
            Type::Boolean => json!({ "type": "boolean" }),
            Type::Product(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    let mut schema = field.ty.to_json_schema();
                    if let Some(object) = schema.as_object_mut() {
                        object.insert("description".into(), json!(field.description));
                    }
                    properties.insert(field.name.clone(), schema);
                    required.push(json!(field.name));
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false,
                })
            }
            Type::Union(alternatives) => {
                let variants: Vec<Value> = alternatives
                    .iter()
                    .map(|alternative| {
                        let mut properties = Map::new();
                        properties.insert(alternative.name.clone(), alternative.ty.to_json_schema());
                        json!({
                            "type": "object",
                            "description": alternative.description,
                            "properties": properties,
                            "required": [&alternative.name],
                            "additionalProperties": false,
                        })
                    })
                    .collect();
                json!({ "oneOf": variants })
            }
            Type::List(element) => json!({
                "type": "array",
                "items": element.to_json_schema(),
            }),
        }
    }
}

/// A named form: a [`Type`] plus presentation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    /// Stable identifier for the form (e.g. `"vote"`).
    pub name: String,
    /// Human-readable description of what is being asked.
    pub description: String,
    /// Expected shape of the answer.
    pub schema: Type,
}

impl Form {
    /// Creates a form.
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: Type) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }

    /// Renders the full form as a JSON Schema document.
    pub fn to_json_schema(&self) -> Value {
        let mut schema = self.schema.to_json_schema();
        if let Some(object) = schema.as_object_mut() {
            object.insert("title".into(), json!(self.name));
            object.insert("description".into(), json!(self.description));
        }
        schema
    }
}

/// Schema violation: a value did not match its declared [`Type`].
#[derive(Debug, Clone, Display, Error)]
#[display("schema violation at {path}: {message}")]
pub struct SchemaError {
    /// JSON-path-like location of the violation.
    pub path: String,
    /// What went wrong there.
    pub message: String,
}

impl SchemaError {
    /// Creates a new schema error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
