//! Parameter extraction for tool requests.
//!
//! Tool arguments arrive as an untyped JSON object. Handlers never read that
//! map directly; they pull each value through the functions in this module,
//! which apply one uniform contract:
//!
//! - `required_*` rejects an absent key, a value of the wrong kind, and a
//!   value equal to its kind's zero value (`""`, `0`, `false`, `{}`).
//! - `optional_*` returns `None` for an absent key and only rejects a value
//!   of the wrong kind. Zero values are legitimate here.
//! - `*_with_default` substitutes the default only when the key is absent.

use std::collections::BTreeMap;
use std::fmt;

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for parameter extraction.
pub type ParamResult<T> = Result<T, ParamError>;

// ============================================================================
// Request
// ============================================================================

/// A single tool invocation: the tool name plus its raw argument map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRequest {
    name: String,
    arguments: JsonObject,
}

impl ToolRequest {
    /// Create a request. Missing arguments are treated as an empty map.
    pub fn new(name: impl Into<String>, arguments: Option<JsonObject>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.unwrap_or_default(),
        }
    }

    /// Build a request from a JSON value; anything but an object yields no arguments.
    pub fn from_value(name: impl Into<String>, arguments: Value) -> Self {
        match arguments {
            Value::Object(map) => Self::new(name, Some(map)),
            _ => Self::new(name, None),
        }
    }

    /// The requested tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw argument map.
    pub fn arguments(&self) -> &JsonObject {
        &self.arguments
    }

    /// Look up a raw argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Whether the argument key is present (even if null).
    pub fn contains(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// The kinds of value a parameter can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    StringArray,
    Object,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::StringArray => "string array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// A parameter failed the extraction contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The parameter is absent, or required and equal to its zero value.
    #[error("missing required parameter: {name}")]
    Missing { name: String },

    /// The parameter (or one of its elements, named `param[index]`) has the wrong kind.
    #[error("parameter {name} is not of type {expected}, is {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        actual: &'static str,
    },
}

impl ParamError {
    fn missing(name: &str) -> Self {
        Self::Missing {
            name: name.to_string(),
        }
    }

    fn mismatch(name: impl Into<String>, expected: ParamKind, value: &Value) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual: json_kind(value),
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            Self::Missing { name } | Self::TypeMismatch { name, .. } => name,
        }
    }
}

/// Describe the JSON kind of a value for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Typed values
// ============================================================================

/// A Rust type a parameter can be extracted as.
pub trait ParamValue: Sized {
    /// The declared kind, used in mismatch errors.
    const KIND: ParamKind;

    /// Convert the raw value, or `None` if it is of another kind.
    fn from_value(value: &Value) -> Option<Self>;

    /// Whether this is the zero value of the kind.
    fn is_zero(&self) -> bool;
}

impl ParamValue for String {
    const KIND: ParamKind = ParamKind::String;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// Strict integer: only integral JSON numbers.
impl ParamValue for i64 {
    const KIND: ParamKind = ParamKind::Integer;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl ParamValue for f64 {
    const KIND: ParamKind = ParamKind::Number;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl ParamValue for bool {
    const KIND: ParamKind = ParamKind::Boolean;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl ParamValue for JsonObject {
    const KIND: ParamKind = ParamKind::Object;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// ============================================================================
// Contract
// ============================================================================

/// Fetch a required parameter of kind `T`.
pub fn required_param<T: ParamValue>(request: &ToolRequest, name: &str) -> ParamResult<T> {
    let raw = request.get(name).ok_or_else(|| ParamError::missing(name))?;
    let value = T::from_value(raw).ok_or_else(|| ParamError::mismatch(name, T::KIND, raw))?;
    if value.is_zero() {
        return Err(ParamError::missing(name));
    }
    Ok(value)
}

/// Fetch an optional parameter of kind `T`. Absence is not an error.
pub fn optional_param<T: ParamValue>(request: &ToolRequest, name: &str) -> ParamResult<Option<T>> {
    match request.get(name) {
        None => Ok(None),
        Some(raw) => T::from_value(raw)
            .map(Some)
            .ok_or_else(|| ParamError::mismatch(name, T::KIND, raw)),
    }
}

/// Truncate toward zero; out-of-range values saturate.
fn truncate(number: f64) -> i64 {
    number.trunc() as i64
}

/// Fetch a required integer, accepting fractional numbers and truncating them.
///
/// The zero check runs on the number as sent, so `0.5` passes and yields `0`.
pub fn required_int_param(request: &ToolRequest, name: &str) -> ParamResult<i64> {
    let raw = request.get(name).ok_or_else(|| ParamError::missing(name))?;
    if let Some(int) = raw.as_i64() {
        return if int == 0 {
            Err(ParamError::missing(name))
        } else {
            Ok(int)
        };
    }
    required_param::<f64>(request, name).map(truncate)
}

/// Fetch an optional integer, accepting fractional numbers and truncating them.
pub fn optional_int_param(request: &ToolRequest, name: &str) -> ParamResult<Option<i64>> {
    if let Some(int) = request.get(name).and_then(Value::as_i64) {
        return Ok(Some(int));
    }
    Ok(optional_param::<f64>(request, name)?.map(truncate))
}

/// Fetch an optional integer, using `default` only when the key is absent.
pub fn optional_int_param_with_default(
    request: &ToolRequest,
    name: &str,
    default: i64,
) -> ParamResult<i64> {
    Ok(optional_int_param(request, name)?.unwrap_or(default))
}

/// Fetch an optional boolean, using `default` only when the key is absent.
pub fn optional_bool_param_with_default(
    request: &ToolRequest,
    name: &str,
    default: bool,
) -> ParamResult<bool> {
    Ok(optional_param::<bool>(request, name)?.unwrap_or(default))
}

/// Fetch an optional array of strings.
///
/// Absent or null yields an empty vector. Every element must be a string;
/// the first one that is not is reported as `name[index]`.
pub fn optional_string_array_param(request: &ToolRequest, name: &str) -> ParamResult<Vec<String>> {
    match request.get(name) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ParamError::mismatch(format!("{name}[{index}]"), ParamKind::String, item)
                })
            })
            .collect(),
        Some(other) => Err(ParamError::mismatch(name, ParamKind::StringArray, other)),
    }
}

/// Fetch a required object whose values are all strings.
///
/// An empty object counts as missing. The first non-string value is
/// reported as `name[key]`.
pub fn required_string_map_param(
    request: &ToolRequest,
    name: &str,
) -> ParamResult<BTreeMap<String, String>> {
    required_param::<JsonObject>(request, name)?
        .iter()
        .map(|(key, item)| match item.as_str() {
            Some(text) => Ok((key.clone(), text.to_string())),
            None => Err(ParamError::mismatch(format!("{name}[{key}]"), ParamKind::String, item)),
        })
        .collect()
}

/// Parameters of a tool that takes no arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NoParams {}

// ============================================================================
// Tests
// ============================================================================
