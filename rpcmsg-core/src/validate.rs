//! Field rules shared by the builders and envelope conversion
//!
//! Each check records its violation message and hands back the typed value
//! when the field is valid. Checks never stop early: a caller runs every rule
//! that applies, then asks for the collected list.

use crate::error::ValidationErrors;
use crate::types::{ErrorObject, Id, Params};
use serde_json::Value;

pub const ID_REQUIRED: &str =
    "An ID must be provided. It must be either a string or an integer (no fractions allowed)";
pub const METHOD_EMPTY: &str = "Method should be a non-empty string";
pub const RESULT_REQUIRED: &str = "Result must exist for success Response objects";
pub const ERROR_NOT_OBJECT: &str =
    "Error must be an object conforming to the JSON-RPC 2.0 error object specs";
pub const ERROR_NOT_RECOGNIZED: &str =
    "Error must be an instance of JsonRpcError, or any derivatives of it";

/// Name of a raw argument's JSON type, `undefined` when absent
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

pub fn method_type_message(value: Option<&Value>) -> String {
    format!("Method should be a string. Received {} instead", type_name(value))
}

pub fn params_type_message(value: Option<&Value>) -> String {
    format!(
        "Params should be either an array or an object. Received {} instead",
        type_name(value)
    )
}

pub fn is_valid_id(value: &Value) -> bool {
    Id::from_value(value).is_some()
}

/// Violation accumulator
#[derive(Debug, Default)]
pub struct Checks {
    errors: ValidationErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message);
    }

    /// Required identifier
    pub fn id(&mut self, value: Option<&Value>) -> Option<Id> {
        let id = value.and_then(Id::from_value);
        if id.is_none() {
            self.push(ID_REQUIRED);
        }
        id
    }

    /// Required, non-empty method name
    pub fn method(&mut self, value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(method)) if method.is_empty() => {
                self.push(METHOD_EMPTY);
                None
            }
            Some(Value::String(method)) => Some(method.clone()),
            other => {
                self.push(method_type_message(other));
                None
            }
        }
    }

    /// Optional params
    ///
    /// `Some(None)` means the field is absent, which is valid; the outer
    /// `None` means a violation was recorded.
    pub fn params(&mut self, value: Option<&Value>) -> Option<Option<Params>> {
        match value {
            None => Some(None),
            Some(raw) => match Params::from_value(raw) {
                Some(params) => Some(Some(params)),
                None => {
                    self.push(params_type_message(value));
                    None
                }
            },
        }
    }

    /// Required result; any value counts, `null` included
    pub fn result<'v>(&mut self, value: Option<&'v Value>) -> Option<&'v Value> {
        if value.is_none() {
            self.push(RESULT_REQUIRED);
        }
        value
    }

    /// Inbound error member: must decode as `{code, message, data?}`
    pub fn error_object(&mut self, value: Option<&Value>) -> Option<ErrorObject> {
        let object = value
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value::<ErrorObject>(v.clone()).ok());
        if object.is_none() {
            self.push(ERROR_NOT_OBJECT);
        }
        object
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> ValidationErrors {
        self.errors
    }
}
