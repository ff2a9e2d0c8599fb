//! Error types for rpcmsg
//!
//! Two reporting channels exist and are never mixed:
//!
//! - **ValidationErrors**: returned by the builders when their arguments break
//!   one or more JSON-RPC 2.0 field rules. It lists every violation.
//! - **JsonRpcError**: the protocol error taxonomy. The deserializer fails with
//!   one of these, and they are the only values `builder::error` accepts as
//!   the `error` member of an Error Response.
//!
//! # Standard Error Codes
//!
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid Request (not a valid message object)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! Anything else is carried by [`JsonRpcError::Custom`].
//!
//! # Examples
//!
//! ```rust
//! use rpcmsg_core::JsonRpcError;
//!
//! let error = JsonRpcError::method_not_found();
//! assert_eq!(error.code(), -32601);
//! assert_eq!(error.to_string(), "[-32601] Method not found");
//! ```

use crate::types::ErrorObject;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for rpcmsg operations that are neither builders nor the
/// deserializer (typed encoding, envelope conversion through `?`).
pub type Result<T> = std::result::Result<T, Error>;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Crate-level error
///
/// Wraps both reporting channels so callers mixing builders, typed encoding
/// and decoding can use a single `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Builder arguments broke one or more field rules
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Inbound text violated the protocol
    #[error("JSON-RPC error: {0}")]
    Protocol(#[from] JsonRpcError),

    /// A typed message could not be turned into JSON text
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// JSON-RPC 2.0 protocol error
///
/// The recognized error capability. Every variant carries a human-readable
/// message and optional structured `data`; the numeric code is fixed per
/// variant except for [`JsonRpcError::Custom`].
///
/// A JSON object that merely looks like an error object is not a
/// `JsonRpcError`. Values of this type come only from the constructors below
/// (or from the deserializer), which is what lets `builder::error` refuse
/// forged payloads.
///
/// # Examples
///
/// ```rust
/// use rpcmsg_core::JsonRpcError;
/// use serde_json::json;
///
/// let error = JsonRpcError::invalid_params()
///     .with_data(json!({"missing": ["amount"]}));
/// assert_eq!(error.code(), -32602);
/// assert_eq!(error.message(), "Invalid params");
///
/// let custom = JsonRpcError::custom(1001, "Insufficient funds");
/// assert_eq!(custom.code(), 1001);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonRpcError {
    /// Invalid JSON was received (-32700)
    #[error("[-32700] {message}")]
    Parse {
        message: String,
        data: Option<Value>,
    },

    /// The JSON is not a valid message object (-32600)
    #[error("[-32600] {message}")]
    InvalidRequest {
        message: String,
        data: Option<Value>,
    },

    /// The method does not exist or is not available (-32601)
    #[error("[-32601] {message}")]
    MethodNotFound {
        message: String,
        data: Option<Value>,
    },

    /// Invalid method parameters (-32602)
    #[error("[-32602] {message}")]
    InvalidParams {
        message: String,
        data: Option<Value>,
    },

    /// Internal JSON-RPC error (-32603)
    ///
    /// Also the code of the base error built with [`JsonRpcError::new`].
    #[error("[-32603] {message}")]
    Internal {
        message: String,
        data: Option<Value>,
    },

    /// Application or server defined error with its own code
    #[error("[{code}] {message}")]
    Custom {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl JsonRpcError {
    /// Base error with a custom message
    ///
    /// Carries the internal error code (-32603). Use one of the specific
    /// constructors, or [`JsonRpcError::custom`] for application codes.
    ///
    /// ```rust
    /// use rpcmsg_core::JsonRpcError;
    ///
    /// let error = JsonRpcError::new("Crazy error");
    /// assert_eq!(error.code(), -32603);
    /// assert_eq!(error.message(), "Crazy error");
    /// ```
    pub fn new(message: impl Into<String>) -> Self {
        JsonRpcError::Internal {
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (-32700)
    pub fn parse_error() -> Self {
        JsonRpcError::Parse {
            message: "Parse error".to_string(),
            data: None,
        }
    }

    /// Invalid Request error (-32600)
    pub fn invalid_request() -> Self {
        JsonRpcError::InvalidRequest {
            message: "Invalid Request".to_string(),
            data: None,
        }
    }

    /// Method not found error (-32601)
    pub fn method_not_found() -> Self {
        JsonRpcError::MethodNotFound {
            message: "Method not found".to_string(),
            data: None,
        }
    }

    /// Invalid params error (-32602)
    pub fn invalid_params() -> Self {
        JsonRpcError::InvalidParams {
            message: "Invalid params".to_string(),
            data: None,
        }
    }

    /// Internal error (-32603)
    pub fn internal_error() -> Self {
        Self::new("Internal error")
    }

    /// Error with an application-defined code
    ///
    /// Codes from -32768 to -32000 are reserved by JSON-RPC 2.0; -32000 to
    /// -32099 are left for implementation-defined server errors.
    pub fn custom(code: i64, message: impl Into<String>) -> Self {
        JsonRpcError::Custom {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Replace the message, keeping code and data
    pub fn with_message(mut self, new_message: impl Into<String>) -> Self {
        *self.parts_mut().0 = new_message.into();
        self
    }

    /// Attach structured data
    pub fn with_data(mut self, new_data: Value) -> Self {
        *self.parts_mut().1 = Some(new_data);
        self
    }

    /// Numeric error code
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcError::Parse { .. } => PARSE_ERROR,
            JsonRpcError::InvalidRequest { .. } => INVALID_REQUEST,
            JsonRpcError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            JsonRpcError::InvalidParams { .. } => INVALID_PARAMS,
            JsonRpcError::Internal { .. } => INTERNAL_ERROR,
            JsonRpcError::Custom { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            JsonRpcError::Parse { message, .. }
            | JsonRpcError::InvalidRequest { message, .. }
            | JsonRpcError::MethodNotFound { message, .. }
            | JsonRpcError::InvalidParams { message, .. }
            | JsonRpcError::Internal { message, .. }
            | JsonRpcError::Custom { message, .. } => message,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            JsonRpcError::Parse { data, .. }
            | JsonRpcError::InvalidRequest { data, .. }
            | JsonRpcError::MethodNotFound { data, .. }
            | JsonRpcError::InvalidParams { data, .. }
            | JsonRpcError::Internal { data, .. }
            | JsonRpcError::Custom { data, .. } => data.as_ref(),
        }
    }

    /// Wire form of this error, as placed in an Error Response
    pub fn to_object(&self) -> ErrorObject {
        ErrorObject {
            code: self.code(),
            message: self.message().to_string(),
            data: self.data().cloned(),
        }
    }

    fn parts_mut(&mut self) -> (&mut String, &mut Option<Value>) {
        match self {
            JsonRpcError::Parse { message, data }
            | JsonRpcError::InvalidRequest { message, data }
            | JsonRpcError::MethodNotFound { message, data }
            | JsonRpcError::InvalidParams { message, data }
            | JsonRpcError::Internal { message, data }
            | JsonRpcError::Custom { message, data, .. } => (message, data),
        }
    }
}

impl From<&JsonRpcError> for ErrorObject {
    fn from(error: &JsonRpcError) -> Self {
        error.to_object()
    }
}

/// Ordered list of builder rule violations
///
/// Returned by every builder instead of wire text when at least one rule is
/// broken. Messages appear in rule order: id checks first, then payload
/// checks. Never empty when returned from a builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| m == message)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<String>> for ValidationErrors {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
