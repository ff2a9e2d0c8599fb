//! JSON-RPC 2.0 message types
//!
//! Typed counterparts of the four wire shapes:
//!
//! 1. **Request**: `{jsonrpc, id, method, params?}`
//! 2. **Notification**: `{jsonrpc, method, params?}`
//! 3. **Success Response**: `{jsonrpc, id, result}`
//! 4. **Error Response**: `{jsonrpc, id, error: {code, message, data?}}`
//!
//! plus [`Envelope`], the classified output of `codec::deserialize`, and
//! [`Message`], its typed view.
//!
//! # Identifiers
//!
//! An id is a string or an integer of any magnitude. Integral floats such as
//! `3.0` or `1e20` count as integers; fractional numbers, `null`, booleans and
//! containers do not.

use crate::error::{JsonRpcError, INVALID_REQUEST};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Protocol version tag written on every outbound message
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 message identifier
///
/// # Examples
///
/// ```rust
/// use rpcmsg_core::Id;
/// use serde_json::json;
///
/// let id: Id = "req-123".into();
/// assert_eq!(id.to_string(), "\"req-123\"");
///
/// assert_eq!(Id::from_value(&json!(7.0)), Some(Id::from(7)));
/// assert_eq!(Id::from_value(&json!(7.5)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    String(String),
    Number(Number),
}

impl Id {
    /// Interpret a raw JSON value as an identifier
    ///
    /// Returns `None` unless the value is a string or a number without a
    /// fractional part. Integral floats are stored as integers when they fit
    /// `i64` or `u64`, and kept as written otherwise.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Id::String(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Id::Number(n.clone())),
            Value::Number(n) => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                let number = if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Number::from(f as i64)
                } else if f >= 0.0 && f < u64::MAX as f64 {
                    Number::from(f as u64)
                } else {
                    n.clone()
                };
                Some(Id::Number(number))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n),
        }
    }
}

/// Method parameters: positional or named, never a scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl Params {
    /// Accepts arrays and objects, rejects everything else
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Params::Array(items.clone())),
            Value::Object(map) => Some(Params::Object(map.clone())),
            _ => None,
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Array(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Object(map)
    }
}

/// Wire shape of the `error` member of an Error Response
///
/// This is plain data. It is what arrives from a peer, and what a
/// [`JsonRpcError`] turns into when serialized; building one by hand does
/// not make it acceptable to `builder::error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 request
///
/// ```rust
/// use rpcmsg_core::{Id, Params, Request};
/// use serde_json::json;
///
/// let request = Request::new(Id::from(1), "subtract", Some(Params::Array(vec![json!(42), json!(23)])));
/// assert_eq!(request.jsonrpc, "2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub id: Id,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Request {
    pub fn new(id: Id, method: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 notification: a request without an id, expecting no reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Notification {
    pub fn new(method: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// Successful reply; `result` may be any value, `null` included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub jsonrpc: String,
    pub id: Id,
    pub result: Value,
}

impl SuccessResponse {
    pub fn new(id: Id, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

/// Failed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub jsonrpc: String,
    pub id: Id,
    pub error: ErrorObject,
}

impl ErrorResponse {
    /// Error reply carrying a recognized [`JsonRpcError`]
    pub fn new(id: Id, error: &JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: error.to_object(),
        }
    }
}

/// The four message classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Request,
    Notification,
    Success,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Request => "request",
            MessageType::Notification => "notification",
            MessageType::Success => "success",
            MessageType::Error => "error",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified inbound message
///
/// `payload` is the decoded object exactly as received, minus the `jsonrpc`
/// version tag. Its fields are not validated; use [`Envelope::into_message`]
/// for a checked, typed view.
///
/// Serializes as `{"type": "...", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub payload: Map<String, Value>,
}

/// Typed, validated view of an [`Envelope`]
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Request(Request),
    Notification(Notification),
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Message {
    pub fn kind(&self) -> MessageType {
        match self {
            Message::Request(_) => MessageType::Request,
            Message::Notification(_) => MessageType::Notification,
            Message::Success(_) => MessageType::Success,
            Message::Error(_) => MessageType::Error,
        }
    }
}

impl Envelope {
    /// Check the payload fields and convert to a typed [`Message`]
    ///
    /// Applies the same field rules the builders use. Any violation fails with
    /// an Invalid Request error whose `data` lists the violations.
    ///
    /// ```rust
    /// use rpcmsg_core::{codec, Message};
    ///
    /// let envelope = codec::decode(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
    /// match envelope.into_message().unwrap() {
    ///     Message::Request(request) => assert_eq!(request.method, "ping"),
    ///     other => panic!("unexpected {:?}", other),
    /// }
    ///
    /// let envelope = codec::decode(r#"{"id":1.5,"method":"ping"}"#).unwrap();
    /// assert_eq!(envelope.into_message().unwrap_err().code(), -32600);
    /// ```
    pub fn into_message(self) -> std::result::Result<Message, JsonRpcError> {
        let payload = &self.payload;
        let mut checks = validate::Checks::new();

        let message = match self.kind {
            MessageType::Request => {
                let id = checks.id(payload.get("id"));
                let method = checks.method(payload.get("method"));
                let params = checks.params(payload.get("params"));
                match (id, method, params) {
                    (Some(id), Some(method), Some(params)) => {
                        Some(Message::Request(Request::new(id, method, params)))
                    }
                    _ => None,
                }
            }
            MessageType::Notification => {
                let method = checks.method(payload.get("method"));
                let params = checks.params(payload.get("params"));
                match (method, params) {
                    (Some(method), Some(params)) => {
                        Some(Message::Notification(Notification::new(method, params)))
                    }
                    _ => None,
                }
            }
            MessageType::Success => {
                let id = checks.id(payload.get("id"));
                let result = checks.result(payload.get("result"));
                match (id, result) {
                    (Some(id), Some(result)) => {
                        Some(Message::Success(SuccessResponse::new(id, result.clone())))
                    }
                    _ => None,
                }
            }
            MessageType::Error => {
                let id = checks.id(payload.get("id"));
                let error = checks.error_object(payload.get("error"));
                match (id, error) {
                    (Some(id), Some(error)) => Some(Message::Error(ErrorResponse {
                        jsonrpc: JSONRPC_VERSION.to_string(),
                        id,
                        error,
                    })),
                    _ => None,
                }
            }
        };

        match message {
            Some(message) if checks.is_empty() => Ok(message),
            _ => {
                let violations = checks.finish().into_vec();
                tracing::debug!(
                    kind = %self.kind,
                    code = INVALID_REQUEST,
                    violations = violations.len(),
                    "Envelope payload failed validation"
                );
                Err(JsonRpcError::invalid_request().with_data(Value::from(violations)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_display() {
        assert_eq!(Id::String("test".to_string()).to_string(), "\"test\"");
        assert_eq!(Id::from(42).to_string(), "42");
    }

    #[test]
    fn test_id_from_value() {
        assert_eq!(Id::from_value(&json!("abc")), Some(Id::String("abc".into())));
        assert_eq!(Id::from_value(&json!(-3)), Some(Id::from(-3)));
        assert_eq!(Id::from_value(&json!(2.0)), Some(Id::from(2)));
        assert_eq!(Id::from_value(&json!(2.5)), None);
        assert_eq!(Id::from_value(&json!(null)), None);
        assert_eq!(Id::from_value(&json!(true)), None);
        assert_eq!(Id::from_value(&json!([1])), None);
        assert_eq!(Id::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn test_id_beyond_i64_range() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        let id = Id::from_value(&value).unwrap();
        assert_eq!(id, Id::Number(u64::MAX.into()));
        assert_eq!(id.to_string(), "18446744073709551615");
        assert_eq!(Value::from(id), value);

        let value: Value = serde_json::from_str("1e20").unwrap();
        let id = Id::from_value(&value).unwrap();
        assert!(matches!(&id, Id::Number(n) if n.as_f64() == Some(1e20)));
        assert_eq!(Value::from(id), value);

        assert_eq!(Id::from_value(&json!(-1e20)).map(Value::from), Some(json!(-1e20)));
        assert_eq!(Id::from_value(&json!(1e-3)), None);
    }

    #[test]
    fn test_large_id_round_trips_through_serde() {
        let text = r#"{"jsonrpc":"2.0","id":18446744073709551615,"method":"m"}"#;
        let request: Request = serde_json::from_str(text).unwrap();
        assert_eq!(request.id, Id::Number(u64::MAX.into()));
        assert_eq!(serde_json::to_string(&request).unwrap(), text);
    }

    #[test]
    fn test_params_from_value() {
        assert!(matches!(Params::from_value(&json!([1, 2])), Some(Params::Array(_))));
        assert!(matches!(Params::from_value(&json!({"a": 1})), Some(Params::Object(_))));
        assert_eq!(Params::from_value(&json!("params")), None);
        assert_eq!(Params::from_value(&json!(null)), None);
    }

    #[test]
    fn test_request_serialization_omits_missing_params() {
        let request = Request::new(Id::from(1), "test", None);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"test\""));
        assert!(json.contains("\"id\":1"));
        assert!(!json.contains("params"));
    }

    #[test]
    fn test_notification_has_no_id() {
        let notification = Notification::new("notify", Some(Params::Array(vec![json!(1)])));
        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "method": "notify", "params": [1]}));
    }

    #[test]
    fn test_success_keeps_null_result() {
        let response = SuccessResponse::new(Id::from("a"), Value::Null);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": "a", "result": null}));
    }

    #[test]
    fn test_error_response_from_taxonomy() {
        let response = ErrorResponse::new(Id::from(9), &JsonRpcError::method_not_found());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 9, "error": {"code": -32601, "message": "Method not found"}})
        );
    }

    #[test]
    fn test_envelope_serializes_type_tag() {
        let mut payload = Map::new();
        payload.insert("method".to_string(), json!("ping"));
        let envelope = Envelope {
            kind: MessageType::Notification,
            payload,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"type": "notification", "payload": {"method": "ping"}}));
    }

    #[test]
    fn test_into_message_rejects_scalar_params() {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!("id"));
        payload.insert("method".to_string(), json!("method"));
        payload.insert("params".to_string(), json!("params"));
        let envelope = Envelope {
            kind: MessageType::Request,
            payload,
        };

        let error = envelope.into_message().unwrap_err();
        assert_eq!(error.code(), INVALID_REQUEST);
        let data = error.data().unwrap().as_array().unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_into_message_error_response() {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!(4));
        payload.insert("error".to_string(), json!({"code": -32000, "message": "boom"}));
        let envelope = Envelope {
            kind: MessageType::Error,
            payload,
        };

        match envelope.into_message().unwrap() {
            Message::Error(response) => {
                assert_eq!(response.id, Id::from(4));
                assert_eq!(response.error.code, -32000);
                assert_eq!(response.error.message, "boom");
            }
            other => panic!("Expected error response, got {:?}", other),
        }
    }
}
