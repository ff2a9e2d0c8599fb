//! Encoding and classification of JSON-RPC messages
//!
//! Outbound, typed messages are encoded with [`encode`] and its per-type
//! wrappers. Inbound, [`deserialize`] parses wire text and sorts it into one
//! of the four message classes.
//!
//! # Classification
//!
//! Classification looks only at which of `method`, `id`, `result` and `error`
//! are present, never at their values:
//!
//! | method | id | result | error | class |
//! |---|---|---|---|---|
//! | yes | yes | any | any | request |
//! | yes | no | any | any | notification |
//! | no | any | yes | no | success |
//! | no | any | no | yes | error |
//!
//! Anything else is an Invalid Request (-32600); text that is not JSON at all
//! is a Parse error (-32700). The `jsonrpc` tag is not checked and is removed
//! from the returned payload.
//!
//! # Examples
//!
//! ```rust
//! use rpcmsg_core::{codec, MessageType};
//!
//! let envelope = codec::decode(r#"{"jsonrpc":"2.0","method":"tick"}"#).unwrap();
//! assert_eq!(envelope.kind, MessageType::Notification);
//! assert!(!envelope.payload.contains_key("jsonrpc"));
//!
//! let error = codec::decode(r#"{"foo":"bar"}"#).unwrap_err();
//! assert_eq!(error.code(), -32600);
//! ```

use crate::error::{Error, JsonRpcError, Result};
use crate::types::{
    Envelope, ErrorResponse, MessageType, Notification, Request, SuccessResponse,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Encode any serializable message to JSON text
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

pub fn encode_request(req: &Request) -> Result<String> {
    encode(req)
}

pub fn encode_notification(notif: &Notification) -> Result<String> {
    encode(notif)
}

pub fn encode_success(resp: &SuccessResponse) -> Result<String> {
    encode(resp)
}

pub fn encode_error(resp: &ErrorResponse) -> Result<String> {
    encode(resp)
}

/// Parse and classify inbound text
///
/// `None` stands for input that never arrived and is treated like any other
/// unparsable text.
///
/// # Errors
///
/// - [`JsonRpcError::Parse`] when `text` is missing or not valid JSON
/// - [`JsonRpcError::InvalidRequest`] when the JSON is not an object, or is an
///   object matching none of the four message shapes
pub fn deserialize(text: Option<&str>) -> std::result::Result<Envelope, JsonRpcError> {
    let value = parse(text)?;
    classify(value)
}

/// [`deserialize`] for text that is known to be present
pub fn decode(text: &str) -> std::result::Result<Envelope, JsonRpcError> {
    deserialize(Some(text))
}

/// Parse and classify a batch
///
/// A JSON array is classified element by element; each element gets its own
/// outcome so that one malformed entry does not hide the others. A single
/// object is treated as a batch of one.
///
/// # Errors
///
/// - [`JsonRpcError::Parse`] when the text is missing or not valid JSON
/// - [`JsonRpcError::InvalidRequest`] for an empty array
///
/// ```rust
/// use rpcmsg_core::codec;
///
/// let text = r#"[{"jsonrpc":"2.0","method":"a"},{"foo":1}]"#;
/// let outcomes = codec::deserialize_batch(Some(text)).unwrap();
/// assert_eq!(outcomes.len(), 2);
/// assert!(outcomes[0].is_ok());
/// assert!(outcomes[1].is_err());
/// ```
pub fn deserialize_batch(
    text: Option<&str>,
) -> std::result::Result<Vec<std::result::Result<Envelope, JsonRpcError>>, JsonRpcError> {
    match parse(text)? {
        Value::Array(items) if items.is_empty() => {
            tracing::debug!("Rejected empty batch");
            Err(JsonRpcError::invalid_request().with_data(Value::from("Batch cannot be empty")))
        }
        Value::Array(items) => Ok(items.into_iter().map(classify).collect()),
        single => Ok(vec![classify(single)]),
    }
}

fn parse(text: Option<&str>) -> std::result::Result<Value, JsonRpcError> {
    let Some(text) = text else {
        tracing::debug!("No input to deserialize");
        return Err(JsonRpcError::parse_error());
    };

    serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, len = text.len(), "Inbound text is not valid JSON");
        JsonRpcError::parse_error()
    })
}

/// Presence of the discriminating members
#[derive(Debug, Default, Clone, Copy)]
struct Shape {
    method: bool,
    id: bool,
    result: bool,
    error: bool,
}

impl Shape {
    fn of(object: &Map<String, Value>) -> Self {
        let mut shape = Shape::default();
        for key in object.keys() {
            match key.as_str() {
                "method" => shape.method = true,
                "id" => shape.id = true,
                "result" => shape.result = true,
                "error" => shape.error = true,
                _ => {}
            }
        }
        shape
    }

    fn kind(self) -> Option<MessageType> {
        match (self.method, self.id, self.result, self.error) {
            (true, true, _, _) => Some(MessageType::Request),
            (true, false, _, _) => Some(MessageType::Notification),
            (false, _, true, false) => Some(MessageType::Success),
            (false, _, false, true) => Some(MessageType::Error),
            _ => None,
        }
    }
}

fn classify(value: Value) -> std::result::Result<Envelope, JsonRpcError> {
    let Value::Object(mut payload) = value else {
        tracing::debug!("Inbound JSON is not an object");
        return Err(JsonRpcError::invalid_request());
    };

    let shape = Shape::of(&payload);
    let Some(kind) = shape.kind() else {
        tracing::debug!(?shape, "Inbound object matches no message shape");
        return Err(JsonRpcError::invalid_request());
    };

    payload.remove("jsonrpc");
    tracing::trace!(%kind, "Classified inbound message");
    Ok(Envelope { kind, payload })
}
