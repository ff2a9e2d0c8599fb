//! Message builders
//!
//! Each builder takes raw, possibly missing arguments, checks every JSON-RPC
//! 2.0 field rule that applies and returns either the wire text or the full
//! list of violations. Builders never panic and never stop at the first
//! problem; id rules are always reported before payload rules.
//!
//! | builder | checks | emits |
//! |---|---|---|
//! | [`request`] | id, method, params | `{jsonrpc, id, method, params?}` |
//! | [`notification`] | method, params | `{jsonrpc, method, params?}` |
//! | [`success`] | id, result | `{jsonrpc, id, result}` |
//! | [`error`] | id, error | `{jsonrpc, id, error}` |
//!
//! # Examples
//!
//! ```rust
//! use rpcmsg_core::builder;
//! use serde_json::json;
//!
//! let text = builder::request(Some(&json!(1)), Some(&json!("add")), Some(&json!([2, 3]))).unwrap();
//! assert_eq!(text, r#"{"jsonrpc":"2.0","id":1,"method":"add","params":[2,3]}"#);
//!
//! let errors = builder::notification(None, None).unwrap_err();
//! assert_eq!(errors.as_slice(), ["Method should be a string. Received undefined instead"]);
//! ```

use crate::codec;
use crate::error::{JsonRpcError, ValidationErrors};
use crate::types::{ErrorResponse, MessageType, Notification, Request, SuccessResponse};
use crate::validate::{self, Checks};
use serde::Serialize;
use serde_json::Value;

/// Outcome of a builder: wire text or every violated rule
pub type BuildResult = std::result::Result<String, ValidationErrors>;

/// The `error` argument of [`error`]
///
/// Only [`ErrorArg::Rpc`] can succeed. [`ErrorArg::Value`] exists so that
/// arbitrary data (for example an error object lifted from an inbound
/// message) can be passed and rejected with a precise reason instead of being
/// re-emitted as if this side had produced it.
#[derive(Debug, Clone, Copy)]
pub enum ErrorArg<'a> {
    /// Built through the [`JsonRpcError`] constructors
    Rpc(&'a JsonRpcError),
    /// Any other JSON value
    Value(&'a Value),
}

impl<'a> From<&'a JsonRpcError> for ErrorArg<'a> {
    fn from(error: &'a JsonRpcError) -> Self {
        ErrorArg::Rpc(error)
    }
}

impl<'a> From<&'a Value> for ErrorArg<'a> {
    fn from(value: &'a Value) -> Self {
        ErrorArg::Value(value)
    }
}

/// Build a Request
///
/// `params` may be omitted; when given it must be an array or an object.
pub fn request(id: Option<&Value>, method: Option<&Value>, params: Option<&Value>) -> BuildResult {
    let mut checks = Checks::new();
    let id = checks.id(id);
    let method = checks.method(method);
    let params = checks.params(params);

    match (id, method, params) {
        (Some(id), Some(method), Some(params)) if checks.is_empty() => {
            emit(MessageType::Request, &Request::new(id, method, params))
        }
        _ => reject(MessageType::Request, checks),
    }
}

/// Build a Notification; no id is ever read or written
pub fn notification(method: Option<&Value>, params: Option<&Value>) -> BuildResult {
    let mut checks = Checks::new();
    let method = checks.method(method);
    let params = checks.params(params);

    match (method, params) {
        (Some(method), Some(params)) if checks.is_empty() => emit(
            MessageType::Notification,
            &Notification::new(method, params),
        ),
        _ => reject(MessageType::Notification, checks),
    }
}

/// Build a Success Response
///
/// Any present `result` is accepted, `null` and other falsy values included.
pub fn success(id: Option<&Value>, result: Option<&Value>) -> BuildResult {
    let mut checks = Checks::new();
    let id = checks.id(id);
    let result = checks.result(result);

    match (id, result) {
        (Some(id), Some(result)) if checks.is_empty() => emit(
            MessageType::Success,
            &SuccessResponse::new(id, result.clone()),
        ),
        _ => reject(MessageType::Success, checks),
    }
}

/// Build an Error Response
///
/// The error must be a [`JsonRpcError`]. A missing error or a non-object value
/// is reported as not conforming to the error object shape; any JSON object,
/// even one with a valid `code` and `message`, is reported as not being a
/// recognized error.
///
/// ```rust
/// use rpcmsg_core::{builder, JsonRpcError};
/// use serde_json::json;
///
/// let error = JsonRpcError::invalid_params();
/// let text = builder::error(Some(&json!("a1")), Some((&error).into())).unwrap();
/// assert!(text.contains(r#""code":-32602"#));
///
/// let forged = json!({"code": -32602, "message": "Invalid params"});
/// let errors = builder::error(Some(&json!("a1")), Some((&forged).into())).unwrap_err();
/// assert_eq!(
///     errors.as_slice(),
///     ["Error must be an instance of JsonRpcError, or any derivatives of it"]
/// );
/// ```
pub fn error(id: Option<&Value>, error: Option<ErrorArg<'_>>) -> BuildResult {
    let mut checks = Checks::new();
    let id = checks.id(id);
    let error = recognized_error(&mut checks, error);

    match (id, error) {
        (Some(id), Some(error)) if checks.is_empty() => {
            emit(MessageType::Error, &ErrorResponse::new(id, error))
        }
        _ => reject(MessageType::Error, checks),
    }
}

/// Shape first, capability second
fn recognized_error<'a>(
    checks: &mut Checks,
    error: Option<ErrorArg<'a>>,
) -> Option<&'a JsonRpcError> {
    match error {
        Some(ErrorArg::Rpc(error)) => Some(error),
        Some(ErrorArg::Value(value)) if value.is_object() => {
            checks.push(validate::ERROR_NOT_RECOGNIZED);
            None
        }
        _ => {
            checks.push(validate::ERROR_NOT_OBJECT);
            None
        }
    }
}

/// Encode a message whose fields already passed validation
///
/// Typed messages hold only strings, numbers and `serde_json::Value`s, so
/// encoding cannot fail. A failure here is a bug: it is logged at error level
/// and asserted in debug builds.
fn emit<T: Serialize>(kind: MessageType, message: &T) -> BuildResult {
    codec::encode(message).map_err(|e| {
        tracing::error!(kind = %kind, error = %e, "Validated message failed to encode");
        debug_assert!(false, "validated {} message failed to encode: {}", kind, e);
        ValidationErrors::from(vec![format!("Internal error: {} message could not be encoded", kind)])
    })
}

fn reject(kind: MessageType, checks: Checks) -> BuildResult {
    let errors = checks.finish();
    tracing::debug!(
        kind = %kind,
        violations = errors.len(),
        "Rejected message arguments"
    );
    Err(errors)
}
