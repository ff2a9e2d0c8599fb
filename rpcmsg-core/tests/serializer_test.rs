//! Builder and deserializer integration tests

use rpcmsg_core::{builder, codec, JsonRpcError, MessageType};
use serde_json::{json, Map, Value};

const ID_MESSAGE: &str =
    "An ID must be provided. It must be either a string or an integer (no fractions allowed)";
const METHOD_MESSAGE: &str = "Method should be a string. Received undefined instead";

fn without_version(mut value: Value) -> Map<String, Value> {
    let object = value.as_object_mut().unwrap();
    object.remove("jsonrpc");
    object.clone()
}

#[test]
fn test_request_invalid_parameters() {
    let errors = builder::request(None, None, None).unwrap_err();
    assert!(errors.contains(ID_MESSAGE));
    assert!(errors.contains(METHOD_MESSAGE));
    assert_eq!(errors.as_slice(), [ID_MESSAGE, METHOD_MESSAGE]);
}

#[test]
fn test_request_valid_parameters() {
    let id = json!("id");
    let method = json!("method");

    let results = [
        builder::request(Some(&id), Some(&method), None),
        builder::request(Some(&id), Some(&method), Some(&json!(["param1", "param2"]))),
        builder::request(Some(&id), Some(&method), Some(&json!({"param": "foo"}))),
    ];

    for result in results {
        let text = result.unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["id"], "id");
        assert_eq!(value["method"], "method");
    }
}

#[test]
fn test_notification_invalid_parameters() {
    let errors = builder::notification(None, None).unwrap_err();
    assert_eq!(errors.as_slice(), [METHOD_MESSAGE]);
}

#[test]
fn test_notification_valid_parameters() {
    let method = json!("method");

    assert!(builder::notification(Some(&method), None).is_ok());
    assert!(builder::notification(Some(&method), Some(&json!(["param1", "param2"]))).is_ok());
    assert!(builder::notification(Some(&method), Some(&json!({"param": "foo"}))).is_ok());
}

#[test]
fn test_success_invalid_parameters() {
    let errors = builder::success(None, None).unwrap_err();
    assert!(errors.contains(ID_MESSAGE));
    assert!(errors.contains("Result must exist for success Response objects"));
}

#[test]
fn test_success_valid_parameters() {
    let text = builder::success(Some(&json!("id")), Some(&json!("result"))).unwrap();
    assert_eq!(text, r#"{"jsonrpc":"2.0","id":"id","result":"result"}"#);
}

#[test]
fn test_error_invalid_parameters() {
    let errors = builder::error(None, None).unwrap_err();
    assert!(errors.contains(ID_MESSAGE));
    assert!(errors.contains("Error must be an object conforming to the JSON-RPC 2.0 error object specs"));

    let plain = json!({});
    let errors = builder::error(Some(&json!("id")), Some((&plain).into())).unwrap_err();
    assert_eq!(
        errors.as_slice(),
        ["Error must be an instance of JsonRpcError, or any derivatives of it"]
    );
}

#[test]
fn test_error_valid_parameters() {
    let id = json!("id");
    let errors = [
        JsonRpcError::new("Crazy error"),
        JsonRpcError::parse_error(),
        JsonRpcError::invalid_request(),
        JsonRpcError::method_not_found(),
        JsonRpcError::invalid_params(),
    ];

    for error in &errors {
        let text = builder::error(Some(&id), Some(error.into())).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"]["code"], error.code());
    }
}

#[test]
fn test_deserialize_invalid_parameters() {
    assert!(matches!(codec::deserialize(None), Err(JsonRpcError::Parse { .. })));

    let text = serde_json::to_string(&json!({"foo": "bar"})).unwrap();
    assert!(matches!(
        codec::deserialize(Some(text.as_str())),
        Err(JsonRpcError::InvalidRequest { .. })
    ));
}

#[test]
fn test_deserialize_each_message_type() {
    let cases = [
        (
            json!({"jsonrpc": "2.0", "id": "id", "method": "method", "params": "params"}),
            MessageType::Request,
        ),
        (
            json!({"jsonrpc": "2.0", "method": "method", "params": "params"}),
            MessageType::Notification,
        ),
        (
            json!({"jsonrpc": "2.0", "id": "id", "result": "result"}),
            MessageType::Success,
        ),
        (
            json!({"jsonrpc": "2.0", "id": "id", "error": {}}),
            MessageType::Error,
        ),
    ];

    for (message, kind) in cases {
        let text = serde_json::to_string(&message).unwrap();
        let envelope = codec::deserialize(Some(text.as_str())).unwrap();
        assert_eq!(envelope.kind, kind);
        assert_eq!(envelope.payload, without_version(message));
    }
}

#[test]
fn test_built_messages_deserialize() {
    let id = json!(12);
    let rpc_error = JsonRpcError::invalid_params().with_data(json!("b must be positive"));

    let built = [
        (
            builder::request(Some(&id), Some(&json!("divide")), Some(&json!({"a": 1, "b": 0}))),
            MessageType::Request,
        ),
        (
            builder::notification(Some(&json!("progress")), Some(&json!([50]))),
            MessageType::Notification,
        ),
        (builder::success(Some(&id), Some(&json!(0))), MessageType::Success),
        (builder::error(Some(&id), Some((&rpc_error).into())), MessageType::Error),
    ];

    for (text, kind) in built {
        let envelope = codec::decode(&text.unwrap()).unwrap();
        assert_eq!(envelope.kind, kind);
        assert_eq!(envelope.into_message().unwrap().kind(), kind);
    }
}

#[test]
fn test_deserialize_failure_feeds_error_response() {
    let failure = codec::decode("{not json").unwrap_err();
    let text = builder::error(Some(&json!("req-1")), Some((&failure).into())).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["error"], json!({"code": -32700, "message": "Parse error"}));
}
