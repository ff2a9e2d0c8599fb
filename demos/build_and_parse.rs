//! Build a few messages, then classify them back
//!
//! Run with: `cargo run --example build_and_parse`

use rpcmsg::{builder, codec, JsonRpcError, Message, TelemetryConfig};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    rpcmsg::core::init_telemetry(
        TelemetryConfig::new("build-and-parse")
            .without_export()
            .with_json(false)
            .with_log_level("debug"),
    )?;

    let outbound = vec![
        builder::request(Some(&json!(1)), Some(&json!("add")), Some(&json!({"a": 5, "b": 3}))),
        builder::notification(Some(&json!("status.changed")), Some(&json!(["online"]))),
        builder::success(Some(&json!(1)), Some(&json!(8))),
        builder::error(Some(&json!(2)), Some((&JsonRpcError::method_not_found()).into())),
        // Rejected: fractional id and a scalar params value
        builder::request(Some(&json!(1.5)), Some(&json!("add")), Some(&json!(42))),
    ];

    for outcome in outbound {
        match outcome {
            Ok(text) => {
                tracing::info!(%text, "Built message");
                match codec::decode(&text)?.into_message()? {
                    Message::Request(req) => println!("request {} -> {}", req.id, req.method),
                    Message::Notification(notif) => println!("notification {}", notif.method),
                    Message::Success(resp) => println!("success {} = {}", resp.id, resp.result),
                    Message::Error(resp) => {
                        println!("error {} [{}] {}", resp.id, resp.error.code, resp.error.message)
                    }
                }
            }
            Err(errors) => {
                for violation in &errors {
                    println!("rejected: {}", violation);
                }
            }
        }
    }

    match codec::decode(r#"{"foo":"bar"}"#) {
        Ok(envelope) => println!("unexpected {:?}", envelope),
        Err(error) => println!("inbound rejected: {}", error),
    }

    rpcmsg::core::shutdown_telemetry()?;
    Ok(())
}
