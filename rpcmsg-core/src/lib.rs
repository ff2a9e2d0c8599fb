//! JSON-RPC 2.0 message builders, validation and classification
//!
//! This crate turns raw arguments into JSON-RPC 2.0 wire text and wire text
//! back into classified messages. It includes:
//!
//! - **Builders**: validate arguments for the four message shapes and emit text
//!   or the complete list of violations
//! - **Codec**: parse inbound text and classify it as request, notification,
//!   success or error
//! - **Error handling**: the JSON-RPC error taxonomy and the validation list
//! - **Telemetry**: `tracing` subscriber setup, OTLP export and counters
//!
//! # Architecture
//!
//! The crate is transport-agnostic. It neither dispatches methods nor tracks
//! connections or pending calls; it only builds, validates and parses
//! message payloads. Every operation is synchronous and free of shared state.
//!
//! # Example
//!
//! ```rust
//! use rpcmsg_core::{builder, codec, MessageType};
//! use serde_json::json;
//!
//! // Build a request
//! let text = builder::request(Some(&json!(1)), Some(&json!("add")), Some(&json!({"a": 5, "b": 3})))
//!     .unwrap();
//!
//! // Classify it on the other side
//! let envelope = codec::decode(&text).unwrap();
//! assert_eq!(envelope.kind, MessageType::Request);
//! assert_eq!(envelope.payload["method"], "add");
//! ```

pub mod builder;
pub mod codec;
pub mod error;
pub mod metrics;
pub mod telemetry;
pub mod types;
pub mod validate;

pub use builder::{BuildResult, ErrorArg};
pub use codec::{decode, deserialize, deserialize_batch};
pub use error::{Error, JsonRpcError, Result, ValidationErrors};
pub use metrics::CodecMetrics;
pub use telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig};
pub use types::{
    Envelope, ErrorObject, ErrorResponse, Id, Message, MessageType, Notification, Params, Request,
    SuccessResponse, JSONRPC_VERSION,
};
