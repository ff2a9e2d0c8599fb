//! rpcmsg - JSON-RPC 2.0 messages
//!
//! Convenience crate re-exporting `rpcmsg-core`.
//!
//! # Quick Start
//!
//! ```rust
//! use rpcmsg::{builder, codec, JsonRpcError, MessageType};
//! use serde_json::json;
//!
//! // Outbound: a reply to request "r-7"
//! let error = JsonRpcError::method_not_found();
//! let text = builder::error(Some(&json!("r-7")), Some((&error).into())).unwrap();
//!
//! // Inbound: classify whatever arrives
//! let envelope = codec::decode(&text).unwrap();
//! assert_eq!(envelope.kind, MessageType::Error);
//!
//! // Malformed input is reported with a code ready to send back
//! let failure = codec::deserialize(None).unwrap_err();
//! let reply = builder::error(Some(&json!("r-8")), Some((&failure).into())).unwrap();
//! assert!(reply.contains("-32700"));
//! ```

pub use rpcmsg_core as core;

pub use rpcmsg_core::{
    builder, codec, validate, BuildResult, CodecMetrics, Envelope, Error, ErrorArg, ErrorObject,
    Id, JsonRpcError, Message, MessageType, Params, TelemetryConfig, ValidationErrors,
};
