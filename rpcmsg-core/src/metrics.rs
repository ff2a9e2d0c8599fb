//! Build and decode counters
//!
//! Builders and the deserializer do not touch any shared state, so nothing is
//! counted automatically. A caller that wants numbers passes each outcome to
//! [`CodecMetrics`]:
//!
//! ```rust
//! use rpcmsg_core::{builder, codec, CodecMetrics, MessageType};
//! use serde_json::json;
//!
//! let metrics = CodecMetrics::new("my-service");
//!
//! let outcome = builder::notification(Some(&json!("tick")), None);
//! metrics.record_build(MessageType::Notification, &outcome);
//!
//! metrics.record_decode(&codec::decode(r#"{"foo":1}"#));
//! ```
//!
//! Instruments are exported only once a meter provider has been installed
//! (see `telemetry::init_telemetry`); otherwise they are no-ops.

use crate::builder::BuildResult;
use crate::error::JsonRpcError;
use crate::types::{Envelope, MessageType};
use opentelemetry::{
    global,
    metrics::{Counter, Meter},
    KeyValue,
};

/// Counters for message building and classification
///
/// All instruments are prefixed with `rpcmsg.`.
pub struct CodecMetrics {
    /// Builder calls, labelled by message type
    pub build_total: Counter<u64>,
    /// Builder calls that returned violations
    pub build_rejected: Counter<u64>,
    /// Individual violations reported by builders
    pub violations_total: Counter<u64>,
    /// Deserializer calls
    pub decode_total: Counter<u64>,
    /// Deserializer failures, labelled by error code
    pub decode_errors: Counter<u64>,
}

impl CodecMetrics {
    pub fn new(service_name: impl Into<String>) -> Self {
        let meter = global::meter_with_scope(
            opentelemetry::InstrumentationScope::builder(service_name.into())
                .with_version(env!("CARGO_PKG_VERSION"))
                .build(),
        );
        Self::new_with_meter(&meter)
    }

    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            build_total: meter
                .u64_counter("rpcmsg.build.total")
                .with_description("Number of builder calls")
                .build(),
            build_rejected: meter
                .u64_counter("rpcmsg.build.rejected")
                .with_description("Number of builder calls rejected by validation")
                .build(),
            violations_total: meter
                .u64_counter("rpcmsg.build.violations")
                .with_description("Number of field rule violations reported")
                .build(),
            decode_total: meter
                .u64_counter("rpcmsg.decode.total")
                .with_description("Number of inbound messages deserialized")
                .build(),
            decode_errors: meter
                .u64_counter("rpcmsg.decode.errors")
                .with_description("Number of inbound messages rejected")
                .build(),
        }
    }

    pub fn record_build(&self, kind: MessageType, outcome: &BuildResult) {
        let attrs = [KeyValue::new("type", kind.as_str())];
        self.build_total.add(1, &attrs);
        if let Err(errors) = outcome {
            self.build_rejected.add(1, &attrs);
            self.violations_total.add(errors.len() as u64, &attrs);
        }
    }

    pub fn record_decode(&self, outcome: &Result<Envelope, JsonRpcError>) {
        match outcome {
            Ok(envelope) => {
                self.decode_total
                    .add(1, &[KeyValue::new("type", envelope.kind.as_str())]);
            }
            Err(error) => {
                self.decode_total.add(1, &[KeyValue::new("type", "invalid")]);
                self.decode_errors
                    .add(1, &[KeyValue::new("code", error.code())]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder, codec};
    use opentelemetry::metrics::MeterProvider as _;
    use opentelemetry_sdk::metrics::{
        data::{AggregatedMetrics, MetricData, ResourceMetrics},
        InMemoryMetricExporter, PeriodicReader, SdkMeterProvider,
    };
    use serde_json::json;

    fn in_memory() -> (SdkMeterProvider, InMemoryMetricExporter, CodecMetrics) {
        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(exporter.clone()).build())
            .build();
        let metrics = CodecMetrics::new_with_meter(&provider.meter("rpcmsg-test"));
        (provider, exporter, metrics)
    }

    /// Data points of a u64 counter as `(attributes, value)` pairs
    fn points(exported: &[ResourceMetrics], name: &str) -> Vec<(Vec<(String, String)>, u64)> {
        let mut points = Vec::new();
        for metric in exported
            .iter()
            .flat_map(|resource| resource.scope_metrics())
            .flat_map(|scope| scope.metrics())
            .filter(|metric| metric.name() == name)
        {
            if let AggregatedMetrics::U64(MetricData::Sum(sum)) = metric.data() {
                for point in sum.data_points() {
                    let mut attrs: Vec<(String, String)> = point
                        .attributes()
                        .map(|kv| (kv.key.to_string(), kv.value.to_string()))
                        .collect();
                    attrs.sort();
                    points.push((attrs, point.value()));
                }
            }
        }
        points.sort();
        points
    }

    fn total(exported: &[ResourceMetrics], name: &str) -> u64 {
        points(exported, name).iter().map(|(_, value)| value).sum()
    }

    #[test]
    fn test_metrics_creation() {
        let _metrics = CodecMetrics::new("test-service");
    }

    #[test]
    fn test_record_build_outcomes() {
        let (provider, exporter, metrics) = in_memory();

        let ok = builder::request(Some(&json!(1)), Some(&json!("m")), None);
        let rejected = builder::request(None, None, None);
        let rejected_notification = builder::notification(None, None);
        metrics.record_build(MessageType::Request, &ok);
        metrics.record_build(MessageType::Request, &rejected);
        metrics.record_build(MessageType::Notification, &rejected_notification);

        provider.force_flush().unwrap();
        let exported = exporter.get_finished_metrics().unwrap();

        assert_eq!(total(&exported, "rpcmsg.build.total"), 3);
        assert_eq!(
            points(&exported, "rpcmsg.build.rejected"),
            vec![
                (vec![("type".to_string(), "notification".to_string())], 1),
                (vec![("type".to_string(), "request".to_string())], 1),
            ]
        );
        // two violations from the request, one from the notification
        assert_eq!(total(&exported, "rpcmsg.build.violations"), 3);
    }

    #[test]
    fn test_record_decode_outcomes() {
        let (provider, exporter, metrics) = in_memory();

        metrics.record_decode(&codec::decode(r#"{"method":"m"}"#));
        metrics.record_decode(&codec::deserialize(None));
        metrics.record_decode(&codec::decode("{broken"));
        metrics.record_decode(&codec::decode(r#"{"foo":"bar"}"#));

        provider.force_flush().unwrap();
        let exported = exporter.get_finished_metrics().unwrap();

        assert_eq!(
            points(&exported, "rpcmsg.decode.total"),
            vec![
                (vec![("type".to_string(), "invalid".to_string())], 3),
                (vec![("type".to_string(), "notification".to_string())], 1),
            ]
        );
        assert_eq!(
            points(&exported, "rpcmsg.decode.errors"),
            vec![
                (vec![("code".to_string(), "-32600".to_string())], 1),
                (vec![("code".to_string(), "-32700".to_string())], 2),
            ]
        );
    }

    #[test]
    fn test_successful_builds_record_no_rejections() {
        let (provider, exporter, metrics) = in_memory();

        let ok = builder::success(Some(&json!("a")), Some(&json!(null)));
        metrics.record_build(MessageType::Success, &ok);

        provider.force_flush().unwrap();
        let exported = exporter.get_finished_metrics().unwrap();

        assert_eq!(total(&exported, "rpcmsg.build.total"), 1);
        assert_eq!(total(&exported, "rpcmsg.build.rejected"), 0);
    }
}
