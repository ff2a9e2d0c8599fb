//! Logging and telemetry setup
//!
//! The library only emits `tracing` events. Nothing is printed or exported
//! until an application installs a subscriber, either its own or the one
//! built here by [`init_telemetry`]:
//!
//! - an `EnvFilter` from `RUST_LOG` or the configured level
//! - a fmt layer, JSON or human-readable
//! - with an OTLP endpoint configured, a span exporter bridged through
//!   `tracing-opentelemetry` and a periodic metric reader feeding
//!   [`CodecMetrics`](crate::CodecMetrics)
//!
//! OTLP export runs over gRPC (tonic) and has to be initialised from inside a
//! Tokio runtime.
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector endpoint; unset means local logs only
//! - `RUST_LOG`: log filter (e.g. "info", "rpcmsg_core=debug")
//!
//! ```rust,no_run
//! use rpcmsg_core::TelemetryConfig;
//!
//! let config = TelemetryConfig::new("gateway")
//!     .with_log_level("debug")
//!     .with_json(false);
//! rpcmsg_core::init_telemetry(config).expect("telemetry already initialised");
//! ```

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{metrics::SdkMeterProvider, trace::SdkTracerProvider, Resource};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

// Handles to the providers installed globally, kept for shutdown
static TRACER_PROVIDER: Mutex<Option<SdkTracerProvider>> = Mutex::new(None);
static METER_PROVIDER: Mutex<Option<SdkMeterProvider>> = Mutex::new(None);

/// Telemetry configuration
///
/// # Defaults
///
/// - service name `rpcmsg`, version from the crate
/// - log level from `RUST_LOG`, else `info`
/// - JSON log lines
/// - OTLP endpoint from `OTEL_EXPORTER_OTLP_ENDPOINT`, else none
/// - traces and metrics enabled (only effective with an endpoint)
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    /// Emit log lines as JSON objects instead of plain text
    pub json: bool,
    /// gRPC collector endpoint; `None` keeps everything local
    pub otlp_endpoint: Option<String>,
    pub enable_traces: bool,
    pub enable_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "rpcmsg".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: true,
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            enable_traces: true,
            enable_metrics: true,
        }
    }
}

impl TelemetryConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    /// Drop any endpoint picked up from the environment
    pub fn without_export(mut self) -> Self {
        self.otlp_endpoint = None;
        self
    }

    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                    self.service_name.clone(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                    self.service_version.clone(),
                ),
            ])
            .build()
    }
}

/// Install the global subscriber and, with an endpoint, the OTLP providers
///
/// # Errors
///
/// Fails if the log filter does not parse, an exporter cannot be built, or a
/// global subscriber is already installed. A second call therefore returns an
/// error instead of panicking.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), BoxError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let tracer = match &config.otlp_endpoint {
        Some(endpoint) if config.enable_traces => Some(init_tracer(&config, endpoint)?),
        _ => None,
    };
    if let Some(endpoint) = config.otlp_endpoint.as_deref().filter(|_| config.enable_metrics) {
        init_metrics(&config, endpoint)?;
    }

    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));
    let json_layer = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .json()
    });
    let text_layer = (!config.json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = config.otlp_endpoint.as_deref().unwrap_or("none"),
        json = config.json,
        "Telemetry initialized"
    );
    Ok(())
}

fn init_tracer(
    config: &TelemetryConfig,
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::Tracer, BoxError> {
    use opentelemetry::trace::TracerProvider as _;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .build();

    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider.clone());
    store(&TRACER_PROVIDER, provider);
    Ok(tracer)
}

fn init_metrics(config: &TelemetryConfig, endpoint: &str) -> Result<(), BoxError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    let provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build();

    global::set_meter_provider(provider.clone());
    store(&METER_PROVIDER, provider);
    Ok(())
}

fn store<T>(slot: &Mutex<Option<T>>, provider: T) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(provider);
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Flush and shut down the OTLP providers installed by [`init_telemetry`]
///
/// Without an endpoint there is nothing to shut down and this only logs.
/// Calling it again is a no-op.
///
/// # Errors
///
/// Returns the first provider failure. Both providers are shut down either way.
pub fn shutdown_telemetry() -> Result<(), BoxError> {
    tracing::info!("Telemetry shutdown");

    let traces = take(&TRACER_PROVIDER).map(|provider| provider.shutdown()).transpose();
    let metrics = take(&METER_PROVIDER).map(|provider| provider.shutdown()).transpose();

    traces?;
    metrics?;
    Ok(())
}
