//! Logging and optional OpenTelemetry export

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `jobpulse=info`)
/// - `JOBPULSE_LOG_FORMAT`: `json` for structured output, anything else is pretty
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
/// - `OTEL_SERVICE_NAME`: Service name (default: jobpulse)
///
/// The returned guard flushes pending spans when dropped.
pub fn init_tracing() -> Result<TelemetryGuard> {
    let log_format = std::env::var("JOBPULSE_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobpulse=info"))
        .context("Failed to create env filter")?;

    let (otel_layer, guard) = otel::layer()?;
    let registry = tracing_subscriber::registry().with(env_filter).with(otel_layer);

    match log_format.as_str() {
        // Production: JSON structured logging
        "json" => registry.with(fmt::layer().json()).try_init(),
        // Development: Pretty formatting with colors
        _ => registry.with(fmt::layer().pretty()).try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

pub use otel::TelemetryGuard;

#[cfg(feature = "telemetry")]
mod otel {
    use anyhow::{Context, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use tracing::Subscriber;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    pub struct TelemetryGuard {
        provider: Option<TracerProvider>,
    }

    impl Drop for TelemetryGuard {
        fn drop(&mut self) {
            if let Some(provider) = self.provider.take() {
                let _ = provider.shutdown();
            }
        }
    }

    pub fn layer<S>() -> Result<(Option<OpenTelemetryLayer<S, Tracer>>, TelemetryGuard)>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
            return Ok((None, TelemetryGuard { provider: None }));
        };
        let service_name =
            std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "jobpulse".to_string());

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&endpoint)
            .build()
            .context("Failed to create OTLP span exporter")?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .build();
        let tracer = provider.tracer(service_name);

        Ok((
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            TelemetryGuard {
                provider: Some(provider),
            },
        ))
    }
}

#[cfg(not(feature = "telemetry"))]
mod otel {
    use anyhow::Result;
    use tracing_subscriber::layer::Identity;

    pub struct TelemetryGuard;

    pub fn layer() -> Result<(Identity, TelemetryGuard)> {
        if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
            // Subscriber is not installed yet, so this goes to stderr directly.
            eprintln!("OTEL_EXPORTER_OTLP_ENDPOINT set but feature 'telemetry' not enabled");
        }
        Ok((Identity::new(), TelemetryGuard))
    }
}
