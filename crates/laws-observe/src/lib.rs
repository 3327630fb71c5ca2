//! Observability setup for the laws chat client: structured logging via
//! `tracing`, with optional OpenTelemetry span export.

pub mod tracing_setup;
