//! Structured logging and optional trace export.
//!
//! Logs are JSON lines on stdout. When `OTEL_EXPORTER_OTLP_ENDPOINT` is set,
//! spans are also exported over OTLP/gRPC.
//!
//! # Telemetry invariants
//!
//! - Tokens, client secrets, and session ids never appear in any span
//!   attribute or log field. The subject id (`sub`) may.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
