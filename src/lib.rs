//! Turns log records into normalized error reports.
//!
//! An [`Adapter`] receives [`LogRecord`]s (directly, or from `tracing`
//! through [`ReportLayer`]), builds a [`NormalizedReport`] for each one and
//! hands it to a [`ReportingClient`]. The client is created lazily, once,
//! from an [`AdapterConfig`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use log_report_adapter::{init::init_tracing, sink_client_factory, Adapter, AdapterConfig};
//! use log_report_adapter::noop_sink::NoopSink;
//!
//! # #[tokio::main] async fn main() {
//! let config = AdapterConfig::new("https://key@errors.example.com/42")
//!     .with_environment("production")
//!     .with_tags("region=us-east&lvl=%25level");
//! let adapter = Arc::new(Adapter::new(config, sink_client_factory(Arc::new(NoopSink), 1024)));
//! init_tracing(adapter).expect("no other subscriber installed");
//!
//! tracing::error!(user = "alice", "disk full");
//! # }
//! ```

pub mod severity;
pub mod record;
pub mod pattern;
pub mod tags;
pub mod context;
pub mod report;
pub mod dsn;
pub mod client;
pub mod sink;
pub mod noop_sink;
pub mod env;
pub mod config;
pub mod adapter;
pub mod layer;
pub mod init;

pub use adapter::{Adapter, DIAGNOSTICS_TARGET};
pub use client::{CaptureError, ClientError, ClientFactory, ClientOptions, ErrorHandler, ReportingClient};
pub use config::AdapterConfig;
pub use context::{HttpExtra, RequestContextProvider};
pub use layer::ReportLayer;
pub use record::{ExceptionInfo, LogRecord, MessageObject};
pub use report::NormalizedReport;
pub use severity::Severity;
pub use sink::{sink_client_factory, ReportSink, SinkClient};
pub use tags::TagTemplate;
