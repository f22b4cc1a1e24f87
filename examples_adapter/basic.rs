use std::sync::Arc;

use log_report_adapter::{
    Adapter, AdapterConfig, ClientError, ClientOptions, LogRecord, NormalizedReport,
    ReportingClient,
};

/// Reporting client that prints each report as JSON instead of sending it.
struct StdoutClient;

impl ReportingClient for StdoutClient {
    fn capture(&self, report: NormalizedReport) {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("could not serialize report: {}", e),
        }
    }
}

fn main() {
    let config = AdapterConfig::from_env()
        .with_environment("development")
        .with_tags("region=us-east&origin=%25logger%7B1%7D");

    let adapter = Adapter::new(
        config,
        |_options: ClientOptions| -> Result<Arc<dyn ReportingClient>, ClientError> {
            Ok(Arc::new(StdoutClient))
        },
    );

    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "no space");
    let records = vec![
        LogRecord::new("ERROR", "disk full")
            .with_logger("storage::volume")
            .with_exception(log_report_adapter::ExceptionInfo::from_error(&io_error))
            .with_property("user", "alice"),
        LogRecord::new("NOTICE", "cache warmed").with_logger("cache"),
        LogRecord::from_error("FATAL", &io_error).with_logger("storage::volume"),
    ];

    adapter.append_batch(&records);
}
