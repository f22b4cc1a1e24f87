use log_report_adapter::init::{init_tracing, init_tracing_with_config, LayerConfig};
use log_report_adapter::{Adapter, AdapterConfig, ClientError, ClientOptions, NormalizedReport, ReportingClient};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryClient {
    reports: Mutex<Vec<NormalizedReport>>,
}

impl ReportingClient for MemoryClient {
    fn capture(&self, report: NormalizedReport) {
        self.reports.lock().unwrap().push(report);
    }
}

fn adapter(client: Arc<MemoryClient>) -> Arc<Adapter> {
    Arc::new(Adapter::new(
        AdapterConfig::default(),
        move |_options: ClientOptions| -> Result<Arc<dyn ReportingClient>, ClientError> {
            Ok(client.clone())
        },
    ))
}

// Single test: the global subscriber can be installed once per process.
#[test]
fn second_install_returns_error() {
    let client = Arc::new(MemoryClient::default());
    let config = LayerConfig {
        enable_stdout: false,
        ..LayerConfig::default()
    };

    assert!(init_tracing_with_config(adapter(client.clone()), config).is_ok());
    assert!(init_tracing(adapter(Arc::new(MemoryClient::default()))).is_err());

    tracing::warn!("below the default level");
    tracing::error!(order = 17, "payment failed");

    let reports = client.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "payment failed");
}
