use log_report_adapter::{
    Adapter, AdapterConfig, ClientError, ClientOptions, NormalizedReport, ReportLayer,
    ReportingClient, Severity, DIAGNOSTICS_TARGET,
};
use std::sync::{Arc, Mutex};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[derive(Default)]
struct MemoryClient {
    reports: Mutex<Vec<NormalizedReport>>,
}

impl ReportingClient for MemoryClient {
    fn capture(&self, report: NormalizedReport) {
        self.reports.lock().unwrap().push(report);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no space left on device")]
struct DiskFull;

fn with_layer<F: FnOnce()>(config: AdapterConfig, f: F) -> Vec<NormalizedReport> {
    let client = Arc::new(MemoryClient::default());
    let shared = client.clone();
    let adapter = Arc::new(Adapter::new(
        config,
        move |_options: ClientOptions| -> Result<Arc<dyn ReportingClient>, ClientError> {
            Ok(shared.clone())
        },
    ));

    let subscriber = Registry::default().with(ReportLayer::new(adapter));
    tracing::subscriber::with_default(subscriber, f);

    let reports = std::mem::take(&mut *client.reports.lock().unwrap());
    reports
}

#[test]
fn event_fields_become_extra() {
    let reports = with_layer(AdapterConfig::default(), || {
        tracing::error!(user = "alice", attempt = 3, blank = "", "login failed");
    });

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.message, "login failed");
    assert_eq!(report.level, Severity::Error);
    assert!(report.exception.is_none());
    assert_eq!(report.extra["user"], "alice");
    assert_eq!(report.extra["attempt"], 3);
    assert!(!report.extra.contains_key("blank"));
    assert_eq!(report.logger, module_path!());
}

#[test]
fn error_field_with_message_keeps_both() {
    let reports = with_layer(AdapterConfig::default(), || {
        let err = DiskFull;
        tracing::error!(error = &err as &(dyn std::error::Error + 'static), "write failed");
    });

    let report = &reports[0];
    assert_eq!(report.message, "write failed");
    let exception = report.exception.as_ref().expect("exception captured");
    assert_eq!(exception.ty, "DiskFull");
    assert_eq!(exception.value, "no space left on device");
}

#[test]
fn error_without_message_is_captured_alone() {
    let reports = with_layer(AdapterConfig::default(), || {
        let err = DiskFull;
        tracing::error!(error = &err as &(dyn std::error::Error + 'static));
    });

    let report = &reports[0];
    assert_eq!(report.message, "no space left on device");
    assert_eq!(report.exception.as_ref().map(|e| e.ty.as_str()), Some("DiskFull"));
}

#[test]
fn levels_are_translated() {
    let reports = with_layer(AdapterConfig::default(), || {
        tracing::trace!("t");
        tracing::debug!("d");
        tracing::info!("i");
        tracing::warn!("w");
        tracing::error!("e");
    });

    let levels: Vec<_> = reports.iter().map(|r| r.level).collect();
    assert_eq!(
        levels,
        vec![
            Severity::Debug,
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
        ]
    );
}

#[test]
fn diagnostic_events_are_ignored() {
    let reports = with_layer(AdapterConfig::default(), || {
        tracing::error!(target: DIAGNOSTICS_TARGET, "[adapter] capture failed");
    });

    assert!(reports.is_empty());
}

#[test]
fn invalid_dsn_does_not_disturb_logging() {
    let reports = with_layer(AdapterConfig::new("::not-a-dsn::"), || {
        tracing::error!("first");
        tracing::error!("second");
    });

    assert!(reports.is_empty());
}

#[test]
fn log_crate_records_keep_their_target() {
    let reports = with_layer(AdapterConfig::default(), || {
        let record = log::Record::builder()
            .target("billing::invoice")
            .level(log::Level::Error)
            .args(format_args!("invoice overdue"))
            .build();
        tracing_log::format_trace(&record).unwrap();
    });

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.logger, "billing::invoice");
    assert_eq!(report.message, "invoice overdue");
    assert_eq!(report.level, Severity::Error);
    assert!(report.extra.keys().all(|k| !k.starts_with("log.")));
}
