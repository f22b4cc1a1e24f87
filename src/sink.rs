use crate::client::{
    CaptureError, ClientError, ClientFactory, ClientOptions, ReportingClient,
};
use crate::report::NormalizedReport;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Asynchronous destination for [`NormalizedReport`]s.
///
/// Implementations transport reports to a concrete service. [`SinkClient`]
/// calls `send` from a background task, never from the logging thread.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Send a single report.
    ///
    /// **Returns**
    /// - `Ok(())` if the backend accepted the report.
    /// - `Err(..)` on any failure. The error is handed to the client's
    ///   capture-error handler; the report is not retried.
    async fn send(&self, report: &NormalizedReport) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush any buffered reports. Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// [`ReportingClient`] that hands reports to a [`ReportSink`] through a
/// bounded channel drained by a background task.
///
/// `capture` never blocks: a full or closed queue is reported to the error
/// handler and the report is dropped.
pub struct SinkClient {
    sender: mpsc::Sender<NormalizedReport>,
    options: ClientOptions,
}

impl SinkClient {
    /// Minimal queue size.
    pub const MIN_BUFFER: usize = 16;

    /// Create the client and spawn its delivery task on `handle`.
    pub fn spawn(
        sink: Arc<dyn ReportSink>,
        options: ClientOptions,
        buffer: usize,
        handle: &Handle,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<NormalizedReport>(buffer.max(Self::MIN_BUFFER));

        let task_options = options.clone();
        let task = handle.spawn(async move {
            while let Some(report) = rx.recv().await {
                if let Err(e) = sink.send(&report).await {
                    task_options.report_error(&CaptureError::Send(e));
                }
            }
            if let Err(e) = sink.flush().await {
                task_options.report_error(&CaptureError::Send(e));
            }
        });

        (SinkClient { sender: tx, options }, task)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

impl ReportingClient for SinkClient {
    fn capture(&self, report: NormalizedReport) {
        if let Err(e) = self.sender.try_send(report) {
            let err = match e {
                mpsc::error::TrySendError::Full(_) => CaptureError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => CaptureError::QueueClosed,
            };
            self.options.report_error(&err);
        }
    }
}

/// Factory that builds a [`SinkClient`] on the tokio runtime current at
/// first use. Without a runtime the factory fails with
/// [`ClientError::NoRuntime`].
pub fn sink_client_factory(sink: Arc<dyn ReportSink>, buffer: usize) -> impl ClientFactory {
    move |options: ClientOptions| -> Result<Arc<dyn ReportingClient>, ClientError> {
        let handle = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        let (client, _task) = SinkClient::spawn(Arc::clone(&sink), options, buffer, &handle);
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LogRecord;
    use crate::report::build_report;
    use std::sync::Mutex;

    struct FailingSink;

    #[async_trait]
    impl ReportSink for FailingSink {
        async fn send(&self, _report: &NormalizedReport) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("connection refused".into())
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        reports: Mutex<Vec<NormalizedReport>>,
    }

    #[async_trait]
    impl ReportSink for CollectingSink {
        async fn send(&self, report: &NormalizedReport) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    fn options(errors: Arc<Mutex<Vec<String>>>) -> ClientOptions {
        ClientOptions {
            dsn: None,
            logger: None,
            environment: None,
            release: None,
            on_capture_error: Arc::new(move |e: &CaptureError| errors.lock().unwrap().push(e.to_string())),
        }
    }

    fn report(message: &str) -> NormalizedReport {
        build_report(&LogRecord::new("ERROR", message), &[], None, None)
    }

    #[tokio::test]
    async fn delivers_reports_in_order() {
        let sink = Arc::new(CollectingSink::default());
        let errors = Arc::new(Mutex::new(Vec::new()));
        let (client, task) =
            SinkClient::spawn(sink.clone(), options(errors.clone()), 32, &Handle::current());

        client.capture(report("one"));
        client.capture(report("two"));
        drop(client);
        task.await.unwrap();

        let messages: Vec<_> = sink
            .reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect();
        assert_eq!(messages, vec!["one", "two"]);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_failures_reach_error_handler() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let (client, task) =
            SinkClient::spawn(Arc::new(FailingSink), options(errors.clone()), 32, &Handle::current());

        client.capture(report("lost"));
        drop(client);
        task.await.unwrap();

        assert_eq!(
            *errors.lock().unwrap(),
            vec!["failed to send report: connection refused".to_string()]
        );
    }

    #[test]
    fn factory_requires_runtime() {
        let factory = sink_client_factory(Arc::new(FailingSink), 16);
        let result = factory.create(options(Arc::new(Mutex::new(Vec::new()))));
        assert!(matches!(result, Err(ClientError::NoRuntime)));
    }
}
