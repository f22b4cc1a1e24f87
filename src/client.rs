use crate::dsn::{Dsn, DsnError};
use crate::report::NormalizedReport;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Destination for fully-built [`NormalizedReport`]s.
///
/// `capture` is fire-and-forget: delivery failures are reported through
/// the [`ErrorHandler`] the client was created with, never to the caller.
pub trait ReportingClient: Send + Sync {
    fn capture(&self, report: NormalizedReport);
}

/// Callback invoked by a client when capturing a report fails.
pub type ErrorHandler = Arc<dyn Fn(&CaptureError) + Send + Sync>;

/// Failure delivering a single report.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("report queue is full, dropping report")]
    QueueFull,

    #[error("report queue is closed")]
    QueueClosed,

    #[error("failed to send report: {0}")]
    Send(#[source] Box<dyn Error + Send + Sync>),
}

/// Failure creating a reporting client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Dsn(#[from] DsnError),

    #[error("no tokio runtime available to drive the reporting client")]
    NoRuntime,

    #[error("{0}")]
    Other(String),
}

/// Settings a reporting client is created with.
#[derive(Clone)]
pub struct ClientOptions {
    /// `None` when no destination was configured.
    pub dsn: Option<Dsn>,
    pub logger: Option<String>,
    pub environment: Option<String>,
    pub release: Option<String>,
    pub on_capture_error: ErrorHandler,
}

impl ClientOptions {
    /// Route a capture failure to the registered handler.
    pub fn report_error(&self, err: &CaptureError) {
        (self.on_capture_error)(err)
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("dsn", &self.dsn)
            .field("logger", &self.logger)
            .field("environment", &self.environment)
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

/// Creates the reporting client the first time an adapter is used.
pub trait ClientFactory: Send + Sync {
    fn create(&self, options: ClientOptions) -> Result<Arc<dyn ReportingClient>, ClientError>;
}

impl<F> ClientFactory for F
where
    F: Fn(ClientOptions) -> Result<Arc<dyn ReportingClient>, ClientError> + Send + Sync,
{
    fn create(&self, options: ClientOptions) -> Result<Arc<dyn ReportingClient>, ClientError> {
        self(options)
    }
}
