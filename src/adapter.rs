use crate::client::{CaptureError, ClientError, ClientFactory, ClientOptions, ErrorHandler, ReportingClient};
use crate::config::AdapterConfig;
use crate::context::RequestContextProvider;
use crate::dsn::Dsn;
use crate::record::LogRecord;
use crate::report::{build_report, NormalizedReport};
use crate::tags::{parse_tag_config, TagTemplate};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error};

/// Target of the adapter's own diagnostic events. [`ReportLayer`] never
/// turns events on this target into reports.
///
/// [`ReportLayer`]: crate::layer::ReportLayer
pub const DIAGNOSTICS_TARGET: &str = "log_report_adapter::diagnostics";

/// Entry point receiving log records from the host logging framework.
///
/// The reporting client and the tag templates are created from the
/// [`AdapterConfig`] on the first call to [`append`](Adapter::append) and
/// kept for the adapter's lifetime. Concurrent first calls block until that
/// single initialization has finished. If the client cannot be created,
/// including when the factory panics, the failure is logged once and the
/// adapter stays a no-op.
pub struct Adapter {
    config: AdapterConfig,
    factory: Box<dyn ClientFactory>,
    request_context: Option<Arc<dyn RequestContextProvider>>,
    tags: Vec<TagTemplate>,
    state: OnceLock<AdapterState>,
}

struct AdapterState {
    client: Option<Arc<dyn ReportingClient>>,
    templates: Vec<TagTemplate>,
}

impl Adapter {
    pub fn new<F>(config: AdapterConfig, factory: F) -> Self
    where
        F: ClientFactory + 'static,
    {
        Adapter {
            config,
            factory: Box::new(factory),
            request_context: None,
            tags: Vec::new(),
            state: OnceLock::new(),
        }
    }

    /// Register a tag template. Registered templates are rendered before
    /// the ones parsed from [`AdapterConfig::tags`], in registration order.
    pub fn with_tag(mut self, tag: TagTemplate) -> Self {
        self.tags.push(tag);
        self
    }

    /// Attach ambient HTTP request data to reports as `http-extra`.
    pub fn with_request_context(mut self, provider: Arc<dyn RequestContextProvider>) -> Self {
        self.request_context = Some(provider);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// `true` once initialization has run and failed to create a client.
    pub fn is_degraded(&self) -> bool {
        self.state.get().map_or(false, |state| state.client.is_none())
    }

    /// Report a single record.
    pub fn append(&self, record: &LogRecord) {
        let state = self.state();
        if let Some(client) = &state.client {
            client.capture(self.build(state, record));
        }
    }

    /// Report every record of a batch, in order. Each record is handled
    /// independently of the others.
    pub fn append_batch<'a, I>(&self, records: I)
    where
        I: IntoIterator<Item = &'a LogRecord>,
    {
        for record in records {
            self.append(record);
        }
    }

    /// Build the report `append` would send for `record`, without sending it.
    ///
    /// The report depends on the initialized tag list, so the first call
    /// initializes the adapter, reporting client included, just like
    /// [`append`](Adapter::append).
    pub fn build_report(&self, record: &LogRecord) -> NormalizedReport {
        self.build(self.state(), record)
    }

    fn build(&self, state: &AdapterState, record: &LogRecord) -> NormalizedReport {
        build_report(
            record,
            &state.templates,
            self.request_context.as_deref(),
            self.config.environment.as_deref(),
        )
    }

    fn state(&self) -> &AdapterState {
        self.state.get_or_init(|| self.initialize())
    }

    fn initialize(&self) -> AdapterState {
        let mut templates = self.tags.clone();
        if let Some(raw) = self.config.tags.as_deref() {
            templates.extend(parse_tag_config(raw));
        }

        let client = match self.create_client() {
            Ok(client) => {
                debug!(
                    target: DIAGNOSTICS_TARGET,
                    adapter = %self.config.name,
                    tags = templates.len(),
                    "reporting client initialized"
                );
                Some(client)
            }
            Err(e) => {
                error!(
                    target: DIAGNOSTICS_TARGET,
                    "[{}] could not create reporting client, reports are disabled: {}",
                    self.config.name,
                    e
                );
                None
            }
        };

        AdapterState { client, templates }
    }

    fn create_client(&self) -> Result<Arc<dyn ReportingClient>, ClientError> {
        let dsn = match self.config.dsn.trim() {
            "" => None,
            raw => Some(raw.parse::<Dsn>()?),
        };

        let name = self.config.name.clone();
        let on_capture_error: ErrorHandler = Arc::new(move |err: &CaptureError| {
            error!(target: DIAGNOSTICS_TARGET, "[{}] {}", name, err);
        });

        let options = ClientOptions {
            dsn,
            logger: self.config.logger.clone(),
            environment: self.config.environment.clone(),
            release: self.config.release.clone(),
            on_capture_error,
        };

        panic::catch_unwind(AssertUnwindSafe(|| self.factory.create(options)))
            .unwrap_or_else(|payload| Err(ClientError::Other(panic_message(payload.as_ref()))))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("client factory panicked: {}", detail)
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("config", &self.config)
            .field("tags", &self.tags.len())
            .field("initialized", &self.is_initialized())
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}
