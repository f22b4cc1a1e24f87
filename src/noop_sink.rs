use crate::report::NormalizedReport;
use crate::sink::ReportSink;
use async_trait::async_trait;
use std::error::Error;

/// Sink that accepts and discards every report.
///
/// Stands in for a real destination when reporting is switched off for a
/// deployment but the logging pipeline should stay wired the same way.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl ReportSink for NoopSink {
    async fn send(&self, _report: &NormalizedReport) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
