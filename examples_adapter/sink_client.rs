use std::sync::Arc;

use async_trait::async_trait;
use log_report_adapter::{
    init::{init_tracing_with_config, LayerConfig},
    sink_client_factory, Adapter, AdapterConfig, NormalizedReport, ReportSink,
};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

/// Stand-in for a real transport: prints what would be sent.
struct PrintSink;

#[async_trait]
impl ReportSink for PrintSink {
    async fn send(&self, report: &NormalizedReport) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("[report] {} {:?} tags={:?} extra={:?}", report.level, report.message, report.tags, report.extra);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let config = AdapterConfig::new("https://public@errors.example.com/42")
        .with_name("demo")
        .with_environment("staging")
        .with_release(env!("CARGO_PKG_VERSION"))
        .with_tags("service=checkout&lvl=%25-5level");

    let adapter = Arc::new(Adapter::new(config, sink_client_factory(Arc::new(PrintSink), 256)));
    let layer_config = LayerConfig {
        min_level: tracing_subscriber::filter::LevelFilter::WARN,
        enable_stdout: true,
    };
    if let Err(e) = init_tracing_with_config(adapter, layer_config) {
        eprintln!("could not install subscriber: {}", e);
        return;
    }

    info!("starting checkout");
    warn!(cart_id = 991, "payment provider slow");
    error!(user_id = 42, reason = "card declined", "checkout failed");

    // let the delivery task drain the queue
    sleep(Duration::from_millis(200)).await;
}
