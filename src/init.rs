use crate::adapter::Adapter;
use crate::layer::ReportLayer;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Wiring of the [`ReportLayer`] into the global subscriber.
///
/// **Fields**
/// - `min_level`: least severe level turned into reports. Defaults to
///   `ERROR`.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt::Layer` is
///   installed next to the report layer and prints every event.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub min_level: LevelFilter,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            min_level: LevelFilter::ERROR,
            enable_stdout: true,
        }
    }
}

/// Install a [`Registry`] with a [`ReportLayer`] for `adapter` as the
/// global default subscriber.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing_with_config(
    adapter: Arc<Adapter>,
    config: LayerConfig,
) -> Result<(), SetGlobalDefaultError> {
    let layer = ReportLayer::new(adapter).with_filter(config.min_level);

    // fmt layer is optional; the two subscriber types differ, so each
    // branch installs its own.
    if config.enable_stdout {
        let subscriber = Registry::default()
            .with(layer)
            .with(tracing_subscriber::fmt::layer());
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber)
    }
}

/// Equivalent to [`init_tracing_with_config`] with [`LayerConfig::default`].
pub fn init_tracing(adapter: Arc<Adapter>) -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(adapter, LayerConfig::default())
}
