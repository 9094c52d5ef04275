use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, fmt,
    filter::LevelFilter,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr; stdout is reserved for rendered output.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(settings.level).into())
        .from_env_lossy();

    let fmt_layer = match settings.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
