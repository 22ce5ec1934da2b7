use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSettings};
use crate::error::{FleetError, FleetResult};

/// `RUST_LOG` wins over the configured level when it is set.
pub fn env_filter(settings: &LoggingSettings) -> FleetResult<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&settings.level),
    }
    .map_err(|e| FleetError::Telemetry(format!("invalid log filter: {e}")))
}

/// Installs the global subscriber. Fails instead of panicking when one is
/// already installed.
pub fn init(settings: &LoggingSettings) -> FleetResult<()> {
    let filter = env_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match settings.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
    };
    installed.map_err(|e| FleetError::Telemetry(e.to_string()))
}
