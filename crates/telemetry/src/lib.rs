//! Structured logging bootstrap.

use anyhow::Context;
use orders_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level; invalid `RUST_LOG` directives
/// are reported and the configured level is used instead. Returns `false`
/// when a subscriber was already installed, which is not treated as an error.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<bool> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(&settings.level, rust_log)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        if let Some(directives) = rejected {
            tracing::warn!(
                target: "orders-telemetry",
                %directives,
                level = %settings.level,
                "ignoring invalid RUST_LOG directives"
            );
        }
        tracing::debug!(
            target: "orders-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    Ok(installed)
}

/// Filter from `rust_log` when it parses, else from the configured level.
/// The second value carries `rust_log` when it was rejected.
fn build_filter(
    level: &str,
    rust_log: Option<String>,
) -> anyhow::Result<(EnvFilter, Option<String>)> {
    let rejected = match rust_log.filter(|directives| !directives.is_empty()) {
        Some(directives) => match EnvFilter::try_new(&directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(_) => Some(directives),
        },
        None => None,
    };

    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid telemetry.level '{}'", level))?;

    Ok((filter, rejected))
}
