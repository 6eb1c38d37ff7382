use std::process::ExitCode;

use orders_kernel::settings::{Settings, TelemetrySettings};
use orders_service::{modules, App};

/// Exit status reported to the supervisor when the service cannot start.
const STARTUP_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            orders_telemetry::init(&TelemetrySettings::default()).ok();
            let error = format!("{err:#}");
            tracing::error!(%error, "failed to load orders service settings");
            return ExitCode::from(STARTUP_FAILURE);
        }
    };

    if let Err(err) = orders_telemetry::init(&settings.telemetry) {
        orders_telemetry::init(&TelemetrySettings::default()).ok();
        let error = format!("{err:#}");
        tracing::warn!(%error, "falling back to default telemetry settings");
    }

    let db = format!("{}:{}", settings.database.host, settings.database.port);
    tracing::info!(
        env = ?settings.environment,
        %db,
        "orders-service bootstrap starting"
    );

    let app = match App::bootstrap(settings, modules::registry()).await {
        Ok(app) => app,
        Err(err) => {
            let error = format!("{err:#}");
            tracing::error!(%error, "orders service failed to start");
            return ExitCode::from(STARTUP_FAILURE);
        }
    };

    match app.run_until(shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = format!("{err:#}");
            tracing::error!(%error, "orders service shut down with errors");
            ExitCode::FAILURE
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
