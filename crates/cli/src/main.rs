use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use orders_kernel::settings::Settings;
use orders_service::{modules, App};

#[derive(Debug, Parser)]
#[command(name = "orders-cli", version, about = "Operator tools for the orders service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved settings as JSON, with secrets redacted
    Config,
    /// Connect to the database the way the service does, then disconnect
    CheckDb,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = format!("{err:#}");
            tracing::error!(%error, "orders-cli command failed");
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load orders service settings")?;
    orders_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{rendered}");
        }
        Command::CheckDb => {
            let app = App::bootstrap(settings, modules::registry()).await?;
            app.db().ping().await?;

            let descriptor = app.db().descriptor();
            println!(
                "ok: {} at {}:{} ({})",
                descriptor.database(),
                descriptor.host(),
                descriptor.port(),
                descriptor.entity_names().join(", ")
            );

            app.shutdown().await?;
        }
    }

    Ok(())
}
