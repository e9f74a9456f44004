use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use rize_sync::cli::Cli;
use rize_sync::config::Settings;
use rize_sync::utils::error::report_error;
use rize_sync::utils::logging::enable_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Values already present in the environment take precedence over .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(err) = enable_logging(cli.debug) {
        eprintln!("{:#}", err);
    }

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "cannot start without valid configuration");
            report_error(&err);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.execute(&settings).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %format!("{:#}", err), "command failed");
            eprintln!("❌ {:#}", err);
            ExitCode::FAILURE
        }
    }
}
