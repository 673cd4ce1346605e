use std::process::ExitCode;
use tracing::{error, info};

use species_indexer::{run, telemetry, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init_tracing(settings.log_format, settings.log_file.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting species indexer");

    match run(&settings).await {
        Ok(summary) if summary.load.committed => {
            info!(
                run_id = %summary.run_id,
                submitted = summary.submitted(),
                failed = summary.failed(),
                cancelled = summary.cancelled(),
                "Species indexer finished"
            );
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            error!(run_id = %summary.run_id, "Run finished without a successful commit");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Species indexer failed");
            ExitCode::FAILURE
        }
    }
}
