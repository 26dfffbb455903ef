//! qna-server: loads configuration, initialises logging and serves the QnA API.

use qna_service::error::error_chain;
use qna_service::{server, telemetry, AppConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_fallback();
            tracing::error!(error = %error_chain(&e), "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&config.log_level) {
        telemetry::init_fallback();
        tracing::error!(error = %error_chain(&e), "failed to initialise logger");
        return ExitCode::FAILURE;
    }

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "server terminated");
            ExitCode::FAILURE
        }
    }
}
