use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use partyhop_runner::config::RunnerConfig;
use partyhop_runner::demo::run_experience;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let gift = std::env::args()
        .nth(1)
        .and_then(|a| a.strip_prefix("--gift=").map(String::from));

    let config = RunnerConfig::load();
    config.validate();

    tracing::info!("partyhop starting");

    match run_experience(&config, gift.as_deref()).await {
        Ok(report) => {
            tracing::info!(
                outcome = ?report.outcome,
                frames = report.loop_summary.frames,
                gift = %report.gift_id,
                "Experience finished"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "Experience aborted");
            ExitCode::FAILURE
        },
    }
}
