use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tourline::cli::{run, Cli};
use tourline::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match Config::from_env() {
        Ok(config) => run(cli, config).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_caller_error() => {
            tracing::warn!(code = err.code, "{}", err.message);
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!(code = err.code, "{}", err.message);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
