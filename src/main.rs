//! Binary entry point: parse the CLI, build [`Config`], open the access
//! log, install the `SIGINT` handler, and run the acceptor loop. Systemic
//! failures are printed to stderr and exit non-zero; a clean `SIGINT`
//! shutdown exits `0`.

use clap::Parser;
use filehttpd::config::Config;
use filehttpd::logger::LoggerWriter;
use filehttpd::server::{acceptor, shutdown::Shutdown};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = filehttpd::cli::Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: filehttpd::cli::Cli) -> Result<(), filehttpd::ServerError> {
    let config = Arc::new(Config::from_cli(cli)?);
    let logger = Arc::new(LoggerWriter::open(&config.log_path)?);
    let shutdown = Arc::new(Shutdown::new());

    let handler_shutdown = shutdown.clone();
    ctrlc::set_handler(move || {
        log::info!("received interrupt, shutting down");
        handler_shutdown.request();
    })
    .expect("failed to install SIGINT handler");

    acceptor::run(config, shutdown, logger)
}
