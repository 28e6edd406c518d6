//! sigcheck - parallel checksum-manifest verifier
//!
//! Verifies every file listed in `<ROOT_DIR>/<manifest>` and exits with a
//! code describing the result: 0 clean, 1 integrity failure, 2 configuration
//! problem, 3 timeout, 4 anything else.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::{exit_code, CliError};
use crate::events::EventHandler;
use clap::Parser;
use sigcheck_config::Config;
use sigcheck_events::EventReceiver;
use sigcheck_verify::{VerificationReport, Verifier};
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.debug, cli.json_logs);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            error!(exit_code = e.exit_code(), "verification failed");
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    process::exit(code);
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting sigcheck v{}", env!("CARGO_PKG_VERSION"));

    // defaults < file < environment < flags
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli)?;

    if !cli.root_dir.is_dir() {
        return Err(CliError::InvalidArguments(format!(
            "{} is not a directory",
            cli.root_dir.display()
        )));
    }

    let (event_sender, event_receiver) = sigcheck_events::channel();
    let verifier = Verifier::builder()
        .with_config(&config)
        .with_event_sender(event_sender)
        .build()?;

    let mut event_handler = EventHandler::new(cli.verbose);
    let report =
        verify_with_events(&verifier, &cli.root_dir, event_receiver, &mut event_handler).await?;

    OutputRenderer::new(cli.json).render_report(&report, &cli.root_dir)?;
    report.into_result()?;

    info!("Verification succeeded");
    Ok(())
}

/// Apply command line overrides on top of file and environment settings
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    let verify = &mut config.verify;
    if let Some(name) = &cli.manifest {
        verify.manifest_filename = Some(name.clone());
    }
    if let Some(algorithm) = cli.algorithm {
        verify.algorithm = algorithm;
    }
    if let Some(concurrency) = cli.concurrency {
        verify.concurrency = concurrency;
    }
    if let Some(chunk_size) = cli.chunk_size {
        verify.chunk_size = chunk_size;
    }
    if let Some(timeout) = cli.timeout {
        verify.timeout_secs = timeout;
    }
    config.validate()?;
    Ok(())
}

/// Run the verifier while draining its events
async fn verify_with_events(
    verifier: &Verifier,
    root_dir: &Path,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<VerificationReport, CliError> {
    let mut verify_future = Box::pin(verifier.verify(root_dir));

    loop {
        select! {
            result = &mut verify_future => {
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_event(&message);
                }
                return result.map_err(CliError::from);
            }

            message = event_receiver.recv() => {
                if let Some(message) = message {
                    event_handler.handle_event(&message);
                }
            }
        }
    }
}
