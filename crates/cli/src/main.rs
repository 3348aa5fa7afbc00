//! Storefront terminal client

use std::process::ExitCode;

use storefront_client::context::{AppContext, AppInitError};
use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{error, info};

use crate::{
    config::CliConfig,
    shell::{Flow, Shell},
};

mod commands;
mod config;
mod observability;
mod render;
mod shell;

const PROMPT: &[u8] = b"storefront> ";

/// Errors that end the shell.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Storefront terminal client entry point
#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(error) => {
            _ = error.print();

            return u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from);
        }
    };

    if let Err(error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging setup error: {error}");
        }

        return ExitCode::FAILURE;
    }

    info!(
        api_url = %config.api.api_url,
        currency = config.api.currency.code(),
        "starting storefront shell"
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "storefront shell stopped");

            ExitCode::FAILURE
        }
    }
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    let app = AppContext::from_config(config.api.http())?;
    let mut shell = Shell::new(app, config.api.currency);

    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut screen = Vec::new();

    shell.start(&mut screen).await?;
    flush(&mut stdout, &mut screen).await?;

    loop {
        stdout.write_all(PROMPT).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let flow = shell.handle_line(&line, &mut screen).await?;

        flush(&mut stdout, &mut screen).await?;

        if flow == Flow::Quit {
            break;
        }
    }

    info!("storefront shell closed");

    Ok(())
}

async fn flush(stdout: &mut Stdout, screen: &mut Vec<u8>) -> std::io::Result<()> {
    stdout.write_all(screen).await?;
    screen.clear();

    stdout.flush().await
}
