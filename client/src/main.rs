//! `clinica` entry-point: loads settings, wires the client, runs one command.

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use clinica_client::inbound::cli::{Cli, run};
use clinica_client::{AppState, ClientSettings};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Flags belong to the subcommands; settings come from env and files.
    let mut settings = ClientSettings::load_from_iter([OsString::from("clinica")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = Some(base_url);
    }
    init_tracing(settings.json_logs);

    let state = AppState::from_settings(&settings).wrap_err("failed to start the client")?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build the Tokio runtime")?;
    let mut stdout = io::stdout().lock();
    let code = runtime
        .block_on(run(&state, cli.command, &mut stdout))
        .wrap_err("failed to write output")?;
    Ok(code)
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
