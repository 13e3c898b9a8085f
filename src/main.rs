//! Entry point for openclaw-launcher.
use std::process::ExitCode;

use clap::Parser;
use openclaw_launcher::{
    cli::LauncherArgs,
    lib::telemetry,
    service::runtime::{self, RuntimeExit},
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<(), RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let args = LauncherArgs::parse();
    let command = args.into_command().map_err(RuntimeExit::from_error)?;
    let payload = runtime::run_command(command).await?;
    println!("{payload}");
    Ok(())
}
