//! Gateway relaunch: options, runtime selection, and the program argument vector.
pub mod arguments;
pub mod options;

use tracing::debug;

use crate::{
    entrypoint::{resolve_cli_entrypoint, Invocation, LookupProbe},
    lib::{
        errors::LaunchError,
        telemetry::{emit_launch, LaunchTelemetry},
    },
};

pub use arguments::{build_program_arguments, select_runtime, GatewayProgramArgs};
pub use options::{GatewayFlag, LaunchOptions, RuntimePreference, DEFAULT_GATEWAY_PORT};

/// Resolve the entrypoint for `invocation` and build the gateway argument vector.
///
/// Fails with [`LaunchError::Entrypoint`] when no built CLI can be found in
/// the invoked path's lineage; the search-path binary is never substituted.
pub async fn resolve_gateway_program_args<P: LookupProbe>(
    invocation: &Invocation,
    options: &LaunchOptions,
    binary_name: &str,
    probe: &P,
) -> Result<GatewayProgramArgs, LaunchError> {
    options.validate()?;
    let entrypoint = resolve_cli_entrypoint(invocation, binary_name, probe).await?;
    let runtime = select_runtime(
        options.runtime,
        options.runtime_path.as_deref(),
        invocation.runtime_path(),
        probe,
    )?;

    for key in options.unrecognized().keys() {
        debug!(
            target: "openclaw_launcher::launch",
            option = %key,
            "Launch option is not forwarded to the gateway"
        );
    }

    let args = build_program_arguments(&runtime, &entrypoint.path, options)?;
    emit_launch(&LaunchTelemetry {
        runtime: &runtime,
        port: options.port,
        forwarded_flags: options.forwarded_flags().count(),
        program_arguments: &args.program_arguments,
    });
    Ok(args)
}
