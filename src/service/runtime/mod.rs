//! Command execution and exit-code mapping.
mod startup;

pub use startup::{
    run_command, run_command_with_probe, RuntimeExit, EXIT_ENTRYPOINT_NOT_FOUND, LOOKUP_PROBE_ENV,
};
