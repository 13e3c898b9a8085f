//! CLI entrypoint module structure.
pub mod args;
pub mod profile;

pub use args::{
    InvocationArgs, LauncherArgs, LauncherCommand, ParsedCommand, ProgramArgsArgs,
    ResolveEntrypointArgs,
};
pub use profile::{
    resolve_config_path, resolve_invocation, LaunchOverrides, LaunchProfile, INVOKED_PATH_ENV,
    INVOKED_RUNTIME_ENV, RUNTIME_PATH_ENV,
};
