use tracing::{debug, info};

use super::{LauncherConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_env_source(path: &std::path::Path, from_env: bool) {
    if from_env {
        info!(
            target: "openclaw_launcher::config",
            path = %path.display(),
            "Loading configuration using OPENCLAW_LAUNCHER_CONFIG environment variable"
        );
    } else {
        debug!(
            target: "openclaw_launcher::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "OPENCLAW_LAUNCHER_CONFIG not set; using default openclaw-launcher.toml"
        );
    }
}

pub fn log_defaults() {
    debug!(
        target: "openclaw_launcher::config",
        env = CONFIG_ENV_KEY,
        default = DEFAULT_CONFIG_PATH,
        "No configuration file found; using built-in defaults"
    );
}

pub fn log_loaded(config: &LauncherConfig) {
    info!(
        target: "openclaw_launcher::config",
        path = ?config.source_path,
        binary_name = %config.launcher.binary_name,
        runtime = config.launcher.runtime.as_str(),
        port = config.gateway.port,
        gateway_options = config.gateway.options.len(),
        "Configuration file loaded successfully"
    );
}
