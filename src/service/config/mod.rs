//! Load and validate launcher configuration.
use std::{env, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::{launch::LaunchOptions, lib::errors::ConfigError};

pub mod gateway;
pub mod launcher;
pub mod telemetry;

pub use gateway::{parse_gateway_section, GatewaySection, RawGatewaySection};
pub use launcher::{
    parse_launcher_section, LauncherSection, RawLauncherSection, DEFAULT_BINARY_NAME,
};

pub const CONFIG_ENV_KEY: &str = "OPENCLAW_LAUNCHER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "openclaw-launcher.toml";

/// Top-level configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    pub launcher: LauncherSection,
    pub gateway: GatewaySection,
    /// `None` when built-in defaults are in use.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLauncherConfig {
    launcher: Option<RawLauncherSection>,
    gateway: Option<RawGatewaySection>,
}

impl LauncherConfig {
    /// Load `override_path` when given, otherwise fall back to the environment or defaults.
    pub fn load(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match override_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_env_or_default(),
        }
    }

    /// Prefer `OPENCLAW_LAUNCHER_CONFIG` if set; otherwise read
    /// `openclaw-launcher.toml` when present, else use built-in defaults.
    pub fn load_from_env_or_default() -> Result<Self, ConfigError> {
        if let Ok(value) = env::var(CONFIG_ENV_KEY) {
            if !value.trim().is_empty() {
                let path = PathBuf::from(value);
                telemetry::log_env_source(&path, true);
                return Self::load_from_path(path);
            }
        }

        let path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if path.is_file() {
            telemetry::log_env_source(&path, false);
            return Self::load_from_path(path);
        }

        telemetry::log_defaults();
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "openclaw_launcher::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "openclaw_launcher::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawLauncherConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "openclaw_launcher::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "openclaw_launcher::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    /// Launch options described by this configuration.
    pub fn launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new(self.gateway.port).with_runtime(self.launcher.runtime);
        if let Some(runtime_path) = &self.launcher.runtime_path {
            options = options.with_runtime_path(runtime_path.clone());
        }
        for (key, value) in &self.gateway.options {
            options = options.with_option(key, value.clone());
        }
        options
    }

    fn from_raw(raw: RawLauncherConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let launcher = parse_launcher_section(raw.launcher, &path)?;
        let gateway = parse_gateway_section(raw.gateway, &path)?;

        Ok(Self {
            launcher,
            gateway,
            source_path: Some(path),
        })
    }
}
