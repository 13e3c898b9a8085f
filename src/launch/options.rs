//! Launch options accepted by the gateway argument builder.
use std::{collections::BTreeMap, path::PathBuf};

use clap::ValueEnum;

use crate::lib::errors::LaunchError;

/// Default port the gateway binds when nothing else is configured.
pub const DEFAULT_GATEWAY_PORT: u16 = 18789;

/// Gateway options forwarded as `--<flag> <value>` pairs.
///
/// Variant order is the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GatewayFlag {
    Bind,
    Auth,
    Tailscale,
}

impl GatewayFlag {
    pub const ALL: [GatewayFlag; 3] = [
        GatewayFlag::Bind,
        GatewayFlag::Auth,
        GatewayFlag::Tailscale,
    ];

    /// Option key as used in configuration files.
    pub const fn key(&self) -> &'static str {
        match self {
            GatewayFlag::Bind => "bind",
            GatewayFlag::Auth => "auth",
            GatewayFlag::Tailscale => "tailscale",
        }
    }

    /// Command-line flag emitted for this option.
    pub const fn flag(&self) -> &'static str {
        match self {
            GatewayFlag::Bind => "--bind",
            GatewayFlag::Auth => "--auth",
            GatewayFlag::Tailscale => "--tailscale",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }
}

/// Which script runtime relaunches the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RuntimePreference {
    /// The runtime that is executing the CLI right now.
    #[default]
    Auto,
    Node,
    Bun,
}

impl RuntimePreference {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RuntimePreference::Auto => "auto",
            RuntimePreference::Node => "node",
            RuntimePreference::Bun => "bun",
        }
    }

    /// Executable name searched for when no runtime path is known.
    pub const fn binary_name(&self) -> &'static str {
        match self {
            RuntimePreference::Auto | RuntimePreference::Node => "node",
            RuntimePreference::Bun => "bun",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(RuntimePreference::Auto),
            "node" => Some(RuntimePreference::Node),
            "bun" => Some(RuntimePreference::Bun),
            _ => None,
        }
    }
}

/// Input configuration for building gateway program arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub port: u16,
    pub runtime: RuntimePreference,
    pub runtime_path: Option<PathBuf>,
    flags: BTreeMap<GatewayFlag, String>,
    unrecognized: BTreeMap<String, String>,
}

impl LaunchOptions {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            runtime: RuntimePreference::Auto,
            runtime_path: None,
            flags: BTreeMap::new(),
            unrecognized: BTreeMap::new(),
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimePreference) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_runtime_path(mut self, runtime_path: impl Into<PathBuf>) -> Self {
        self.runtime_path = Some(runtime_path.into());
        self
    }

    pub fn with_flag(mut self, flag: GatewayFlag, value: impl Into<String>) -> Self {
        self.flags.insert(flag, value.into());
        self
    }

    /// Set an option by key; unknown keys are kept but never forwarded.
    pub fn with_option(mut self, key: &str, value: impl Into<String>) -> Self {
        match GatewayFlag::from_key(key) {
            Some(flag) => {
                self.flags.insert(flag, value.into());
            }
            None => {
                self.unrecognized.insert(key.to_string(), value.into());
            }
        }
        self
    }

    pub fn flag(&self, flag: GatewayFlag) -> Option<&str> {
        self.flags.get(&flag).map(String::as_str)
    }

    /// Recognized options in enumeration order.
    pub fn forwarded_flags(&self) -> impl Iterator<Item = (GatewayFlag, &str)> + '_ {
        GatewayFlag::ALL
            .into_iter()
            .filter_map(|flag| self.flag(flag).map(|value| (flag, value)))
    }

    /// Options that were supplied but are not consumed.
    pub fn unrecognized(&self) -> &BTreeMap<String, String> {
        &self.unrecognized
    }

    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.port == 0 {
            return Err(LaunchError::InvalidPort { port: self.port });
        }
        Ok(())
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_PORT)
    }
}
