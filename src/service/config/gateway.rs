use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    launch::{GatewayFlag, DEFAULT_GATEWAY_PORT},
    lib::errors::ConfigError,
};

/// Gateway launch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySection {
    pub port: u16,
    /// Every other key, recognized or not, as a string.
    pub options: BTreeMap<String, String>,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            port: DEFAULT_GATEWAY_PORT,
            options: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawGatewaySection {
    pub port: Option<i64>,
    #[serde(flatten)]
    pub options: BTreeMap<String, Value>,
}

pub fn parse_gateway_section(
    raw: Option<RawGatewaySection>,
    path: &Path,
) -> Result<GatewaySection, ConfigError> {
    let gateway_raw = raw.unwrap_or_default();
    let port = match gateway_raw.port {
        Some(port) => validate_port(port, path)?,
        None => DEFAULT_GATEWAY_PORT,
    };

    let mut options = BTreeMap::new();
    for (key, value) in gateway_raw.options {
        let value = option_value(&key, value, path)?;
        options.insert(key, value);
    }

    Ok(GatewaySection { port, options })
}

fn validate_port(port: i64, path: &Path) -> Result<u16, ConfigError> {
    match u16::try_from(port) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "gateway.port",
            message: format!("Use a port in the range 1-65535 (got {port})"),
        }),
    }
}

fn option_value(key: &str, value: Value, path: &Path) -> Result<String, ConfigError> {
    let rendered = match value {
        Value::String(value) => value,
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        _ => {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "gateway",
                message: format!("Option `{key}` must be a string, number, or boolean"),
            })
        }
    };
    if GatewayFlag::from_key(key).is_some() && rendered.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "gateway",
            message: format!("Option `{key}` cannot be empty"),
        });
    }
    Ok(rendered)
}
