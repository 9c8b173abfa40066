use std::fs;
use std::path::Path;

use junctionforge_core::{BoundaryKind, JunctionConfig};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Contents of the `--config` TOML file; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub junction: JunctionConfig,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print GeoJSON
    pub pretty: bool,
    pub boundary_kind: BoundaryKind,
    /// Emit `<road>` elements of connecting roads after each junction
    pub connecting_roads: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            boundary_kind: BoundaryKind::Outer,
            connecting_roads: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&contents).map_err(|source| CliError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        settings.junction.validate()?;
        Ok(settings)
    }
}
