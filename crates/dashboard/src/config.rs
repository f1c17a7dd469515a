#![forbid(unsafe_code)]

use crate::error::{ConfigFileError, DashboardError};
use cv_core::OverviewSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8501";

/// Shape of the optional YAML config file. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    database: Option<PathBuf>,
    listen: Option<String>,
    overview: OverviewSettings,
}

/// Values given on the command line or through the environment. Both beat
/// the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub listen: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    database: Option<PathBuf>,
    pub listen: String,
    pub overview: OverviewSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database: None,
            listen: DEFAULT_LISTEN.to_string(),
            overview: OverviewSettings::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, DashboardError> {
        let parsed = match file {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };
        Self::layer(parsed, overrides)
    }

    #[cfg(test)]
    pub fn from_yaml(text: &str, overrides: Overrides) -> Result<Self, DashboardError> {
        let parsed = parse_yaml(text).map_err(|err| DashboardError::Config(err.to_string()))?;
        Self::layer(parsed, overrides)
    }

    fn layer(file: FileConfig, overrides: Overrides) -> Result<Self, DashboardError> {
        let defaults = Self::default();
        let database = overrides
            .database
            .or(file.database)
            .filter(|path| !path.as_os_str().is_empty());
        let listen = overrides
            .listen
            .or(file.listen)
            .map(|listen| listen.trim().to_string())
            .unwrap_or(defaults.listen);
        if listen.is_empty() || !listen.contains(':') {
            return Err(DashboardError::Config(format!(
                "listen address `{listen}` must be host:port"
            )));
        }
        Ok(Self {
            database,
            listen,
            overview: file.overview,
        })
    }

    #[cfg(test)]
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    pub fn database(&self) -> Result<&Path, DashboardError> {
        self.database.as_deref().ok_or_else(|| {
            DashboardError::Config(
                "no database configured (pass --db, set CRIMEVIEW_DB or `database:` in the config file)"
                    .to_string(),
            )
        })
    }
}

fn parse_yaml(text: &str) -> Result<FileConfig, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(text)
}

fn read_file(path: &Path) -> Result<FileConfig, DashboardError> {
    let wrap = |source: ConfigFileError| DashboardError::ConfigFile {
        path: path.to_path_buf(),
        source,
    };
    let text = std::fs::read_to_string(path).map_err(|err| wrap(err.into()))?;
    parse_yaml(&text).map_err(|err| wrap(err.into()))
}
