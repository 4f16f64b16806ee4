//! Declarative launch settings.
//!
//! Settings are read from JSON and turned into a [`LaunchConfig`]. Every
//! field is optional; whatever is missing is resolved the same way the
//! builder resolves it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::distribution::{CustomVersion, PgVersion, Version};

use super::config::{LaunchConfig, DEFAULT_DATABASE};
use super::locale::LocaleSpec;
use super::net::NetEndpoint;
use super::paths::TempRoot;
use super::storage::StorageSpec;
use super::types::{Credentials, LaunchError, TimeoutSpec, DEFAULT_STARTUP_TIMEOUT_MS};

/// Launch settings as written in a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// Version in download-path form (e.g. "9.6.3-1").
    pub version: Option<String>,

    pub host: Option<String>,

    pub port: Option<u16>,

    pub database_name: String,

    /// Data directory; a temporary one is allocated when unset.
    pub data_dir: Option<PathBuf>,

    /// Root for temporary data directories; the OS temp folder when unset.
    pub temp_root: Option<PathBuf>,

    pub locale: LocaleSpec,

    pub credentials: Option<Credentials>,

    pub startup_timeout_ms: u64,

    /// Raw arguments appended after all derived ones.
    pub args: Vec<String>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            version: None,
            host: None,
            port: None,
            database_name: DEFAULT_DATABASE.to_string(),
            data_dir: None,
            temp_root: None,
            locale: LocaleSpec::default(),
            credentials: None,
            startup_timeout_ms: DEFAULT_STARTUP_TIMEOUT_MS,
            args: Vec::new(),
        }
    }
}

impl LaunchSettings {
    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse launch settings")
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read launch settings: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse launch settings: {}", path.display()))
    }

    /// Version string used in download paths.
    pub fn version(&self) -> String {
        match &self.version {
            Some(version) => version.clone(),
            None => PgVersion::PRODUCTION.as_in_download_path(),
        }
    }

    /// Resolves the settings into a launch configuration.
    ///
    /// Performs the same bounded I/O as the builder: a free-port lookup when
    /// host or port is missing and a directory allocation or check.
    pub fn build(&self) -> Result<LaunchConfig, LaunchError> {
        let temp_root = self
            .temp_root
            .as_ref()
            .map(TempRoot::new)
            .unwrap_or_default();

        let network = NetEndpoint::create(self.host.as_deref(), self.port)?;
        let storage = StorageSpec::create(
            self.database_name.as_str(),
            self.data_dir.as_deref(),
            &temp_root,
        )?;

        let mut builder = LaunchConfig::builder(&CustomVersion::new(self.version()))
            .network(network)
            .storage(storage)
            .locale(self.locale.clone())
            .timeout(TimeoutSpec::new(self.startup_timeout_ms))
            .args(self.args.iter().cloned());

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }

        builder.build()
    }
}
