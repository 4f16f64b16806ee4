//! Temp-folder root resolution for data directories.
//!
//! Temporary data directories are created below a [`TempRoot`]:
//!
//! - Linux: `/tmp/`
//! - macOS: `/var/folders/.../` (per-user temp via std::env::temp_dir)
//! - Windows: `C:\Users\<User>\AppData\Local\Temp\`
//!
//! The root is always passed explicitly. Reading the override variable only
//! happens when a caller asks for it through [`TempRoot::from_env`].

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable consulted by [`TempRoot::from_env`].
pub const TEMP_DIR_ENV: &str = "PGEMBED_TEMP_DIR";

/// Name prefix of every temporary data directory.
pub const TEMP_DIR_PREFIX: &str = "embedpostgres-db";

/// Directory under which temporary data directories are allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TempRoot(PathBuf);

impl TempRoot {
    /// Uses the OS temp folder.
    pub fn platform() -> Self {
        Self(std::env::temp_dir())
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Uses `PGEMBED_TEMP_DIR` when set and non-empty, the OS temp folder otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os(TEMP_DIR_ENV) {
            Some(value) if !value.is_empty() => Self(PathBuf::from(value)),
            _ => Self::platform(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Creates the root if it is missing.
    pub fn ensure_exists(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.0)
    }
}

impl Default for TempRoot {
    fn default() -> Self {
        Self::platform()
    }
}
