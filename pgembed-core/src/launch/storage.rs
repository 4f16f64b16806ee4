//! Data directory allocation.
//!
//! A [`StorageSpec`] is either a caller-owned directory (created if missing,
//! never removed by us) or a freshly allocated temporary directory that the
//! process lifecycle owner is expected to delete after use.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{TempRoot, TEMP_DIR_PREFIX};
use super::types::LaunchError;

/// Where the cluster lives and which database is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSpec {
    directory: PathBuf,
    database_name: String,
    is_temporary: bool,
}

impl StorageSpec {
    /// Resolves the data directory for `database_name`.
    ///
    /// With no directory (or an empty one) a uniquely named directory is
    /// allocated below `temp_root` and marked temporary. Otherwise the given
    /// directory must exist or be creatable.
    ///
    /// A relative directory is made absolute against the current working
    /// directory, so [`StorageSpec::dir`] may differ from the path passed in.
    /// Absolute paths are kept as given.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::StorageUnavailable`] if the directory cannot be
    /// created, or if the path exists but is not a directory.
    pub fn create(
        database_name: impl Into<String>,
        directory: Option<&Path>,
        temp_root: &TempRoot,
    ) -> Result<Self, LaunchError> {
        let database_name = database_name.into();

        match directory.filter(|dir| !dir.as_os_str().is_empty()) {
            None => {
                let directory = create_temp_dir(temp_root)?;
                info!("Allocated temporary data directory {}", directory.display());
                Ok(Self {
                    directory,
                    database_name,
                    is_temporary: true,
                })
            }
            Some(dir) => {
                let directory = create_or_check_dir(dir)?;
                debug!("Using data directory {}", directory.display());
                Ok(Self {
                    directory,
                    database_name,
                    is_temporary: false,
                })
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.directory
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Whether the directory should be removed once the process is done.
    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }

    /// Renders `-D <directory>`.
    pub fn command_line(&self) -> Vec<String> {
        vec!["-D".to_string(), self.directory.to_string_lossy().into_owned()]
    }
}

fn create_temp_dir(temp_root: &TempRoot) -> Result<PathBuf, LaunchError> {
    let root = temp_root.path();
    temp_root
        .ensure_exists()
        .map_err(|e| LaunchError::storage(root, e))?;

    let dir = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir_in(root)
        .map_err(|e| LaunchError::storage(root, e))?;

    Ok(dir.keep())
}

fn create_or_check_dir(dir: &Path) -> Result<PathBuf, LaunchError> {
    let dir = std::path::absolute(dir).map_err(|e| LaunchError::storage(dir, e))?;

    if dir.exists() {
        if !dir.is_dir() {
            return Err(LaunchError::storage(
                &dir,
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            ));
        }
        return Ok(dir);
    }

    fs::create_dir_all(&dir).map_err(|e| LaunchError::storage(&dir, e))?;
    Ok(dir)
}
