//! Small launch value types and the launch error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Startup timeout used when none is configured.
pub const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 2000;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while building a launch configuration.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Network unavailable ({context}): {source}")]
    NetworkUnavailable {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn network(context: impl Into<String>, source: io::Error) -> Self {
        Self::NetworkUnavailable {
            context: context.into(),
            source,
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// Superuser account created at cluster initialization.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    username: String,
    #[serde(default)]
    password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Renders `-U <username>`. The password is handed over through the
    /// environment, never on the command line.
    pub fn command_line(&self) -> Vec<String> {
        vec!["-U".to_string(), self.username.clone()]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// =============================================================================
// Timeout
// =============================================================================

/// How long the process supervisor waits for the server to come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutSpec {
    startup_timeout_ms: u64,
}

impl TimeoutSpec {
    pub fn new(startup_timeout_ms: u64) -> Self {
        Self { startup_timeout_ms }
    }

    pub fn startup_timeout_ms(&self) -> u64 {
        self.startup_timeout_ms
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

impl Default for TimeoutSpec {
    fn default() -> Self {
        Self::new(DEFAULT_STARTUP_TIMEOUT_MS)
    }
}
