//! The launch configuration aggregate.
//!
//! A [`LaunchConfig`] bundles every value a process launcher needs to start
//! one of the bundled executables. It is assembled through
//! [`LaunchConfigBuilder`], which fills in any missing component at build
//! time, and is immutable afterwards apart from [`LaunchConfig::with_args`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::distribution::{Command, PgVersion, Version};

use super::locale::LocaleSpec;
use super::net::NetEndpoint;
use super::paths::TempRoot;
use super::storage::StorageSpec;
use super::types::{Credentials, LaunchError, TimeoutSpec};

/// Database used when the caller does not name one.
pub const DEFAULT_DATABASE: &str = "postgres";

// =============================================================================
// Launch Config
// =============================================================================

/// Immutable description of how to launch the bundled executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    version: String,
    network: NetEndpoint,
    storage: StorageSpec,
    locale: LocaleSpec,
    timeout: TimeoutSpec,
    credentials: Option<Credentials>,
    args: Vec<String>,
}

impl LaunchConfig {
    pub fn builder(version: &impl Version) -> LaunchConfigBuilder {
        LaunchConfigBuilder::new(version)
    }

    /// Version in download-path form.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn network(&self) -> &NetEndpoint {
        &self.network
    }

    pub fn storage(&self) -> &StorageSpec {
        &self.storage
    }

    pub fn locale(&self) -> &LocaleSpec {
        &self.locale
    }

    pub fn timeout(&self) -> &TimeoutSpec {
        &self.timeout
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Extra arguments appended after everything derived from the components.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Appends raw arguments, in order, after all derived arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Same components, no extra arguments. Used to derive the configuration
    /// of another executable from this one.
    pub fn without_args(&self) -> Self {
        Self {
            args: Vec::new(),
            ..self.clone()
        }
    }

    /// Directory the executable should be started in.
    pub fn working_dir(&self) -> &Path {
        self.storage.dir()
    }

    /// Renders the full argument vector for `command`.
    ///
    /// Component flags come first, in a fixed order per command, followed by
    /// [`LaunchConfig::args`].
    pub fn command_line(&self, command: Command) -> Vec<String> {
        let mut cmd = Vec::new();

        match command {
            Command::InitDb => {
                cmd.extend(self.storage.command_line());
                if let Some(credentials) = &self.credentials {
                    cmd.extend(credentials.command_line());
                }
                cmd.extend(self.locale.build_command_line());
            }
            Command::Postgres => {
                cmd.extend(self.network.command_line());
                cmd.extend(self.storage.command_line());
            }
            Command::PgCtl => {
                cmd.extend(self.storage.command_line());
                cmd.push("-o".to_string());
                cmd.push(self.network.command_line().join(" "));
            }
            Command::CreateDb => {
                cmd.extend(self.client_connection_args());
                cmd.push(self.storage.database_name().to_string());
            }
            Command::Psql | Command::PgDump | Command::PgRestore => {
                cmd.extend(self.client_connection_args());
                cmd.push("-d".to_string());
                cmd.push(self.storage.database_name().to_string());
            }
        }

        cmd.extend(self.args.iter().cloned());
        cmd
    }

    fn client_connection_args(&self) -> Vec<String> {
        let mut cmd = self.network.command_line();
        if let Some(credentials) = &self.credentials {
            cmd.extend(credentials.command_line());
        }
        cmd
    }

    /// Environment variables for a process using this configuration.
    pub fn environment(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(
            "PGDATA".to_string(),
            self.storage.dir().to_string_lossy().into_owned(),
        );
        env.insert("PGHOST".to_string(), self.network.host().to_string());
        env.insert("PGPORT".to_string(), self.network.port().to_string());
        env.insert(
            "PGDATABASE".to_string(),
            self.storage.database_name().to_string(),
        );

        if let Some(credentials) = &self.credentials {
            env.insert("PGUSER".to_string(), credentials.username().to_string());
            if let Some(password) = credentials.password() {
                env.insert("PGPASSWORD".to_string(), password.to_string());
            }
        }

        env
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects launch components; anything left unset is resolved in
/// [`LaunchConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct LaunchConfigBuilder {
    version: String,
    network: Option<NetEndpoint>,
    storage: Option<StorageSpec>,
    database_name: String,
    temp_root: TempRoot,
    locale: LocaleSpec,
    timeout: TimeoutSpec,
    credentials: Option<Credentials>,
    args: Vec<String>,
}

impl LaunchConfigBuilder {
    pub fn new(version: &impl Version) -> Self {
        Self {
            version: version.as_in_download_path(),
            network: None,
            storage: None,
            database_name: DEFAULT_DATABASE.to_string(),
            temp_root: TempRoot::platform(),
            locale: LocaleSpec::default(),
            timeout: TimeoutSpec::default(),
            credentials: None,
            args: Vec::new(),
        }
    }

    pub fn network(mut self, network: NetEndpoint) -> Self {
        self.network = Some(network);
        self
    }

    pub fn storage(mut self, storage: StorageSpec) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Database name used for a storage allocated at build time.
    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Root for a storage allocated at build time.
    pub fn temp_root(mut self, root: TempRoot) -> Self {
        self.temp_root = root;
        self
    }

    pub fn locale(mut self, locale: LocaleSpec) -> Self {
        self.locale = locale;
        self
    }

    pub fn timeout(mut self, timeout: TimeoutSpec) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds the configuration.
    ///
    /// The endpoint is resolved before any temporary directory is allocated,
    /// so a network failure leaves nothing behind on disk.
    pub fn build(self) -> Result<LaunchConfig, LaunchError> {
        let network = match self.network {
            Some(network) => network,
            None => NetEndpoint::create(None, None)?,
        };

        let storage = match self.storage {
            Some(storage) => storage,
            None => StorageSpec::create(self.database_name, None, &self.temp_root)?,
        };

        Ok(LaunchConfig {
            version: self.version,
            network,
            storage,
            locale: self.locale,
            timeout: self.timeout,
            credentials: self.credentials,
            args: self.args,
        })
    }
}

impl Default for LaunchConfigBuilder {
    fn default() -> Self {
        Self::new(&PgVersion::PRODUCTION)
    }
}

/// Temporary data directory of `config`, if it owns one.
pub fn temporary_data_dir(config: &LaunchConfig) -> Option<PathBuf> {
    config
        .storage()
        .is_temporary()
        .then(|| config.storage().dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::CustomVersion;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> LaunchConfig {
        let storage = StorageSpec::create("app", Some(dir.path()), &TempRoot::platform()).unwrap();
        LaunchConfig::builder(&CustomVersion::new("9.6.3"))
            .network(NetEndpoint::new("127.0.0.1", 15432))
            .storage(storage)
            .build()
            .unwrap()
    }

    fn data_dir(dir: &TempDir) -> String {
        dir.path().to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let root = TempDir::new().unwrap();
        let config = LaunchConfig::builder(&PgVersion::V9_6)
            .temp_root(TempRoot::new(root.path()))
            .build()
            .unwrap();

        assert_eq!(config.version(), "9.6.3-1");
        assert!(config.storage().is_temporary());
        assert!(config.storage().dir().starts_with(root.path()));
        assert_eq!(config.storage().database_name(), DEFAULT_DATABASE);
        assert_ne!(config.network().port(), 0);
        assert_eq!(config.timeout().startup_timeout_ms(), 2000);
        assert!(config.locale().build_command_line().is_empty());
        assert!(config.credentials().is_none());
        assert!(config.args().is_empty());
        assert_eq!(
            temporary_data_dir(&config).as_deref(),
            Some(config.storage().dir())
        );
    }

    #[test]
    fn test_with_args_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir)
            .with_args(["-c", "fsync=off"])
            .with_args(vec!["-N".to_string(), "10".to_string()]);

        assert_eq!(config.args(), ["-c", "fsync=off", "-N", "10"]);
        assert!(config.without_args().args().is_empty());
        assert_eq!(temporary_data_dir(&config), None);
    }

    #[test]
    fn test_postgres_command_line() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_args(["-c", "fsync=off"]);

        assert_eq!(
            config.command_line(Command::Postgres),
            vec![
                "-h".to_string(),
                "127.0.0.1".to_string(),
                "-p".to_string(),
                "15432".to_string(),
                "-D".to_string(),
                data_dir(&dir),
                "-c".to_string(),
                "fsync=off".to_string(),
            ]
        );
    }

    #[test]
    fn test_initdb_command_line() {
        let dir = TempDir::new().unwrap();
        let storage = StorageSpec::create("app", Some(dir.path()), &TempRoot::platform()).unwrap();
        let config = LaunchConfig::builder(&CustomVersion::new("9.6.3"))
            .network(NetEndpoint::new("127.0.0.1", 15432))
            .storage(storage)
            .credentials(Credentials::new("admin", Some("secret".to_string())))
            .locale(
                LocaleSpec::default()
                    .with_encoding("UTF8")
                    .with_lc_collate("en_US"),
            )
            .args(["--auth=trust"])
            .build()
            .unwrap();

        assert_eq!(
            config.command_line(Command::InitDb),
            vec![
                "-D".to_string(),
                data_dir(&dir),
                "-U".to_string(),
                "admin".to_string(),
                "--encoding=UTF8".to_string(),
                "--lc-collate=en_US".to_string(),
                "--auth=trust".to_string(),
            ]
        );
    }

    #[test]
    fn test_pg_ctl_command_line() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir).with_args(["start"]);

        assert_eq!(
            config.command_line(Command::PgCtl),
            vec![
                "-D".to_string(),
                data_dir(&dir),
                "-o".to_string(),
                "-h 127.0.0.1 -p 15432".to_string(),
                "start".to_string(),
            ]
        );
    }

    #[test]
    fn test_client_command_lines() {
        let dir = TempDir::new().unwrap();
        let storage = StorageSpec::create("app", Some(dir.path()), &TempRoot::platform()).unwrap();
        let config = LaunchConfig::builder(&CustomVersion::new("9.6.3"))
            .network(NetEndpoint::new("127.0.0.1", 15432))
            .storage(storage)
            .credentials(Credentials::new("admin", None))
            .build()
            .unwrap();

        assert_eq!(
            config.command_line(Command::CreateDb),
            vec!["-h", "127.0.0.1", "-p", "15432", "-U", "admin", "app"]
        );
        assert_eq!(
            config.command_line(Command::Psql),
            vec!["-h", "127.0.0.1", "-p", "15432", "-U", "admin", "-d", "app"]
        );
    }

    #[test]
    fn test_environment() {
        let dir = TempDir::new().unwrap();
        let storage = StorageSpec::create("app", Some(dir.path()), &TempRoot::platform()).unwrap();
        let config = LaunchConfig::builder(&CustomVersion::new("9.6.3"))
            .network(NetEndpoint::new("127.0.0.1", 15432))
            .storage(storage)
            .credentials(Credentials::new("admin", Some("secret".to_string())))
            .build()
            .unwrap();

        let env = config.environment();
        assert_eq!(env.get("PGDATA"), Some(&data_dir(&dir)));
        assert_eq!(env.get("PGHOST").map(String::as_str), Some("127.0.0.1"));
        assert_eq!(env.get("PGPORT").map(String::as_str), Some("15432"));
        assert_eq!(env.get("PGDATABASE").map(String::as_str), Some("app"));
        assert_eq!(env.get("PGUSER").map(String::as_str), Some("admin"));
        assert_eq!(env.get("PGPASSWORD").map(String::as_str), Some("secret"));
        assert_eq!(config.working_dir(), dir.path());
    }

    #[test]
    fn test_environment_without_credentials() {
        let dir = TempDir::new().unwrap();
        let env = config_in(&dir).environment();
        assert!(!env.contains_key("PGUSER"));
        assert!(!env.contains_key("PGPASSWORD"));
    }
}
