//! Launch configuration for the bundled executables.
//!
//! This module models everything needed to start a PostgreSQL executable:
//! where the data lives, which host and port to listen on, locale flags,
//! credentials, the startup timeout and any extra raw arguments. Each value
//! type renders its own command-line flags.
//!
//! # Architecture
//!
//! - `types`: Error type, Credentials and TimeoutSpec
//! - `paths`: Temp-folder root for temporary data directories
//! - `storage`: Data directory allocation (StorageSpec)
//! - `net`: Host resolution and free-port selection (NetEndpoint)
//! - `locale`: Locale flags for `initdb` (LocaleSpec)
//! - `config`: The LaunchConfig aggregate and its builder
//! - `settings`: JSON settings resolved into a LaunchConfig
//! - `env`: Hand-off onto a `std::process::Command`
//!
//! Only `storage` and `net` touch the host: they create a directory and
//! look up a free port. Both are observations, not reservations; nothing here holds
//! a lock on either.
//!
//! # Example
//!
//! ```no_run
//! use pgembed_core::distribution::{Command, PgVersion};
//! use pgembed_core::launch::{LaunchConfig, LocaleSpec};
//!
//! let config = LaunchConfig::builder(&PgVersion::V9_6)
//!     .locale(LocaleSpec::default().with_encoding("UTF8"))
//!     .build()?
//!     .with_args(["-c", "fsync=off"]);
//!
//! let argv = config.command_line(Command::Postgres);
//! println!("postgres {}", argv.join(" "));
//! # Ok::<(), pgembed_core::launch::LaunchError>(())
//! ```

pub mod config;
pub mod env;
pub mod locale;
pub mod net;
pub mod paths;
pub mod settings;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{temporary_data_dir, LaunchConfig, LaunchConfigBuilder, DEFAULT_DATABASE};
pub use env::{apply_to_command, executable_path, prepare_command};
pub use locale::LocaleSpec;
pub use net::{free_server_port, local_host_address, NetEndpoint};
pub use paths::{TempRoot, TEMP_DIR_ENV, TEMP_DIR_PREFIX};
pub use settings::LaunchSettings;
pub use storage::StorageSpec;
pub use types::{Credentials, LaunchError, TimeoutSpec, DEFAULT_STARTUP_TIMEOUT_MS};
