//! pgembed Core Library
//!
//! This crate provides the pieces needed to run an embedded PostgreSQL
//! from upstream binary bundles. It includes:
//!
//! - Distribution resolution: which archive to fetch for a version,
//!   platform and bit size, and where each executable lives inside it
//! - Launch configuration: data directory, network endpoint, locale,
//!   credentials, startup timeout and extra arguments, rendered into
//!   command lines and environment for the bundled executables
//!
//! Downloading, extracting and supervising processes are left to the caller.

pub mod distribution;
pub mod launch;

// Re-export distribution
pub use distribution::{
    ArchiveFormat, ArtifactDescriptor, BitSize, Command, CustomVersion, Distribution,
    DistributionError, PackageResolver, PgVersion, Platform, Version,
};

// Re-export launch configuration
pub use launch::{
    Credentials, LaunchConfig, LaunchConfigBuilder, LaunchError, LaunchSettings, LocaleSpec,
    NetEndpoint, StorageSpec, TempRoot, TimeoutSpec,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
