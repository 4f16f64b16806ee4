//! Package path resolution.
//!
//! Maps a [`Distribution`] and a bundled [`Command`] to the archive that has
//! to be downloaded and the location of the executable inside it. Everything
//! here is a pure function of its inputs.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::types::{ArchiveFormat, BitSize, Command, Distribution, DistributionError, Platform};

/// Default location of the upstream binary bundles.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://get.enterprisedb.com/postgresql/";

/// Top-level directory every bundle unpacks into.
pub const BUNDLE_ROOT: &str = "pgsql";

// ============================================================================
// Artifact Descriptor
// ============================================================================

/// Everything a downloader/extractor needs to fetch one executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// The bundled executable this artifact was resolved for.
    pub command: Command,
    /// Archive file name relative to the download base.
    pub archive_path_fragment: String,
    pub archive_format: ArchiveFormat,
    /// Executable path relative to the bundle root, e.g. `bin/initdb`.
    pub in_archive_executable_path: String,
}

impl ArtifactDescriptor {
    /// Executable path relative to the extraction directory, including the
    /// bundle root, e.g. `pgsql/bin/initdb`.
    pub fn archive_entry(&self) -> String {
        format!("{}/{}", BUNDLE_ROOT, self.in_archive_executable_path)
    }

    /// Full download URL of the archive below `base`.
    pub fn download_url(&self, base: &str) -> Result<Url, DistributionError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(&self.archive_path_fragment)?)
    }
}

// ============================================================================
// Package Resolver
// ============================================================================

/// Resolves bundle locations for a single bundled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageResolver {
    command: Command,
}

impl PackageResolver {
    pub fn new(command: Command) -> Self {
        Self { command }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Resolves the artifact for `distribution`.
    pub fn resolve(&self, distribution: &Distribution) -> ArtifactDescriptor {
        let descriptor = ArtifactDescriptor {
            command: self.command,
            archive_path_fragment: archive_path_fragment(
                &distribution.version,
                distribution.platform,
                distribution.bit_size,
            ),
            archive_format: archive_format(distribution.platform),
            in_archive_executable_path: in_archive_executable_path(
                self.command,
                distribution.platform,
            ),
        };

        debug!(
            "Resolved {} for {} -> {}",
            self.command, distribution, descriptor.archive_path_fragment
        );

        descriptor
    }
}

/// Returns the executable file name of `command` on `platform`.
pub fn executable_file_name(command: Command, platform: Platform) -> String {
    match platform {
        Platform::Linux | Platform::MacOs => command.command_name().to_string(),
        Platform::Windows => format!("{}.exe", command.command_name()),
    }
}

/// Returns the container format upstream publishes for `platform`.
pub fn archive_format(platform: Platform) -> ArchiveFormat {
    match platform {
        Platform::Linux => ArchiveFormat::TarGz,
        Platform::MacOs | Platform::Windows => ArchiveFormat::Zip,
    }
}

/// Suffix appended to the platform tag in archive names.
///
/// Only 64-bit Linux and Windows bundles carry `-x64`; macOS bundles are
/// never suffixed and 32-bit bundles are never suffixed.
pub fn arch_suffix(platform: Platform, bit_size: BitSize) -> &'static str {
    match (bit_size, platform) {
        (BitSize::B64, Platform::Linux | Platform::Windows) => "-x64",
        (BitSize::B64, Platform::MacOs) => "",
        (BitSize::B32, _) => "",
    }
}

/// Returns the archive name, e.g. `postgresql-9.6.3-linux-x64-binaries.tar.gz`.
pub fn archive_path_fragment(version: &str, platform: Platform, bit_size: BitSize) -> String {
    format!(
        "postgresql-{}-{}{}-binaries.{}",
        version,
        platform.as_str(),
        arch_suffix(platform, bit_size),
        archive_format(platform).extension()
    )
}

/// Returns the executable path relative to the bundle root.
pub fn in_archive_executable_path(command: Command, platform: Platform) -> String {
    format!("bin/{}", executable_file_name(command, platform))
}
