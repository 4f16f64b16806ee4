//! Core types for distribution resolution.
//!
//! This module defines the closed enumerations a distribution is made of
//! (platform, bit size, archive format, bundled command), the version
//! abstraction used in download paths, and the resolution error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while resolving a distribution.
#[derive(Debug, Error)]
pub enum DistributionError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),

    #[error("Invalid download base URL: {0}")]
    InvalidDownloadBase(#[from] url::ParseError),
}

// ============================================================================
// Platform
// ============================================================================

/// Operating system a binary bundle is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    #[serde(rename = "osx")]
    MacOs,
    Windows,
}

impl Platform {
    /// Returns all supported platforms.
    pub fn all() -> &'static [Platform] {
        &[Self::Linux, Self::MacOs, Self::Windows]
    }

    /// Detects the platform of the running host.
    ///
    /// Fails with [`DistributionError::UnsupportedPlatform`] naming the
    /// target OS when it is none of the bundled platforms.
    pub fn detect() -> Result<Self, DistributionError> {
        #[cfg(target_os = "linux")]
        {
            Ok(Platform::Linux)
        }
        #[cfg(target_os = "macos")]
        {
            Ok(Platform::MacOs)
        }
        #[cfg(target_os = "windows")]
        {
            Ok(Platform::Windows)
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Err(DistributionError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ))
        }
    }

    /// Returns the tag used for this platform in archive names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "osx",
            Self::Windows => "windows",
        }
    }

    /// Returns a human-readable name of the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Platform {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "osx" | "macos" | "darwin" | "os_x" => Ok(Self::MacOs),
            "windows" | "win" => Ok(Self::Windows),
            _ => Err(DistributionError::UnsupportedPlatform(s.to_string())),
        }
    }
}

// ============================================================================
// Bit Size
// ============================================================================

/// Pointer width of the binaries in a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitSize {
    #[serde(rename = "32")]
    B32,
    #[serde(rename = "64")]
    B64,
}

impl BitSize {
    /// Returns all supported bit sizes.
    pub fn all() -> &'static [BitSize] {
        &[Self::B32, Self::B64]
    }

    /// Detects the bundle bit size for the running host.
    ///
    /// Fails with [`DistributionError::UnsupportedArchitecture`] on hosts
    /// that cannot run any upstream bundle. See [`BitSize::for_host`].
    pub fn detect() -> Result<Self, DistributionError> {
        Self::for_host(Platform::detect()?, std::env::consts::ARCH)
    }

    /// Maps a target architecture name (as in `std::env::consts::ARCH`) to
    /// the bundle bit size usable on `platform`.
    ///
    /// Upstream only publishes x86 and x86-64 bundles. Apple Silicon macOS
    /// maps to `B64` because the osx bundle carries no architecture suffix
    /// and runs under Rosetta 2.
    pub fn for_host(platform: Platform, arch: &str) -> Result<Self, DistributionError> {
        match (platform, arch) {
            (_, "x86_64") => Ok(Self::B64),
            (_, "x86") => Ok(Self::B32),
            (Platform::MacOs, "aarch64") => Ok(Self::B64),
            (_, other) => Err(DistributionError::UnsupportedArchitecture(
                other.to_string(),
            )),
        }
    }

    /// Converts a numeric width into a bit size.
    ///
    /// Anything other than 32 or 64 fails with
    /// [`DistributionError::UnsupportedArchitecture`].
    pub fn from_bits(bits: u32) -> Result<Self, DistributionError> {
        match bits {
            32 => Ok(Self::B32),
            64 => Ok(Self::B64),
            other => Err(DistributionError::UnsupportedArchitecture(format!(
                "{}-bit",
                other
            ))),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            Self::B32 => 32,
            Self::B64 => 64,
        }
    }
}

impl fmt::Display for BitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl FromStr for BitSize {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "32" | "b32" | "x86" | "i686" | "32-bit" => Ok(Self::B32),
            "64" | "b64" | "x64" | "x86_64" | "amd64" | "64-bit" => Ok(Self::B64),
            _ => Err(DistributionError::UnsupportedArchitecture(s.to_string())),
        }
    }
}

// ============================================================================
// Archive Format
// ============================================================================

/// Container format of a downloadable bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (.tar.gz)
    TarGz,
    /// ZIP archive (.zip)
    Zip,
}

impl ArchiveFormat {
    /// Returns the file extension used in archive names, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Infers the archive format from a URL or filename.
    pub fn from_file_name(name: &str) -> Result<Self, DistributionError> {
        let lower = name.to_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(DistributionError::UnsupportedArchiveFormat(name.to_string()))
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches('.') {
            "tar.gz" | "tgz" | "targz" => Ok(Self::TarGz),
            "zip" => Ok(Self::Zip),
            _ => Err(DistributionError::UnsupportedArchiveFormat(s.to_string())),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Executables shipped inside a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// The database server.
    Postgres,
    /// Cluster initialization utility.
    InitDb,
    /// Database creation utility.
    CreateDb,
    /// Server control utility.
    PgCtl,
    /// Interactive terminal.
    Psql,
    PgDump,
    PgRestore,
}

impl Command {
    /// Returns all bundled commands.
    pub fn all() -> &'static [Command] {
        &[
            Self::Postgres,
            Self::InitDb,
            Self::CreateDb,
            Self::PgCtl,
            Self::Psql,
            Self::PgDump,
            Self::PgRestore,
        ]
    }

    /// Returns the bare executable name, without any platform suffix.
    pub fn command_name(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::InitDb => "initdb",
            Self::CreateDb => "createdb",
            Self::PgCtl => "pg_ctl",
            Self::Psql => "psql",
            Self::PgDump => "pg_dump",
            Self::PgRestore => "pg_restore",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_name())
    }
}

// ============================================================================
// Versions
// ============================================================================

/// A version that can be embedded in a download path.
pub trait Version {
    /// Canonical representation as it appears in archive names.
    fn as_in_download_path(&self) -> String;
}

/// Upstream releases with known binary bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PgVersion {
    V10_1,
    V9_6,
    V9_5,
}

impl PgVersion {
    /// The release used when a caller does not pick one.
    pub const PRODUCTION: PgVersion = PgVersion::V9_6;

    pub fn all() -> &'static [PgVersion] {
        &[Self::V10_1, Self::V9_6, Self::V9_5]
    }
}

impl Version for PgVersion {
    fn as_in_download_path(&self) -> String {
        match self {
            Self::V10_1 => "10.1-1",
            Self::V9_6 => "9.6.3-1",
            Self::V9_5 => "9.5.7-1",
        }
        .to_string()
    }
}

/// A caller-supplied version string, used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomVersion(String);

impl CustomVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl Version for CustomVersion {
    fn as_in_download_path(&self) -> String {
        self.0.clone()
    }
}

impl<V: Version + ?Sized> Version for &V {
    fn as_in_download_path(&self) -> String {
        (**self).as_in_download_path()
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// The (version, platform, bit size) tuple identifying one binary bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distribution {
    /// Version in download-path form.
    pub version: String,
    pub platform: Platform,
    pub bit_size: BitSize,
}

impl Distribution {
    pub fn new(version: &impl Version, platform: Platform, bit_size: BitSize) -> Self {
        Self {
            version: version.as_in_download_path(),
            platform,
            bit_size,
        }
    }

    /// Builds the distribution matching the running host.
    pub fn detect(version: &impl Version) -> Result<Self, DistributionError> {
        Ok(Self::new(version, Platform::detect()?, BitSize::detect()?))
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.version, self.platform, self.bit_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("OSX".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!("windows".parse::<Platform>().unwrap(), Platform::Windows);

        match "solaris".parse::<Platform>() {
            Err(DistributionError::UnsupportedPlatform(value)) => assert_eq!(value, "solaris"),
            other => panic!("expected UnsupportedPlatform, got {:?}", other),
        }
    }

    #[test]
    fn test_platform_detect() {
        let platform = Platform::detect();
        #[cfg(target_os = "linux")]
        assert_eq!(platform.unwrap(), Platform::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(platform.unwrap(), Platform::MacOs);
        #[cfg(target_os = "windows")]
        assert_eq!(platform.unwrap(), Platform::Windows);
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        assert!(platform.is_err());
    }

    #[test]
    fn test_bit_size_from_bits() {
        assert_eq!(BitSize::from_bits(32).unwrap(), BitSize::B32);
        assert_eq!(BitSize::from_bits(64).unwrap(), BitSize::B64);

        for bits in [0, 8, 16, 128] {
            match BitSize::from_bits(bits) {
                Err(DistributionError::UnsupportedArchitecture(value)) => {
                    assert_eq!(value, format!("{}-bit", bits))
                }
                other => panic!("expected UnsupportedArchitecture, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_bit_size_from_str() {
        assert_eq!("64".parse::<BitSize>().unwrap(), BitSize::B64);
        assert_eq!("x86_64".parse::<BitSize>().unwrap(), BitSize::B64);
        assert_eq!("32".parse::<BitSize>().unwrap(), BitSize::B32);
        assert!(matches!(
            "arm".parse::<BitSize>(),
            Err(DistributionError::UnsupportedArchitecture(_))
        ));
    }

    #[test]
    fn test_bit_size_for_host() {
        for platform in Platform::all() {
            assert_eq!(BitSize::for_host(*platform, "x86_64").unwrap(), BitSize::B64);
            assert_eq!(BitSize::for_host(*platform, "x86").unwrap(), BitSize::B32);
        }
        assert_eq!(
            BitSize::for_host(Platform::MacOs, "aarch64").unwrap(),
            BitSize::B64
        );
    }

    #[test]
    fn test_bit_size_for_host_rejects_non_x86() {
        let hosts = [
            (Platform::Linux, "aarch64"),
            (Platform::Windows, "aarch64"),
            (Platform::Linux, "riscv64"),
            (Platform::Linux, "powerpc64"),
            (Platform::Linux, "arm"),
        ];
        for (platform, arch) in hosts {
            match BitSize::for_host(platform, arch) {
                Err(DistributionError::UnsupportedArchitecture(value)) => assert_eq!(value, arch),
                other => panic!("expected UnsupportedArchitecture for {}, got {:?}", arch, other),
            }
        }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[test]
    fn test_bit_size_detect_on_x86() {
        let detected = BitSize::detect().unwrap();
        assert_eq!(detected.bits(), usize::BITS);
    }

    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        all(target_os = "macos", target_arch = "aarch64")
    )))]
    #[test]
    fn test_bit_size_detect_fails_off_x86() {
        assert!(BitSize::detect().is_err());
        assert!(Distribution::detect(&PgVersion::V9_6).is_err());
    }

    #[test]
    fn test_archive_format_from_file_name() {
        assert_eq!(
            ArchiveFormat::from_file_name("postgresql-9.6.3-1-linux-x64-binaries.tar.gz").unwrap(),
            ArchiveFormat::TarGz
        );
        assert_eq!(
            ArchiveFormat::from_file_name("bundle.TGZ").unwrap(),
            ArchiveFormat::TarGz
        );
        assert_eq!(
            ArchiveFormat::from_file_name("postgresql-9.6.3-1-osx-binaries.zip").unwrap(),
            ArchiveFormat::Zip
        );
        assert!(matches!(
            ArchiveFormat::from_file_name("bundle.dmg"),
            Err(DistributionError::UnsupportedArchiveFormat(name)) if name == "bundle.dmg"
        ));
    }

    #[test]
    fn test_archive_format_from_str() {
        assert_eq!(".tar.gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!("zip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert!("tar.xz".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Postgres.command_name(), "postgres");
        assert_eq!(Command::InitDb.command_name(), "initdb");
        assert_eq!(Command::PgCtl.command_name(), "pg_ctl");
        assert_eq!(Command::all().len(), 7);
    }

    #[test]
    fn test_versions_in_download_path() {
        assert_eq!(PgVersion::V9_6.as_in_download_path(), "9.6.3-1");
        assert_eq!(PgVersion::PRODUCTION, PgVersion::V9_6);
        assert_eq!(CustomVersion::new("9.6.3").as_in_download_path(), "9.6.3");
    }

    #[test]
    fn test_distribution_new() {
        let dist = Distribution::new(&CustomVersion::new("9.6.3"), Platform::Linux, BitSize::B64);
        assert_eq!(dist.version, "9.6.3");
        assert_eq!(dist.to_string(), "9.6.3:Linux:64-bit");
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Platform::MacOs).unwrap(), "\"osx\"");
        assert_eq!(serde_json::to_string(&BitSize::B64).unwrap(), "\"64\"");
        assert_eq!(
            serde_json::from_str::<Command>("\"init_db\"").unwrap(),
            Command::InitDb
        );
    }
}
