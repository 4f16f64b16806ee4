//! Distribution resolution for PostgreSQL binary bundles.
//!
//! Given a version, platform, bit size and bundled command, this module works
//! out which archive to download and where the executable lives inside it.
//! No I/O is performed; every call can be repeated with identical results.
//!
//! # Architecture
//!
//! - `types`: Core types (Platform, BitSize, ArchiveFormat, Command, Version, Distribution)
//! - `resolver`: Archive name, format and in-archive path resolution
//!
//! # Example
//!
//! ```
//! use pgembed_core::distribution::{BitSize, Command, Distribution, PackageResolver, Platform, PgVersion};
//!
//! let distribution = Distribution::new(&PgVersion::V9_6, Platform::Linux, BitSize::B64);
//! let artifact = PackageResolver::new(Command::InitDb).resolve(&distribution);
//!
//! assert_eq!(artifact.archive_path_fragment, "postgresql-9.6.3-1-linux-x64-binaries.tar.gz");
//! assert_eq!(artifact.in_archive_executable_path, "bin/initdb");
//! ```

pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use resolver::{
    arch_suffix, archive_format, archive_path_fragment, executable_file_name,
    in_archive_executable_path, ArtifactDescriptor, PackageResolver, BUNDLE_ROOT,
    DEFAULT_DOWNLOAD_BASE,
};
pub use types::{
    ArchiveFormat, BitSize, Command, CustomVersion, Distribution, DistributionError, PgVersion,
    Platform, Version,
};
