//! Hand-off to a process launcher.
//!
//! These helpers write a [`LaunchConfig`] onto a caller-owned
//! [`std::process::Command`]. Nothing is spawned here.

use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

use crate::distribution::{ArtifactDescriptor, Command, BUNDLE_ROOT};

use super::config::LaunchConfig;

/// Location of the resolved executable below an extraction directory.
pub fn executable_path(extract_dir: &Path, artifact: &ArtifactDescriptor) -> PathBuf {
    extract_dir
        .join(BUNDLE_ROOT)
        .join(&artifact.in_archive_executable_path)
}

/// Applies arguments, environment and working directory for `command`.
pub fn apply_to_command(config: &LaunchConfig, command: Command, cmd: &mut process::Command) {
    let args = config.command_line(command);
    debug!("Prepared {} with {} arguments", command, args.len());

    cmd.args(args)
        .envs(config.environment())
        .current_dir(config.working_dir());
}

/// Builds a ready-to-spawn process from an extracted bundle.
///
/// Arguments are rendered for the command the artifact was resolved for, so
/// the executable and its command line always match.
pub fn prepare_command(
    extract_dir: &Path,
    artifact: &ArtifactDescriptor,
    config: &LaunchConfig,
) -> process::Command {
    let mut cmd = process::Command::new(executable_path(extract_dir, artifact));
    apply_to_command(config, artifact.command, &mut cmd);
    cmd
}
