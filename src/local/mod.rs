//! Local project context
//!
//! Looks up the range a project declares for a package in its package.json
//! and the version installed under node_modules. Both lookups are
//! synchronous and independent of the registry.

pub mod manifest;

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use manifest::{DependencyKind, LocalProjectManifest};

const MANIFEST_FILE: &str = "package.json";
const MODULES_DIR: &str = "node_modules";

#[derive(Debug, Error)]
pub enum LocalError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid package.json at {}: {source}", path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package '{0}' not found in package.json")]
    NotDeclared(String),
}

/// Range declared for `package_name` in `./package.json`
pub fn local_declared_range(package_name: &str) -> Result<String, LocalError> {
    declared_range_in(&current_dir()?, package_name)
}

/// Version of `package_name` installed under `./node_modules`
pub fn local_installed_version(package_name: &str) -> Result<String, LocalError> {
    installed_version_in(&current_dir()?, package_name)
}

/// Range declared for `package_name` in `<project_dir>/package.json`
pub fn declared_range_in(project_dir: &Path, package_name: &str) -> Result<String, LocalError> {
    let manifest = read_manifest(&project_dir.join(MANIFEST_FILE))?;

    let (kind, range) = manifest
        .declared_range(package_name)
        .ok_or_else(|| LocalError::NotDeclared(package_name.to_string()))?;

    debug!(
        "{} declared as {} in {}",
        package_name,
        range,
        kind.field_name()
    );
    Ok(range.to_string())
}

/// Version of `package_name` installed under `<project_dir>/node_modules`
pub fn installed_version_in(project_dir: &Path, package_name: &str) -> Result<String, LocalError> {
    let manifest = read_manifest(&installed_manifest_path(project_dir, package_name))?;
    Ok(manifest.version)
}

/// Path of an installed package's manifest; `@scope/name` spans two directories
pub fn installed_manifest_path(project_dir: &Path, package_name: &str) -> PathBuf {
    package_name
        .split('/')
        .fold(project_dir.join(MODULES_DIR), |path, segment| {
            path.join(segment)
        })
        .join(MANIFEST_FILE)
}

/// Run a local lookup, treating any failure as "no information"
pub fn try_or_none<T, E, F>(lookup: F) -> Option<T>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match lookup() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring local lookup failure: {}", e);
            None
        }
    }
}

fn read_manifest(path: &Path) -> Result<LocalProjectManifest, LocalError> {
    let content = fs::read_to_string(path).map_err(|source| LocalError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LocalError::InvalidManifest {
        path: path.to_path_buf(),
        source,
    })
}

fn current_dir() -> Result<PathBuf, LocalError> {
    std::env::current_dir().map_err(|source| LocalError::Io {
        path: PathBuf::from("."),
        source,
    })
}
