//! Registry trait for fetching package metadata

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::manifest::PackumentVersion;

/// Read access to a package registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every published version identifier of a package
    ///
    /// # Arguments
    /// * `package_name` - The package name, optionally scoped (e.g., "@types/node")
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Version keys in the order the registry returned them
    /// * `Err(RegistryError)` - If the package is unknown or the fetch fails
    async fn fetch_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError>;

    /// Fetches the metadata of the version tagged `latest`
    async fn fetch_latest(&self, package_name: &str) -> Result<PackumentVersion, RegistryError>;
}
