//! Registry test utilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use whatver::version::error::RegistryError;
use whatver::version::manifest::{Dist, PackumentVersion};
use whatver::version::registry::Registry;

/// In-memory registry for testing
#[derive(Default)]
pub struct FakeRegistry {
    versions: HashMap<String, Vec<String>>,
    fetches: AtomicUsize,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, package: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Number of version list requests served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn fetch_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.versions.get(package_name) {
            Some(versions) => Ok(versions.clone()),
            None => Err(RegistryError::NotFound(package_name.to_string())),
        }
    }

    async fn fetch_latest(&self, package_name: &str) -> Result<PackumentVersion, RegistryError> {
        if !self.versions.contains_key(package_name) {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }
        Ok(PackumentVersion {
            name: package_name.to_string(),
            id: format!("{package_name}@latest"),
            version: None,
            description: None,
            homepage: None,
            repository: None,
            dist: Dist {
                shasum: String::new(),
                tarball: String::new(),
                signatures: Vec::new(),
            },
        })
    }
}

/// Registry body with the given version keys
pub fn versions_body(versions: &[&str]) -> String {
    let entries: Vec<String> = versions.iter().map(|v| format!("\"{v}\": {{}}")).collect();
    format!("{{\"versions\": {{{}}}}}", entries.join(", "))
}
