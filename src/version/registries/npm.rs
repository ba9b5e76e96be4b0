//! npm registry API implementation

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::version::error::RegistryError;
use crate::version::manifest::{self, Document, PackumentVersion, RegistryManifest};
use crate::version::registry::Registry;

/// Default base URL for npm registry
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Abbreviated metadata, see
/// https://github.com/npm/registry/blob/main/docs/responses/package-metadata.md
const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

/// Registry implementation for npm registry API
#[derive(Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("whatver/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }

    async fn get_document<T: Document>(
        &self,
        package_name: &str,
        url: &str,
        accept: Option<&str>,
    ) -> Result<T, RegistryError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }
        let response = request.send().await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: serde_json::Value = response.json().await?;

        manifest::validate(body).map_err(|e| {
            warn!("Unexpected npm registry response from {}: {}", url, e);
            RegistryError::InvalidResponse(e)
        })
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_versions(&self, package_name: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            Self::encode_package_name(package_name)
        );

        let manifest: RegistryManifest = self
            .get_document(package_name, &url, Some(ABBREVIATED_METADATA))
            .await?;

        Ok(manifest.into_versions())
    }

    async fn fetch_latest(&self, package_name: &str) -> Result<PackumentVersion, RegistryError> {
        let url = format!(
            "{}/{}/latest",
            self.base_url,
            Self::encode_package_name(package_name)
        );

        self.get_document(package_name, &url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_versions_returns_keys_in_registry_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .match_header("accept", ABBREVIATED_METADATA)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "lodash",
                    "versions": {
                        "4.17.21": {},
                        "4.17.19": {},
                        "4.17.20": {}
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_versions("lodash").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["4.17.21", "4.17.19", "4.17.20"]);
    }

    #[tokio::test]
    async fn fetch_versions_returns_not_found_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_versions("nonexistent-package").await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::NotFound(ref name)) if name == "nonexistent-package"
        ));
    }

    #[tokio::test]
    async fn fetch_versions_reports_server_errors_with_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/test-package")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let err = registry.fetch_versions("test-package").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RegistryError::Status { status: 500, .. }));
        assert_eq!(err.to_string(), "500 Internal Server Error");
    }

    #[tokio::test]
    async fn fetch_versions_handles_scoped_package() {
        let mut server = Server::new_async().await;

        // Scoped packages use URL encoding: @types/node -> @types%2Fnode
        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "@types/node", "versions": {"20.0.0": {}, "18.0.0": {}}}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_versions("@types/node").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["20.0.0", "18.0.0"]);
    }

    #[tokio::test]
    async fn fetch_versions_rejects_response_without_versions() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/invalid-package")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "invalid-package"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let err = registry.fetch_versions("invalid-package").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, RegistryError::InvalidResponse(_)));
        assert_eq!(err.to_string(), "Invalid npm registry response format");
    }

    #[tokio::test]
    async fn fetch_versions_reports_non_json_body_as_network_error() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/html-package")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let err = registry.fetch_versions("html-package").await.unwrap_err();

        assert!(matches!(err, RegistryError::Network(_)));
    }

    #[tokio::test]
    async fn fetch_latest_returns_latest_version_metadata() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "lodash",
                    "_id": "lodash@4.17.21",
                    "version": "4.17.21",
                    "homepage": "https://lodash.com/",
                    "dist": {
                        "shasum": "679591c564c3bffaae8454cf0b3df370c3d6911c",
                        "tarball": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz",
                        "signatures": []
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let info = registry.fetch_latest("lodash").await.unwrap();

        mock.assert_async().await;
        assert_eq!(info.name, "lodash");
        assert_eq!(info.homepage.as_deref(), Some("https://lodash.com/"));
    }

    #[tokio::test]
    async fn fetch_latest_rejects_document_without_dist() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/broken/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "broken", "_id": "broken@1.0.0"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let err = registry.fetch_latest("broken").await.unwrap_err();

        assert!(matches!(err, RegistryError::InvalidResponse(_)));
    }

    #[test]
    fn new_trims_trailing_slash_from_base_url() {
        let registry = NpmRegistry::new("https://registry.example.com/");
        assert_eq!(registry.base_url, "https://registry.example.com");
    }
}
