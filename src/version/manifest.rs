//! Typed views of npm registry documents
//!
//! Registry responses are untrusted JSON. They are decoded into the structs
//! below through [`validate`], which yields either the typed document or a
//! [`ValidationError`] naming what did not match.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Abbreviated package document (`application/vnd.npm.install-v1+json`)
///
/// Only the keys of `versions` are used. Key order follows the response body.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryManifest {
    pub versions: IndexMap<String, serde_json::Value>,
}

impl RegistryManifest {
    /// Version identifiers in registry order
    pub fn into_versions(self) -> Vec<String> {
        self.versions.into_keys().collect()
    }
}

/// Full metadata of a single published version (`/<name>/latest`)
///
/// Only `name`, `_id` and `dist` are required. The display fields are read
/// when they have the usual shape and dropped otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackumentVersion {
    pub name: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<Repository>,
    pub dist: Dist,
}

/// `repository` is either a bare URL or a `{ type, url }` object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Url(String),
    Detailed {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        url: String,
    },
}

impl Repository {
    pub fn url(&self) -> &str {
        match self {
            Repository::Url(url) | Repository::Detailed { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dist {
    pub shasum: String,
    pub tarball: String,
    /// Registry signatures, kept as published
    pub signatures: Vec<serde_json::Value>,
}

/// Any JSON value, kept only if it decodes as `T`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A registry document did not have the expected shape
#[derive(Debug, thiserror::Error)]
#[error("{document}: {source}")]
pub struct ValidationError {
    document: &'static str,
    #[source]
    source: serde_json::Error,
}

impl ValidationError {
    /// Name of the document type that failed validation
    pub fn document(&self) -> &'static str {
        self.document
    }
}

/// Documents that can be checked with [`validate`]
pub trait Document: DeserializeOwned {
    const NAME: &'static str;
}

impl Document for RegistryManifest {
    const NAME: &'static str = "registry manifest";
}

impl Document for PackumentVersion {
    const NAME: &'static str = "packument version";
}

/// Check an untrusted JSON value against a document schema
pub fn validate<T: Document>(value: serde_json::Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|source| ValidationError {
        document: T::NAME,
        source,
    })
}
