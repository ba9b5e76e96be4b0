//! package.json model

use std::collections::HashMap;

use serde::Deserialize;

/// The parts of a package.json used for local lookups
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalProjectManifest {
    pub version: String,
    #[serde(default)]
    pub dependencies: Option<HashMap<String, String>>,
    #[serde(default)]
    pub dev_dependencies: Option<HashMap<String, String>>,
    #[serde(default)]
    pub peer_dependencies: Option<HashMap<String, String>>,
    #[serde(default)]
    pub optional_dependencies: Option<HashMap<String, String>>,
}

/// Dependency categories in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Runtime,
    Development,
    Peer,
    Optional,
}

impl DependencyKind {
    pub const SEARCH_ORDER: [DependencyKind; 4] = [
        DependencyKind::Runtime,
        DependencyKind::Development,
        DependencyKind::Peer,
        DependencyKind::Optional,
    ];

    /// Field name in package.json
    pub fn field_name(self) -> &'static str {
        match self {
            DependencyKind::Runtime => "dependencies",
            DependencyKind::Development => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
            DependencyKind::Optional => "optionalDependencies",
        }
    }
}

impl LocalProjectManifest {
    pub fn dependencies_of(&self, kind: DependencyKind) -> Option<&HashMap<String, String>> {
        match kind {
            DependencyKind::Runtime => self.dependencies.as_ref(),
            DependencyKind::Development => self.dev_dependencies.as_ref(),
            DependencyKind::Peer => self.peer_dependencies.as_ref(),
            DependencyKind::Optional => self.optional_dependencies.as_ref(),
        }
    }

    /// Find the declared range of a package, first category wins
    ///
    /// Empty declarations are skipped.
    pub fn declared_range(&self, package_name: &str) -> Option<(DependencyKind, &str)> {
        DependencyKind::SEARCH_ORDER.into_iter().find_map(|kind| {
            self.dependencies_of(kind)?
                .get(package_name)
                .filter(|range| !range.is_empty())
                .map(|range| (kind, range.as_str()))
        })
    }
}
