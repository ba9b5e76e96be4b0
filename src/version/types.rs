//! Query options and results of version resolution

/// One published version and whether it satisfies the active range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    pub satisfied: bool,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, satisfied: bool) -> Self {
        Self {
            version: version.into(),
            satisfied,
        }
    }
}

/// Options controlling which versions are listed and matched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// List prerelease versions and let them satisfy ranges
    pub show_prerelease: bool,
}
