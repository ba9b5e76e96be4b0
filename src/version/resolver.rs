//! Version resolution and classification
//!
//! Fetches the published versions of a package, orders them by semver
//! precedence, applies the prerelease policy and marks which versions
//! satisfy a range.

use semver::Version;
use tracing::{debug, warn};

use crate::version::error::{FetchError, ResolveError};
use crate::version::manifest::PackumentVersion;
use crate::version::range::NpmRange;
use crate::version::registry::Registry;
use crate::version::types::{QueryOptions, VersionRecord};

/// Fetch every published version identifier of a package
pub async fn fetch_versions<R: Registry + ?Sized>(
    registry: &R,
    package_name: &str,
) -> Result<Vec<String>, FetchError> {
    registry
        .fetch_versions(package_name)
        .await
        .map_err(FetchError::Versions)
}

/// Fetch the metadata of the latest published version
pub async fn fetch_package_info<R: Registry + ?Sized>(
    registry: &R,
    package_name: &str,
) -> Result<PackumentVersion, FetchError> {
    registry
        .fetch_latest(package_name)
        .await
        .map_err(FetchError::Info)
}

/// List versions in ascending order and whether each satisfies `range`
///
/// The range is validated before the registry is contacted. Without a range,
/// or with a blank one, every record is unsatisfied.
pub async fn resolve_versions<R: Registry + ?Sized>(
    registry: &R,
    package_name: &str,
    range: Option<&str>,
    options: QueryOptions,
) -> Result<Vec<VersionRecord>, ResolveError> {
    let range = range
        .filter(|range| !range.trim().is_empty())
        .map(parse_range)
        .transpose()?;

    let versions = fetch_versions(registry, package_name).await?;
    debug!("{} published versions of {}", versions.len(), package_name);

    Ok(classify(versions, range.as_ref(), options))
}

/// List only the versions that satisfy `range`
pub async fn satisfied_versions<R: Registry + ?Sized>(
    registry: &R,
    package_name: &str,
    range: &str,
    options: QueryOptions,
) -> Result<Vec<String>, ResolveError> {
    if range.trim().is_empty() {
        return Err(ResolveError::MissingRange);
    }

    let records = resolve_versions(registry, package_name, Some(range), options).await?;

    Ok(records
        .into_iter()
        .filter(|record| record.satisfied)
        .map(|record| record.version)
        .collect())
}

fn parse_range(range: &str) -> Result<NpmRange, ResolveError> {
    NpmRange::parse(range).map_err(|source| ResolveError::InvalidRange {
        range: range.to_string(),
        source,
    })
}

/// Sort, filter and classify raw version identifiers
fn classify(
    versions: Vec<String>,
    range: Option<&NpmRange>,
    options: QueryOptions,
) -> Vec<VersionRecord> {
    let mut parsed: Vec<(String, Version)> = versions
        .into_iter()
        .filter_map(|v| match Version::parse(&v) {
            Ok(parsed) => Some((v, parsed)),
            Err(e) => {
                warn!("Skipping unparseable version {:?}: {}", v, e);
                None
            }
        })
        .collect();

    // Stable, so equal precedence keeps registry order
    parsed.sort_by(|(_, a), (_, b)| a.cmp_precedence(b));

    parsed
        .into_iter()
        .filter(|(_, version)| options.show_prerelease || version.pre.is_empty())
        .map(|(raw, version)| {
            let satisfied = range
                .is_some_and(|range| range.satisfies(&version, options.show_prerelease));
            VersionRecord::new(raw, satisfied)
        })
        .collect()
}
