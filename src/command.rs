//! The `whatver` query: registry results combined with local project context

use std::path::Path;

use tracing::debug;

use crate::local::{self, try_or_none};
use crate::output::{self, Palette};
use crate::version::registry::Registry;
use crate::version::{
    QueryOptions, ResolveError, fetch_package_info, resolve_versions, satisfied_versions,
};

/// What the user asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub package: String,
    /// Range given on the command line
    pub range: Option<String>,
    /// List every version instead of only satisfying ones
    pub all: bool,
    pub show_prerelease: bool,
}

/// What the local project knows about the queried package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalContext {
    pub range: Option<String>,
    pub installed_version: Option<String>,
}

impl LocalContext {
    /// Look the package up in the current directory
    pub fn from_current_dir(package_name: &str) -> Self {
        Self {
            range: try_or_none(|| local::local_declared_range(package_name)),
            installed_version: try_or_none(|| local::local_installed_version(package_name)),
        }
    }

    /// Look the package up in `project_dir`
    pub fn from_dir(project_dir: &Path, package_name: &str) -> Self {
        Self {
            range: try_or_none(|| local::declared_range_in(project_dir, package_name)),
            installed_version: try_or_none(|| {
                local::installed_version_in(project_dir, package_name)
            }),
        }
    }

    fn is_empty(&self) -> bool {
        self.range.is_none() && self.installed_version.is_none()
    }
}

/// How the report is rendered
#[derive(Debug, Clone, Copy)]
pub struct Rendering {
    pub palette: Palette,
    pub width: usize,
}

/// Run a query and render the report
///
/// The range from package.json is used when none was given. Without any
/// range every version is listed.
pub async fn run<R: Registry + ?Sized>(
    registry: &R,
    query: &Query,
    local: &LocalContext,
    rendering: Rendering,
) -> Result<String, ResolveError> {
    let Rendering { palette, width } = rendering;
    let package = query.package.as_str();

    let info = fetch_package_info(registry, package).await?;

    let mut report = vec![output::format_package_info(palette, &info)];
    if !local.is_empty() {
        report.push(output::format_local_info(
            palette,
            package,
            local.range.as_deref(),
            local.installed_version.as_deref(),
        ));
    }

    let explicit_range = non_blank(query.range.as_deref());
    let effective_range = explicit_range.or(non_blank(local.range.as_deref()));
    let local_range = explicit_range.is_none();
    let options = QueryOptions {
        show_prerelease: query.show_prerelease,
    };
    let is_installed = |version: &str| local.installed_version.as_deref() == Some(version);

    match effective_range {
        Some(range) if !query.all => {
            debug!("Listing versions of {} satisfying {}", package, range);
            let versions = satisfied_versions(registry, package, range, options).await?;
            if versions.is_empty() {
                report.push(palette.error(&format!("No versions found for range: {range}")));
                return Ok(join(report));
            }
            let cells: Vec<_> = versions
                .iter()
                .map(|v| output::format_version(palette, v, is_installed(v), true, local_range))
                .collect();
            report.push(output::columns(&cells, width));
        }
        _ => {
            debug!("Listing all versions of {}", package);
            let records = resolve_versions(registry, package, effective_range, options).await?;
            if records.is_empty() {
                report.push(palette.error("No versions found"));
                return Ok(join(report));
            }
            let cells: Vec<_> = records
                .iter()
                .map(|r| {
                    output::format_version(
                        palette,
                        &r.version,
                        is_installed(&r.version),
                        r.satisfied,
                        local_range,
                    )
                })
                .collect();
            report.push(output::columns(&cells, width));
        }
    }

    Ok(join(report))
}

fn non_blank(range: Option<&str>) -> Option<&str> {
    range.filter(|range| !range.trim().is_empty())
}

fn join(lines: Vec<String>) -> String {
    let mut report = lines
        .into_iter()
        .map(|line| line.trim_end_matches('\n').to_string())
        .collect::<Vec<_>>()
        .join("\n");
    report.push('\n');
    report
}
