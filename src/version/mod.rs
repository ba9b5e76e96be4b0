//! Version resolution layer
//!
//! Fetches published versions of npm packages and classifies them against
//! npm semver ranges.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Resolver   │────▶│   Records   │
//! │  (fetch)    │     │ (sort/filter│     │ (satisfied?)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Manifest   │     │    Range    │
//! │ (validate)  │     │ (npm semver)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for fetching versions from remote sources
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`manifest`]: Typed registry documents and their validation
//! - [`range`]: npm range parsing and satisfaction
//! - [`resolver`]: Sorting, prerelease filtering and classification
//! - [`error`]: Error types for registry and resolution failures
//! - [`types`]: Query options and version records

pub mod error;
pub mod manifest;
pub mod range;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod types;

pub use error::{FetchError, RegistryError, ResolveError};
pub use registry::Registry;
pub use resolver::{fetch_package_info, fetch_versions, resolve_versions, satisfied_versions};
pub use types::{QueryOptions, VersionRecord};
