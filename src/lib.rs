//! Check which published npm package versions satisfy a semver range.
//!
//! - [`version`]: registry access, npm range evaluation and version classification
//! - [`local`]: declared ranges and installed versions from the local project
//! - [`output`]: terminal formatting of the results
//! - [`command`]: wires the pieces together for the `whatver` binary
//! - [`config`]: configuration file and defaults
//! - [`logging`]: tracing subscriber setup

pub mod command;
pub mod config;
pub mod local;
pub mod logging;
pub mod output;
pub mod version;
