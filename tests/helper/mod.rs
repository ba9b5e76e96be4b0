//! Shared test utilities

mod registry;

#[allow(unused_imports)]
pub use registry::*;
