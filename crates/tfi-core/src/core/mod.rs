//! Internal implementation modules for `tfi-core`.

pub mod config;
pub mod info;
pub mod install;
pub mod net;
pub mod probe;
pub mod releases;
pub mod runtime;
pub mod tooling;

#[cfg(test)]
pub(crate) mod test_support;
