use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub mod dataset;
pub mod synthetic;

pub use dataset::Acquirer;
pub use dataset::Fetch;
pub use dataset::HttpFetcher;
pub use synthetic::ensure_complete_graph;

/// Outcome of an operation that creates a graph file only if it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// The file existed already and was left untouched.
    Present,
    /// The file has been written by this call.
    Created,
}

impl Materialized {
    pub fn created(&self) -> bool {
        matches!(self, Materialized::Created)
    }
}

/// Graph files are written to this path first and renamed to `target` once
/// complete, so that `target` only ever exists with its full content.
pub(crate) fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map_or_else(OsString::new, |name| name.to_os_string());
    name.push(".part");
    target.with_file_name(name)
}
