//! Ordered list of directories searched for loadable proximity modules.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dir` at the lowest priority. Duplicates are kept and the directory
    /// does not have to exist yet.
    pub fn append(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        info!("Appending {} to search path", dir.display());
        self.entries.push(dir);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn contains(&self, dir: impl AsRef<Path>) -> bool {
        self.entries.iter().any(|entry| entry == dir.as_ref())
    }

    /// First entry, in order, that holds `name`.
    pub fn resolve(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
        self.entries
            .iter()
            .map(|entry| entry.join(name.as_ref()))
            .find(|candidate| candidate.exists())
    }

    /// Platform path-list form (`:`-separated on Unix).
    pub fn to_os_string(&self) -> Result<OsString, AppError> {
        std::env::join_paths(&self.entries).map_err(|e| AppError::SearchPathError(e.to_string()))
    }
}
