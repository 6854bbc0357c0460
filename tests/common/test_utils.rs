//! Test utilities for temporary file handling

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// RAII wrapper for a temporary test directory
///
/// The directory and its contents are deleted when this struct is dropped
pub struct TempTestDir {
    dir: TempDir,
}

impl TempTestDir {
    /// Create a new temporary test directory
    pub fn new(test_name: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("panelclean_test_{}_", test_name))
            .tempdir()?;
        Ok(TempTestDir { dir })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file inside the directory and return its path
    pub fn write(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.file(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Read a file inside the directory
    pub fn read(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.file(name))
    }
}
