//! Blob store — where audio bytes come from, keyed by file name.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// A read-only source of file contents by name.
pub trait BlobStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Files under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for DirectoryStore {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(name))
    }
}

impl BlobStore for HashMap<String, Vec<u8>> {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no blob named '{name}'")))
    }
}
