//! Fixture tree helpers
//!
//! Builds mock roots in temporary directories so each test owns its
//! fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use mocktree::{encode, FixturePath, RequestDescriptor, ScopeOptions};
use tempfile::TempDir;

/// A temporary mock root
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn options(&self) -> ScopeOptions {
        ScopeOptions::rooted(self.root())
    }

    /// Write `contents` at a path relative to the root
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().expect("fixture has a parent"))
            .expect("Failed to create fixture directory");
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Write `contents` at the encoded path of `request`
    pub fn write_for(&self, request: &RequestDescriptor, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = encode(request);
        self.write(path.as_str(), contents)
    }

    pub fn path_of(&self, fixture: &FixturePath) -> PathBuf {
        fixture.under(self.root())
    }

    /// All files under the root, relative and `/`-separated, sorted
    pub fn files(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(self.root(), self.root(), &mut out);
        out.sort();
        out
    }
}

impl Default for FixtureTree {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
}
