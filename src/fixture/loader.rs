use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::encoder::FixturePath;
use crate::error::{InterceptError, Result};
use crate::fixture::format::{Fixture, FULL_DESCRIPTOR_EXTENSION};
use crate::media::MediaType;
use crate::response::ResponseDescriptor;
use crate::store::FixtureStore;

/// Candidate files for an encoded path, in probe order: the encoded path
/// itself, the remaining simplified media types, then the full descriptor.
pub fn candidates(path: &FixturePath) -> Vec<FixturePath> {
    let mut out = vec![path.clone()];
    for media in MediaType::ALL {
        let candidate = path.with_extension(media.extension());
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out.push(path.with_extension(FULL_DESCRIPTOR_EXTENSION));
    out
}

/// Resolves encoded paths to responses under an ordered list of roots.
#[derive(Clone)]
pub struct FixtureLoader {
    store: Arc<dyn FixtureStore>,
}

impl FixtureLoader {
    pub fn new(store: Arc<dyn FixtureStore>) -> Self {
        Self { store }
    }

    /// Locate the fixture file for `path`. Roots are searched in order and
    /// every candidate is tried within a root before moving on.
    pub fn find(&self, roots: &[PathBuf], path: &FixturePath) -> Result<Option<(PathBuf, Vec<u8>)>> {
        let candidates = candidates(path);
        for root in roots {
            for candidate in &candidates {
                let file = candidate.under(root);
                let bytes = self
                    .store
                    .read(&file)
                    .map_err(|e| InterceptError::FixtureDecode {
                        path: file.clone(),
                        reason: e.to_string(),
                    })?;
                if let Some(bytes) = bytes {
                    return Ok(Some((file, bytes)));
                }
            }
        }
        Ok(None)
    }

    pub fn load(&self, roots: &[PathBuf], path: &FixturePath) -> Result<ResponseDescriptor> {
        match self.find(roots, path)? {
            Some((file, bytes)) => {
                tracing::debug!(fixture = %file.display(), "serving fixture");
                Ok(Fixture::decode(&file, bytes)?.into_response())
            }
            None => Err(InterceptError::FixtureNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Single-root convenience form of [`FixtureLoader::load`].
    pub fn load_from(&self, root: &Path, path: &FixturePath) -> Result<ResponseDescriptor> {
        self.load(&[root.to_path_buf()], path)
    }
}
