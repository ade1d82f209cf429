use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::encoder::FixturePath;
use crate::error::{InterceptError, Result};
use crate::fixture::format::Fixture;
use crate::fixture::loader::candidates;
use crate::redact::Redactor;
use crate::response::ResponseDescriptor;
use crate::store::FixtureStore;

/// How a captured response is persisted.
#[derive(Debug, Clone)]
pub struct RecordPolicy {
    pub simplify: bool,
    pub overwrite: bool,
    pub redactor: Redactor,
}

impl Default for RecordPolicy {
    fn default() -> Self {
        Self {
            simplify: true,
            overwrite: true,
            redactor: Redactor::default(),
        }
    }
}

/// Writes captured responses into the first usable mock root.
#[derive(Clone)]
pub struct ResponseRecorder {
    store: Arc<dyn FixtureStore>,
}

impl ResponseRecorder {
    pub fn new(store: Arc<dyn FixtureStore>) -> Self {
        Self { store }
    }

    /// The first root that exists or can be created as a directory.
    fn writable_root(&self, roots: &[PathBuf]) -> Result<PathBuf> {
        let mut last_err = None;
        for root in roots {
            match self.store.ensure_dir(root) {
                Ok(()) => return Ok(root.clone()),
                Err(err) => {
                    tracing::warn!(
                        root = %root.display(),
                        error = %err,
                        "mock root is not writable"
                    );
                    last_err = Some((root.clone(), err));
                }
            }
        }
        let (path, source) = last_err.unwrap_or_else(|| {
            (
                PathBuf::new(),
                io::Error::new(io::ErrorKind::NotFound, "no mock roots configured"),
            )
        });
        Err(InterceptError::RecordWrite { path, source })
    }

    /// Persist `response` as the fixture for `path`. Returns the file
    /// written, or the existing file when overwriting is disabled.
    ///
    /// A request has at most one fixture per root: overwriting removes the
    /// request's fixtures in other formats, and with overwriting disabled
    /// a fixture in any format counts as existing.
    pub fn record(
        &self,
        roots: &[PathBuf],
        path: &FixturePath,
        response: &ResponseDescriptor,
        policy: &RecordPolicy,
    ) -> Result<PathBuf> {
        let root = self.writable_root(roots)?;
        let siblings: Vec<PathBuf> = candidates(path).iter().map(|c| c.under(&root)).collect();

        if !policy.overwrite {
            if let Some(existing) = siblings.iter().find(|p| self.store.exists(p)) {
                tracing::debug!(fixture = %existing.display(), "fixture exists, not overwriting");
                return Ok(existing.clone());
            }
        }

        let redacted = policy.redactor.redact_response(response);
        let fixture = Fixture::for_response(&redacted, policy.simplify);
        let target = path.with_extension(fixture.extension()).under(&root);

        let bytes = fixture
            .to_bytes()
            .map_err(|e| InterceptError::RecordWrite {
                path: target.clone(),
                source: io::Error::other(e),
            })?;
        self.store
            .write(&target, &bytes)
            .map_err(|source| InterceptError::RecordWrite {
                path: target.clone(),
                source,
            })?;

        for stale in siblings.iter().filter(|p| **p != target) {
            self.store
                .remove(stale)
                .map_err(|source| InterceptError::RecordWrite {
                    path: stale.clone(),
                    source,
                })?;
        }

        tracing::info!(
            fixture = %target.display(),
            status = response.status,
            bytes = bytes.len(),
            "recorded fixture"
        );
        Ok(target)
    }
}
