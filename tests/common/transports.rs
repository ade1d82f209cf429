//! Instrumented collaborators
//!
//! `RecordingTransport` stands in for the network and remembers what it was
//! asked; `ForbiddenStore` fails the test on any filesystem access.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mocktree::{FixtureStore, RequestDescriptor, ResponseDescriptor, Result, Transport};
use parking_lot::Mutex;

/// Returns a fixed response and records each request
pub struct RecordingTransport {
    response: ResponseDescriptor,
    seen: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new(response: ResponseDescriptor) -> Arc<Self> {
        Arc::new(Self {
            response,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        self.seen
            .lock()
            .push(format!("{} {}", request.method, request.full_url()));
        Ok(self.response.clone())
    }
}

/// Panics on every filesystem operation
#[derive(Default)]
pub struct ForbiddenStore;

impl FixtureStore for ForbiddenStore {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        panic!("unexpected fixture read: {}", path.display());
    }

    fn exists(&self, path: &Path) -> bool {
        panic!("unexpected fixture probe: {}", path.display());
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        panic!("unexpected directory creation: {}", dir.display());
    }

    fn write(&self, path: &Path, _bytes: &[u8]) -> io::Result<()> {
        panic!("unexpected fixture write: {}", path.display());
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        panic!("unexpected fixture removal: {}", path.display());
    }
}
