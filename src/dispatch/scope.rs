use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::fixture::RecordPolicy;
use crate::redact::Redactor;

/// Interception mode of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Requests go to the real transport untouched.
    Inactive,
    /// Requests are answered from fixtures.
    MockLookup,
    /// Requests fail immediately without touching disk or network.
    NoNetworkSimulation,
    /// Requests go to the real transport and responses are saved as fixtures.
    CaptureRecording,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Inactive => "inactive",
            Mode::MockLookup => "mock",
            Mode::NoNetworkSimulation => "no-network",
            Mode::CaptureRecording => "capture",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scope settings.
#[derive(Debug, Clone)]
pub struct ScopeOptions {
    /// Searched in order for fixtures; the first usable one receives
    /// captured fixtures.
    pub mock_roots: Vec<PathBuf>,
    /// Store 200 responses of recognized media types as bare bodies.
    pub simplify: bool,
    /// Replace existing fixtures when capturing.
    pub overwrite: bool,
    pub redactor: Redactor,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            mock_roots: vec![PathBuf::from("tests/mocks")],
            simplify: true,
            overwrite: true,
            redactor: Redactor::default(),
        }
    }
}

impl ScopeOptions {
    /// Options with a single mock root.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self::default().with_roots(vec![root.into()])
    }

    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.mock_roots = roots;
        self
    }

    /// Search `root` before the existing roots.
    pub fn prepend_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.mock_roots.insert(0, root.into());
        self
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub fn record_policy(&self) -> RecordPolicy {
        RecordPolicy {
            simplify: self.simplify,
            overwrite: self.overwrite,
            redactor: self.redactor.clone(),
        }
    }
}

#[derive(Debug)]
struct Frame {
    id: u64,
    mode: Mode,
    options: Arc<ScopeOptions>,
}

/// Stack of active scopes; the last frame is current.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    frames: Mutex<Vec<Frame>>,
    next_id: AtomicU64,
}

impl ScopeStack {
    pub(crate) fn push(&self, mode: Mode, options: ScopeOptions) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.frames.lock().push(Frame {
            id,
            mode,
            options: Arc::new(options),
        });
        id
    }

    /// Pop frames down to and including `id`. Returns how many frames
    /// above it were discarded with it, or `None` when the frame was
    /// already gone.
    pub(crate) fn pop_through(&self, id: u64) -> Option<usize> {
        let mut frames = self.frames.lock();
        let pos = frames.iter().rposition(|f| f.id == id)?;
        let discarded = frames.len() - pos - 1;
        frames.truncate(pos);
        Some(discarded)
    }

    pub(crate) fn top(&self) -> Option<(Mode, Arc<ScopeOptions>)> {
        self.frames
            .lock()
            .last()
            .map(|f| (f.mode, Arc::clone(&f.options)))
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.lock().len()
    }
}

/// Keeps a scope active. Dropping it (including during unwinding) restores
/// the enclosing mode.
#[must_use = "the scope ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
    stack: Arc<ScopeStack>,
    id: u64,
    mode: Mode,
}

impl ScopeGuard {
    pub(crate) fn new(stack: Arc<ScopeStack>, id: u64, mode: Mode) -> Self {
        Self { stack, id, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// End the scope now.
    pub fn exit(self) {}
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        match self.stack.pop_through(self.id) {
            None => {
                tracing::debug!(mode = %self.mode, "scope already exited by an enclosing scope");
            }
            Some(discarded) if discarded > 0 && cfg!(debug_assertions) => {
                tracing::warn!(
                    mode = %self.mode,
                    discarded,
                    "scope exited while inner scopes were still active"
                );
            }
            Some(_) => {}
        }
    }
}
