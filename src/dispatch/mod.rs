//! Scoped interception of outbound requests.
//!
//! A [`Dispatcher`] owns a stack of scopes. Each intercepted request is
//! routed according to the innermost scope only:
//!
//! | mode                    | behavior                                             |
//! |-------------------------|------------------------------------------------------|
//! | `Inactive` / no scope   | forwarded to the real transport                      |
//! | `MockLookup`            | served from a fixture, `RequestNotMocked` on a miss  |
//! | `NoNetworkSimulation`   | `NetworkDisabled`, no disk or network access         |
//! | `CaptureRecording`      | forwarded, then recorded as a fixture                |
//!
//! The stack belongs to the dispatcher, not the process: tests that run in
//! parallel each build their own dispatcher (or install one per task with
//! [`ambient::scope`]).
//!
//! Clones share one stack, and scopes on it must nest. Two scopes entered
//! concurrently on the same dispatcher (for example both arms of a
//! `tokio::join!`) interleave on that stack: whichever exits first pops
//! the other's frame too, and requests fall back to the enclosing mode.
//! Give each concurrent branch its own dispatcher instead. In debug builds
//! a guard that discards frames above its own logs a warning.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use mocktree::{Dispatcher, ReqwestTransport, RequestDescriptor, ScopeOptions};
//!
//! # async fn demo() -> mocktree::Result<()> {
//! let dispatcher = Dispatcher::new(Arc::new(ReqwestTransport::new()?));
//! let response = dispatcher
//!     .with_mock_api(ScopeOptions::rooted("tests/mocks"), async {
//!         let request = RequestDescriptor::get("https://api.example.com/users/show.json")?;
//!         dispatcher.intercept(&request).await
//!     })
//!     .await?;
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

pub mod ambient;
mod scope;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::encoder::encode;
use crate::error::{InterceptError, Result};
use crate::fixture::{FixtureLoader, ResponseRecorder};
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;
use crate::signal;
use crate::store::{DiskStore, FixtureStore};
use crate::transport::{ReqwestTransport, Transport};

pub use scope::{Mode, ScopeGuard, ScopeOptions};
use scope::ScopeStack;

/// Caller-owned interception context.
///
/// Clones share the same scope stack.
#[derive(Clone)]
pub struct Dispatcher {
    stack: Arc<ScopeStack>,
    transport: Arc<dyn Transport>,
    loader: FixtureLoader,
    recorder: ResponseRecorder,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_store(transport, Arc::new(DiskStore))
    }

    /// Dispatcher backed by a live `reqwest` client.
    pub fn live() -> Result<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_store(transport: Arc<dyn Transport>, store: Arc<dyn FixtureStore>) -> Self {
        Self {
            stack: Arc::new(ScopeStack::default()),
            transport,
            loader: FixtureLoader::new(Arc::clone(&store)),
            recorder: ResponseRecorder::new(store),
        }
    }

    pub fn enter(&self, mode: Mode, options: ScopeOptions) -> ScopeGuard {
        let id = self.stack.push(mode, options);
        tracing::debug!(%mode, depth = self.stack.depth(), "entered interception scope");
        ScopeGuard::new(Arc::clone(&self.stack), id, mode)
    }

    pub fn exit(&self, guard: ScopeGuard) {
        guard.exit();
        tracing::debug!(mode = %self.current_mode(), "restored interception scope");
    }

    /// Mode of the innermost scope; `Inactive` outside any scope.
    pub fn current_mode(&self) -> Mode {
        self.stack
            .top()
            .map(|(mode, _)| mode)
            .unwrap_or(Mode::Inactive)
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Run `f` inside a scope. The enclosing mode is restored however `f`
    /// finishes, including by panicking.
    pub fn scoped<T>(&self, mode: Mode, options: ScopeOptions, f: impl FnOnce() -> T) -> T {
        let _guard = self.enter(mode, options);
        f()
    }

    /// Async form of [`Dispatcher::scoped`].
    pub async fn scoped_async<F: Future>(
        &self,
        mode: Mode,
        options: ScopeOptions,
        fut: F,
    ) -> F::Output {
        let _guard = self.enter(mode, options);
        fut.await
    }

    pub async fn with_mock_api<F: Future>(&self, options: ScopeOptions, fut: F) -> F::Output {
        self.scoped_async(Mode::MockLookup, options, fut).await
    }

    pub async fn without_internet<F: Future>(&self, fut: F) -> F::Output {
        self.scoped_async(Mode::NoNetworkSimulation, ScopeOptions::default(), fut)
            .await
    }

    pub async fn capture_requests<F: Future>(&self, options: ScopeOptions, fut: F) -> F::Output {
        self.scoped_async(Mode::CaptureRecording, options, fut).await
    }

    /// Let requests reach the network inside an otherwise mocked region.
    pub async fn passthrough<F: Future>(&self, fut: F) -> F::Output {
        self.scoped_async(Mode::Inactive, ScopeOptions::default(), fut)
            .await
    }

    /// Route one request according to the innermost scope.
    pub async fn intercept(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        let Some((mode, options)) = self.stack.top() else {
            return self.transport.send(request).await;
        };

        match mode {
            Mode::Inactive => self.transport.send(request).await,
            Mode::NoNetworkSimulation => {
                tracing::debug!(method = %request.method, url = %request.full_url(), "network disabled");
                Err(signal::network_disabled(request))
            }
            Mode::MockLookup => {
                let keyed = options.redactor.rewrite_request(request.clone());
                let path = encode(&keyed);
                tracing::debug!(method = %request.method, url = %request.full_url(), %path, "looking up fixture");
                match self.loader.load(&options.mock_roots, &path) {
                    Ok(response) => Ok(response),
                    Err(InterceptError::FixtureNotFound { .. }) => {
                        Err(signal::not_mocked(request, path))
                    }
                    Err(err) => Err(err),
                }
            }
            Mode::CaptureRecording => {
                let response = self.transport.send(request).await?;
                let keyed = options.redactor.rewrite_request(request.clone());
                let path = encode(&keyed);
                self.recorder.record(
                    &options.mock_roots,
                    &path,
                    &response,
                    &options.record_policy(),
                )?;
                Ok(response)
            }
        }
    }
}

#[async_trait]
impl Transport for Dispatcher {
    async fn send(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor> {
        self.intercept(request).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.current_mode())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
