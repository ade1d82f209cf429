//! Deterministic HTTP testing without a live network.
//!
//! Requests are intercepted by a [`Dispatcher`] and, depending on the
//! innermost active scope, served from a fixture tree, rejected as "no
//! network", forwarded and recorded, or passed through untouched. Fixture
//! paths are derived from the request alone (see [`encoder`]), so the
//! fixture directory reads like a map of the API.

pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod fixture;
pub mod media;
pub mod redact;
pub mod request;
pub mod response;
pub mod signal;
pub mod store;
pub mod transport;

pub use config::Config;
pub use dispatch::{ambient, Dispatcher, Mode, ScopeGuard, ScopeOptions};
pub use encoder::{encode, FixturePath};
pub use error::{InterceptError, Result};
pub use fixture::{Fixture, FixtureLoader, RecordPolicy, ResponseRecorder};
pub use media::MediaType;
pub use redact::Redactor;
pub use request::{Method, RequestDescriptor};
pub use response::{Headers, ResponseDescriptor};
pub use signal::{RequestSignal, SignalKind};
pub use store::{DiskStore, FixtureStore};
pub use transport::{ReqwestTransport, Transport};
