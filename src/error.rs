//! Error type for intercepted requests.

use std::path::PathBuf;

use crate::signal::RequestSignal;

/// Outcome of an intercepted call that did not produce a response.
///
/// Every variant is handed straight back to the caller; nothing in the
/// interception path logs an error and carries on.
#[derive(Debug, thiserror::Error)]
pub enum InterceptError {
    /// Mock lookup found no fixture for the request.
    #[error("request not mocked: {0}")]
    RequestNotMocked(RequestSignal),

    /// The active scope forbids network access.
    #[error("network disabled: {0}")]
    NetworkDisabled(RequestSignal),

    /// No fixture candidate exists under any mock root.
    #[error("fixture not found: {path}")]
    FixtureNotFound { path: String },

    /// A fixture file exists but is not a valid response.
    #[error("failed to decode fixture {}: {reason}", path.display())]
    FixtureDecode { path: PathBuf, reason: String },

    /// Capture could not persist a fixture.
    #[error("failed to write fixture {}: {source}", path.display())]
    RecordWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request URL could not be parsed.
    #[error("invalid request url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The real transport failed.
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    /// Configuration file error.
    #[error("configuration error: {0}")]
    Config(String),

    /// `ambient::intercept` was called outside `ambient::scope`.
    #[error("no dispatcher installed for the current task")]
    NoDispatcher,
}

impl InterceptError {
    /// The structured request description for the two "request not
    /// satisfied" variants.
    pub fn signal(&self) -> Option<&RequestSignal> {
        match self {
            InterceptError::RequestNotMocked(signal) | InterceptError::NetworkDisabled(signal) => {
                Some(signal)
            }
            _ => None,
        }
    }

    /// True for errors an assertion helper treats as "the request was
    /// attempted but not served".
    pub fn is_unsatisfied_request(&self) -> bool {
        self.signal().is_some()
    }
}

impl From<reqwest::Error> for InterceptError {
    fn from(err: reqwest::Error) -> Self {
        InterceptError::Transport(err.into())
    }
}

pub type Result<T, E = InterceptError> = std::result::Result<T, E>;
