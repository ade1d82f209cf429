//! Uniform "request not satisfied" errors.
//!
//! Both unmocked requests and requests made while the network is disabled
//! render as `<METHOD> <url>[ <detail>]`, so helpers that pull the method,
//! URL and body out of one also work on the other.

use std::fmt;

use crate::encoder::FixturePath;
use crate::error::InterceptError;
use crate::request::{Method, RequestDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    NotMocked,
    NetworkDisabled,
}

/// What was attempted, in a shape assertion helpers can match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignal {
    pub kind: SignalKind,
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub probed_path: Option<FixturePath>,
}

impl RequestSignal {
    /// Trailing part of the message: the probed path in parentheses for an
    /// unmocked request, the body for a disabled network.
    pub fn detail(&self) -> Option<String> {
        match self.kind {
            SignalKind::NotMocked => self.probed_path.as_ref().map(|p| format!("({p})")),
            SignalKind::NetworkDisabled => self.body.clone(),
        }
    }
}

impl fmt::Display for RequestSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if let Some(detail) = self.detail() {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}

pub fn not_mocked(request: &RequestDescriptor, probed: FixturePath) -> InterceptError {
    InterceptError::RequestNotMocked(RequestSignal {
        kind: SignalKind::NotMocked,
        method: request.method.clone(),
        url: request.full_url().to_string(),
        body: request.body_text(),
        probed_path: Some(probed),
    })
}

pub fn network_disabled(request: &RequestDescriptor) -> InterceptError {
    InterceptError::NetworkDisabled(RequestSignal {
        kind: SignalKind::NetworkDisabled,
        method: request.method.clone(),
        url: request.full_url().to_string(),
        body: request.body_text(),
        probed_path: None,
    })
}
