//! Outbound request description.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{InterceptError, Result};

/// HTTP verb of an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Any other token, stored upper-cased.
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Other(token) => token,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Method::parse(s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as seen by the interception layer.
///
/// The URL is kept both verbatim (for error messages and the real
/// transport) and decomposed into host, decoded path segments and decoded
/// query pairs (for path encoding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    url: Url,
    pub host: String,
    pub segments: Vec<String>,
    pub trailing_slash: bool,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| InterceptError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(method, parsed)
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::Get, url)
    }

    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::Post, url)
    }

    pub fn from_url(method: Method, url: Url) -> Result<Self> {
        let host = match url.host_str() {
            Some(host) => host.to_string(),
            None => {
                return Err(InterceptError::InvalidUrl {
                    url: url.to_string(),
                    reason: "url has no host".to_string(),
                })
            }
        };

        let raw_segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();
        let trailing_slash = raw_segments.len() > 1 && raw_segments.last() == Some(&"");
        let segments = raw_segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| decode_segment(s))
            .collect();

        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            method,
            host,
            segments,
            trailing_slash,
            query,
            body: None,
            headers: Vec::new(),
            url,
        })
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.body = if body.is_empty() { None } else { Some(body) };
        self
    }

    /// Serialize `value` as the body and set a JSON content type.
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Drop every query parameter named `key`, keeping the verbatim URL
    /// in sync.
    pub fn without_query_param(mut self, key: &str) -> Self {
        if !self.query.iter().any(|(k, _)| k == key) {
            return self;
        }
        self.query.retain(|(k, _)| k != key);
        if self.query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url
                .query_pairs_mut()
                .clear()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        self
    }

    /// The full request URL including the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn full_url(&self) -> &str {
        self.url.as_str()
    }

    /// Port to encode into the host directory, if one was given explicitly
    /// and differs from the scheme default.
    pub fn explicit_port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }

    /// Body rendered for humans; invalid UTF-8 is replaced lossily.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .filter(|b| !b.is_empty())
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}
