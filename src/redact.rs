use regex::Regex;

use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

/// Replacement for every match. A pattern may name a `keep` group to
/// retain a prefix such as `Bearer ` or `"access_token":"`.
const REPLACEMENT: &str = "${keep}[REDACTED]";

/// Credentials commonly seen in HTTP traffic.
const DEFAULT_PATTERNS: &[&str] = &[
    // Authorization schemes echoed in bodies or non-standard headers
    r"(?P<keep>(?i:bearer|basic|token)\s+)[A-Za-z0-9._~+/=-]{8,}",
    // JSON Web Tokens
    r"eyJ[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]+",
    // Provider API keys: `sk-...` and Stripe-style `sk_live_...`
    r"\bsk-[A-Za-z0-9_-]{16,}",
    r"\b(?:sk|rk|pk)_(?:live|test)_[A-Za-z0-9]{10,}",
    // Secrets in JSON bodies
    r#"(?P<keep>"(?i:access_token|refresh_token|id_token|client_secret|password|api_key)"\s*:\s*")[^"]*"#,
    // Secrets in form bodies and echoed URLs
    r"(?P<keep>\b(?i:access_token|refresh_token|client_secret|api_key|apikey)=)[^&\s]+",
];

/// Scrubs credentials out of captured traffic before it is written to disk.
#[derive(Debug, Clone)]
pub struct Redactor {
    drop_headers: Vec<String>,
    patterns: Vec<Regex>,
    drop_query_params: Vec<String>,
}

impl Redactor {
    pub fn new(drop_headers: Vec<String>, patterns: Vec<Regex>) -> Self {
        Self {
            drop_headers: drop_headers
                .into_iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            patterns,
            drop_query_params: Vec::new(),
        }
    }

    pub fn none() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn default_headers() -> Vec<String> {
        [
            "set-cookie",
            "authorization",
            "proxy-authorization",
            "www-authenticate",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn default_patterns() -> Vec<Regex> {
        DEFAULT_PATTERNS
            .iter()
            .filter_map(|raw| Regex::new(raw).ok())
            .collect()
    }

    pub fn default_sensitive() -> Self {
        Self::new(Self::default_headers(), Self::default_patterns())
    }

    pub fn with_dropped_query_params(mut self, params: Vec<String>) -> Self {
        self.drop_query_params = params;
        self
    }

    pub fn scrub_string(&self, input: &str) -> String {
        self.patterns.iter().fold(input.to_string(), |text, re| {
            re.replace_all(&text, REPLACEMENT).into_owned()
        })
    }

    /// Remove ignored query parameters. Applied before path encoding on
    /// both lookup and capture so both sides agree on the fixture path.
    pub fn rewrite_request(&self, request: RequestDescriptor) -> RequestDescriptor {
        self.drop_query_params
            .iter()
            .fold(request, |req, key| req.without_query_param(key))
    }

    pub fn redact_response(&self, response: &ResponseDescriptor) -> ResponseDescriptor {
        let mut out = response.clone();
        for name in &self.drop_headers {
            out.headers.remove(name);
        }
        if self.patterns.is_empty() {
            return out;
        }
        for value in out.headers.values_mut() {
            *value = self.scrub_string(value);
        }
        // Opaque bodies are left alone.
        if let Ok(text) = std::str::from_utf8(&response.body) {
            out.body = self.scrub_string(text).into_bytes();
        }
        if out.body != response.body && out.headers.contains("content-length") {
            out.headers.insert("content-length", out.body.len().to_string());
        }
        out
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::default_sensitive()
    }
}
