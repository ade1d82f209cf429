//! Request → fixture path encoding.
//!
//! The encoded tree mirrors the API: the host is the top-level directory,
//! every path segment but the last is a nested directory, and the last
//! segment names the file. Query parameters and bodies fold into a short
//! digest suffix, and non-GET verbs add a `-METHOD` suffix:
//!
//! ```text
//! GET  https://api.example.com/users/show.json            api.example.com/users/show.json
//! GET  https://api.example.com/users                      api.example.com/users.json
//! GET  https://api.example.com/users/show.json?id=1       api.example.com/users/show.json-<digest>.json
//! POST https://api.example.com/items/  {"a":1}            api.example.com/items-<digest>-POST.json
//! DELETE https://api.example.com/items/7                  api.example.com/items/7-DELETE.json
//! ```
//!
//! Once any suffix is added the last segment is used verbatim and the
//! default extension always goes last, so an already-extensioned stem ends
//! up with two extensions. Loaders rely on the final extension being the
//! only part that varies between fixture formats.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::media::{has_recognized_extension, MediaType};
use crate::request::RequestDescriptor;

/// Extension every encoded path ends in.
pub const DEFAULT_EXTENSION: &str = "json";

/// Number of hex characters kept from the request digest.
pub const DIGEST_WIDTH: usize = 6;

/// A relative, `/`-separated fixture path derived from a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixturePath(String);

impl FixturePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path without its final recognized extension. Every fixture
    /// format for the same request shares this stem.
    pub fn stem(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((stem, ext))
                if !stem.ends_with('/') && MediaType::from_extension(ext).is_some() =>
            {
                stem
            }
            _ => &self.0,
        }
    }

    /// The same stem with a different final extension.
    pub fn with_extension(&self, ext: &str) -> FixturePath {
        FixturePath(format!("{}.{}", self.stem(), ext))
    }

    /// Resolve against a mock root.
    pub fn under(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |p, c| p.join(c))
    }
}

impl fmt::Display for FixturePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FixturePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a request onto its canonical fixture path. Pure and total.
pub fn encode(request: &RequestDescriptor) -> FixturePath {
    let host = match request.explicit_port() {
        Some(port) => format!("{}-{}", sanitize_component(&request.host), port),
        None => sanitize_component(&request.host),
    };

    let mut components: Vec<String> = request
        .segments
        .iter()
        .map(|s| sanitize_component(s))
        .filter(|s| !s.is_empty())
        .collect();

    let (dirs, stem) = match components.pop() {
        Some(last) => {
            let mut dirs = Vec::with_capacity(components.len() + 1);
            dirs.push(host);
            dirs.extend(components);
            (dirs, last)
        }
        None => (Vec::new(), host),
    };

    let digest = request_digest(request);
    let non_get = !request.method.is_get();

    let file_name = if digest.is_none() && !non_get {
        if has_recognized_extension(&stem) {
            stem
        } else {
            format!("{stem}.{DEFAULT_EXTENSION}")
        }
    } else {
        let mut name = stem;
        if let Some(digest) = digest {
            name.push('-');
            name.push_str(&digest);
        }
        if non_get {
            name.push('-');
            name.push_str(&request.method.as_str().to_ascii_uppercase());
        }
        name.push('.');
        name.push_str(DEFAULT_EXTENSION);
        name
    };

    let mut path = dirs.join("/");
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(&file_name);
    FixturePath(path)
}

/// Digest over the canonical query and body, `None` when both are absent.
pub fn request_digest(request: &RequestDescriptor) -> Option<String> {
    if !request.has_query() && !request.has_body() {
        return None;
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical_query(&request.query).as_bytes());
    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        hasher.update([0u8]);
        hasher.update(body);
    }
    let hex = format!("{:x}", hasher.finalize());
    Some(hex[..DIGEST_WIDTH].to_string())
}

/// Query pairs sorted by key then value, re-encoded and joined with `&`.
pub fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = query.iter().collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Make a decoded URL component safe to use as a single path component.
fn sanitize_component(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    if replaced.chars().all(|c| c == '.') {
        String::new()
    } else {
        replaced
    }
}
