use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{InterceptError, Result};
use crate::media::MediaType;
use crate::response::{Headers, ResponseDescriptor};

/// Extension of full-descriptor fixtures.
pub const FULL_DESCRIPTOR_EXTENSION: &str = "response";

/// A fixture as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// Raw body; status 200 and content type implied by the extension.
    SimplifiedBody { media: MediaType, body: Vec<u8> },
    /// Explicit status, headers and body.
    FullDescriptor(FullDescriptor),
}

/// On-disk record for responses the simplified form cannot represent.
///
/// `body` holds UTF-8 bodies as text; anything else goes in `body_base64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullDescriptor {
    pub status: u16,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_base64: Option<String>,
}

impl FullDescriptor {
    pub fn from_response(response: &ResponseDescriptor) -> Self {
        let (body, body_base64) = if response.body.is_empty() {
            (None, None)
        } else {
            match std::str::from_utf8(&response.body) {
                Ok(text) => (Some(text.to_string()), None),
                Err(_) => (None, Some(BASE64.encode(&response.body))),
            }
        };
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body,
            body_base64,
        }
    }

    fn body_bytes(&self) -> std::result::Result<Vec<u8>, String> {
        match (&self.body, &self.body_base64) {
            (Some(_), Some(_)) => Err("both body and body_base64 are set".to_string()),
            (Some(text), None) => Ok(text.clone().into_bytes()),
            (None, Some(encoded)) => BASE64
                .decode(encoded.trim())
                .map_err(|e| format!("invalid body_base64: {e}")),
            (None, None) => Ok(Vec::new()),
        }
    }
}

impl Fixture {
    /// Choose the on-disk form for a response.
    pub fn for_response(response: &ResponseDescriptor, simplify: bool) -> Self {
        match response.simplified_media_type() {
            Some(media) if simplify && response.status == 200 => Fixture::SimplifiedBody {
                media,
                body: response.body.clone(),
            },
            _ => Fixture::FullDescriptor(FullDescriptor::from_response(response)),
        }
    }

    /// Extension the fixture is stored under.
    pub fn extension(&self) -> &'static str {
        match self {
            Fixture::SimplifiedBody { media, .. } => media.extension(),
            Fixture::FullDescriptor(_) => FULL_DESCRIPTOR_EXTENSION,
        }
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Fixture::SimplifiedBody { body, .. } => Ok(body.clone()),
            Fixture::FullDescriptor(descriptor) => {
                let mut json = serde_json::to_vec_pretty(descriptor)?;
                json.push(b'\n');
                Ok(json)
            }
        }
    }

    /// Decode a file found at `path`, using its extension to pick the form.
    pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if ext == FULL_DESCRIPTOR_EXTENSION {
            let descriptor: FullDescriptor =
                serde_json::from_slice(&bytes).map_err(|e| InterceptError::FixtureDecode {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            if !(100..=999).contains(&descriptor.status) {
                return Err(InterceptError::FixtureDecode {
                    path: path.to_path_buf(),
                    reason: format!("invalid status {}", descriptor.status),
                });
            }
            descriptor
                .body_bytes()
                .map_err(|reason| InterceptError::FixtureDecode {
                    path: path.to_path_buf(),
                    reason,
                })?;
            return Ok(Fixture::FullDescriptor(descriptor));
        }
        match MediaType::from_extension(ext) {
            Some(media) => Ok(Fixture::SimplifiedBody { media, body: bytes }),
            None => Err(InterceptError::FixtureDecode {
                path: path.to_path_buf(),
                reason: format!("unrecognized fixture extension {ext:?}"),
            }),
        }
    }

    pub fn into_response(self) -> ResponseDescriptor {
        match self {
            Fixture::SimplifiedBody { media, body } => ResponseDescriptor::ok(media, body),
            Fixture::FullDescriptor(descriptor) => {
                // validated in `decode`; a hand-built descriptor with a bad
                // body_base64 yields an empty body
                let body = descriptor.body_bytes().unwrap_or_default();
                ResponseDescriptor {
                    status: descriptor.status,
                    headers: descriptor.headers,
                    body,
                }
            }
        }
    }
}
