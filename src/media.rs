//! The fixed set of media types that can be stored as a bare body.

/// A media type with a simplified fixture representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Json,
    Html,
    Xml,
    Text,
    Csv,
    Tsv,
}

impl MediaType {
    /// Candidate order used when probing for a simplified fixture.
    pub const ALL: [MediaType; 6] = [
        MediaType::Json,
        MediaType::Html,
        MediaType::Xml,
        MediaType::Text,
        MediaType::Csv,
        MediaType::Tsv,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            MediaType::Json => "json",
            MediaType::Html => "html",
            MediaType::Xml => "xml",
            MediaType::Text => "txt",
            MediaType::Csv => "csv",
            MediaType::Tsv => "tsv",
        }
    }

    fn fallback_mime(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Html => "text/html",
            MediaType::Xml => "application/xml",
            MediaType::Text => "text/plain",
            MediaType::Csv => "text/csv",
            MediaType::Tsv => "text/tab-separated-values",
        }
    }

    /// Content type synthesized for a simplified fixture.
    pub fn content_type(self) -> String {
        let mime = mime_guess::from_ext(self.extension())
            .first_raw()
            .unwrap_or(self.fallback_mime());
        if mime.starts_with("text/") {
            format!("{mime}; charset=utf-8")
        } else {
            mime.to_string()
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.extension() == ext)
    }

    /// Map a `Content-Type` header value onto a simplified media type.
    ///
    /// Parameters are ignored; any `+json` / `+xml` structured suffix counts
    /// as its base type.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" | "text/json" => Some(MediaType::Json),
            "text/html" => Some(MediaType::Html),
            "application/xml" | "text/xml" => Some(MediaType::Xml),
            "text/plain" => Some(MediaType::Text),
            "text/csv" => Some(MediaType::Csv),
            "text/tab-separated-values" => Some(MediaType::Tsv),
            e if e.ends_with("+json") => Some(MediaType::Json),
            e if e.ends_with("+xml") => Some(MediaType::Xml),
            _ => None,
        }
    }
}

/// True when `name` ends in one of the recognized extensions.
pub fn has_recognized_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && MediaType::from_extension(ext).is_some())
}
