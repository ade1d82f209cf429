//! Configuration for interception scopes.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::dispatch::ScopeOptions;
use crate::error::{InterceptError, Result};
use crate::redact::Redactor;

/// Example configuration file contents
pub const EXAMPLE_CONFIG: &str = r#"# Directories searched for fixtures, in order. Captured fixtures are
# written to the first one that can be created.
mock_roots = ["tests/mocks"]

# Store 200 responses with a recognized content type as bare bodies.
simplify = true

# Replace existing fixtures when capturing.
overwrite = true

[redact]
# Response headers removed before a fixture is written.
headers = ["set-cookie", "authorization", "proxy-authorization", "www-authenticate"]
# Regexes replaced with [REDACTED] in header values and text bodies. A
# group named `keep` is left in place.
# patterns = ['(?P<keep>X-Session: )\S+']
# Query parameters ignored when naming fixtures.
# query_params = ["api_key"]
"#;

/// Interception configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixture search / capture roots
    pub mock_roots: Vec<PathBuf>,
    /// Simplify 200 responses of recognized media types
    pub simplify: bool,
    /// Overwrite fixtures when capturing
    pub overwrite: bool,
    /// Redaction applied to captured fixtures
    pub redactor: Redactor,
}

impl Default for Config {
    fn default() -> Self {
        let options = ScopeOptions::default();
        Self {
            mock_roots: options.mock_roots,
            simplify: options.simplify,
            overwrite: options.overwrite,
            redactor: options.redactor,
        }
    }
}

/// TOML representation of redaction settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlRedactConfig {
    pub headers: Option<Vec<String>>,
    pub patterns: Option<Vec<String>>,
    pub query_params: Option<Vec<String>>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub mock_roots: Option<Vec<PathBuf>>,
    pub simplify: Option<bool>,
    pub overwrite: Option<bool>,
    pub redact: Option<TomlRedactConfig>,
}

impl Config {
    /// Load a config file on top of the defaults. Relative mock roots are
    /// resolved against the file's directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            InterceptError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.mock_roots = config
                .mock_roots
                .into_iter()
                .map(|root| if root.is_relative() { base.join(root) } else { root })
                .collect();
        }
        tracing::debug!(
            path = %path.display(),
            roots = config.mock_roots.len(),
            "loaded interception config"
        );
        Ok(config)
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let toml_config: TomlConfig = toml::from_str(contents)
            .map_err(|e| InterceptError::Config(format!("invalid config: {e}")))?;
        let mut config = Config::default();

        if let Some(roots) = toml_config.mock_roots {
            config.mock_roots = roots;
        }
        if let Some(simplify) = toml_config.simplify {
            config.simplify = simplify;
        }
        if let Some(overwrite) = toml_config.overwrite {
            config.overwrite = overwrite;
        }

        if let Some(redact) = toml_config.redact {
            let headers = redact.headers.unwrap_or_else(Redactor::default_headers);
            let patterns = match redact.patterns {
                Some(raw) => raw
                    .iter()
                    .map(|p| {
                        Regex::new(p).map_err(|e| {
                            InterceptError::Config(format!("invalid redact pattern {p:?}: {e}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => Redactor::default_patterns(),
            };
            config.redactor = Redactor::new(headers, patterns)
                .with_dropped_query_params(redact.query_params.unwrap_or_default());
        }

        Ok(config)
    }

    pub fn with_mock_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.mock_roots = roots;
        self
    }

    pub fn scope_options(&self) -> ScopeOptions {
        ScopeOptions {
            mock_roots: self.mock_roots.clone(),
            simplify: self.simplify,
            overwrite: self.overwrite,
            redactor: self.redactor.clone(),
        }
    }
}
