//! Thesa Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for local use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Vocabulary source
    pub vocabulary: VocabularyConfig,

    /// Annotation defaults
    pub annotation: AnnotationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply every variable `lookup` reports as set; unset keys leave the value alone
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("THESA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("THESA_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "THESA_PORT".to_string(),
                value: port,
            })?;
        }
        if let Some(token) = lookup("THESA_API_TOKEN") {
            self.server.api_token = Some(token).filter(|t| !t.is_empty());
        }

        // CORS origins from environment variable (comma-separated)
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Vocabulary
        if let Some(path) = lookup("THESA_VOCABULARY") {
            self.vocabulary.path = Some(PathBuf::from(path));
        }
        if let Some(language) = lookup("THESA_LANGUAGE") {
            self.vocabulary.language = language;
        }

        // Annotation
        if let Some(value) = lookup("THESA_USE_STEM") {
            self.annotation.use_stem = parse_bool("THESA_USE_STEM", &value)?;
        }
        if let Some(value) = lookup("THESA_SKIP_UNCHANGED_STEMS") {
            self.annotation.skip_unchanged_stems =
                parse_bool("THESA_SKIP_UNCHANGED_STEMS", &value)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,

    /// Bearer token required to replace the vocabulary and to use saved
    /// annotations; both are disabled while unset
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024, // 2MB
            cors_enabled: true,
            // Empty allows any origin; set via CORS_ORIGINS to restrict
            cors_origins: vec![],
            api_token: None,
        }
    }
}

/// Vocabulary source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Triple file loaded at startup (Turtle, N-Triples or JSON)
    pub path: Option<PathBuf>,

    /// Language tag alternate labels are filtered to
    pub language: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            path: None,
            language: "de".to_string(),
        }
    }
}

/// Annotation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Stem matching unless a request says otherwise
    pub use_stem: bool,

    /// Leave labels out of the stem index when stemming does not shorten them
    pub skip_unchanged_stems: bool,

    /// Maximum accepted text length in bytes
    pub max_text_length: usize,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            use_stem: false,
            skip_unchanged_stems: false,
            max_text_length: 1_000_000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<ConfigError> for crate::ThesaError {
    fn from(err: ConfigError) -> Self {
        crate::ThesaError::ConfigError(err.to_string())
    }
}
