//! Service configuration.
//!
//! Settings come from a TOML file (all keys optional) and are then overridden
//! by environment variables.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! max_upload_bytes = 52428800
//!
//! [uploads]
//! temp_dir = "/tmp/osm-uploads"
//! default_extension = "osm"
//!
//! [extraction]
//! allowed_object_types = ["spaces", "surfaces", "subsurfaces"]
//! default_object_types = ["spaces", "surfaces", "subsurfaces"]
//! failure_policy = "embed"
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::ObjectTypePolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PARSER_CONFIG";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: {message}")]
    InvalidEnv { var: String, message: String },

    #[error("Unknown object type '{0}' in configuration")]
    UnknownObjectType(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to do when one requested object type fails to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Put `{"error": ...}` under the failed type and keep the other results.
    #[default]
    Embed,
    /// Fail the whole request.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "embed" => Ok(FailurePolicy::Embed),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!("unsupported failure policy '{}', use embed or abort", other)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Embed => f.write_str("embed"),
            FailurePolicy::Abort => f.write_str("abort"),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub uploads: UploadSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Temporary storage for uploaded model files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Root for per-request temporary directories; system temp dir when unset
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Extension used when the uploaded filename has none
    #[serde(default = "default_extension")]
    pub default_extension: String,
}

/// Object-type allow-list and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_allowed_object_types")]
    pub allowed_object_types: Vec<String>,
    /// Types used when a request names none; the allow-list when unset or empty
    #[serde(default)]
    pub default_object_types: Option<Vec<String>>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_extension() -> String {
    "osm".to_string()
}

fn default_allowed_object_types() -> Vec<String> {
    vec![
        "spaces".to_string(),
        "surfaces".to_string(),
        "subsurfaces".to_string(),
    ]
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            temp_dir: None,
            default_extension: default_extension(),
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            allowed_object_types: default_allowed_object_types(),
            default_object_types: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse configuration from TOML text; `origin` names the text in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Resolve the configuration the server starts with.
    ///
    /// Uses the file named by `PARSER_CONFIG` when set, otherwise the first of
    /// `parser.toml` and `backend/parser.toml` that exists, otherwise the
    /// built-in defaults. Environment overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => {
                let found = ["parser.toml", "backend/parser.toml"]
                    .into_iter()
                    .map(PathBuf::from)
                    .find(|p| p.exists());
                match found {
                    Some(path) => Self::from_file(path)?,
                    None => Self::default(),
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Environment Variables
    /// - `HOST`, `PORT`: listener address
    /// - `PARSER_TEMP_DIR`: root for upload temp directories
    /// - `PARSER_MAX_UPLOAD_MB`: body limit in MiB
    /// - `PARSER_OBJECT_TYPES`: comma list replacing the allow-list
    /// - `PARSER_FAILURE_POLICY`: `embed` or `abort`
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT".to_string(),
                message: format!("'{}' is not a valid port number", port),
            })?;
        }
        if let Some(dir) = lookup("PARSER_TEMP_DIR") {
            self.uploads.temp_dir = Some(PathBuf::from(dir));
        }
        if let Some(mb) = lookup("PARSER_MAX_UPLOAD_MB") {
            let mb: usize = mb.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PARSER_MAX_UPLOAD_MB".to_string(),
                message: format!("'{}' is not a whole number of MiB", mb),
            })?;
            let bytes = mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: "PARSER_MAX_UPLOAD_MB".to_string(),
                    message: format!("'{}' MiB is too large", mb),
                })?;
            self.server.max_upload_bytes = bytes;
        }
        if let Some(types) = lookup("PARSER_OBJECT_TYPES") {
            self.extraction.allowed_object_types = types
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(policy) = lookup("PARSER_FAILURE_POLICY") {
            self.extraction.failure_policy =
                policy.parse().map_err(|message| ConfigError::InvalidEnv {
                    var: "PARSER_FAILURE_POLICY".to_string(),
                    message,
                })?;
        }
        Ok(())
    }

    /// Validate the extraction settings against the toolkit catalogue.
    pub fn object_type_policy(&self) -> Result<ObjectTypePolicy, ConfigError> {
        ObjectTypePolicy::from_settings(&self.extraction)
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = ServiceConfig::from_toml_str("", "test").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.uploads.default_extension, "osm");
        assert_eq!(
            config.extraction.allowed_object_types,
            vec!["spaces", "surfaces", "subsurfaces"]
        );
        assert_eq!(config.extraction.failure_policy, FailurePolicy::Embed);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_all_sections() {
        let toml = r#"
            [server]
            port = 9000

            [uploads]
            temp_dir = "/var/tmp/osm"

            [extraction]
            allowed_object_types = ["spaces", "thermal_zones"]
            default_object_types = ["spaces"]
            failure_policy = "abort"
        "#;
        let config = ServiceConfig::from_toml_str(toml, "test").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.uploads.temp_dir, Some(PathBuf::from("/var/tmp/osm")));
        assert_eq!(
            config.extraction.default_object_types,
            Some(vec!["spaces".to_string()])
        );
        assert_eq!(config.extraction.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn malformed_toml_reports_origin() {
        let err = ServiceConfig::from_toml_str("[server\nport = 1", "inline.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("inline.toml"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceConfig::from_file(dir.path().join("parser.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(lookup(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "3000"),
                ("PARSER_TEMP_DIR", "/scratch"),
                ("PARSER_MAX_UPLOAD_MB", "2"),
                ("PARSER_OBJECT_TYPES", "spaces, materials,"),
                ("PARSER_FAILURE_POLICY", "ABORT"),
            ]))
            .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.uploads.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.server.max_upload_bytes, 2 * 1024 * 1024);
        assert_eq!(config.extraction.allowed_object_types, vec!["spaces", "materials"]);
        assert_eq!(config.extraction.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let mut config = ServiceConfig::default();
        let err = config.apply_overrides(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == "PORT"));

        let err = config
            .apply_overrides(lookup(&[("PARSER_FAILURE_POLICY", "retry")]))
            .unwrap_err();
        assert!(err.to_string().contains("retry"));
    }

    #[test]
    fn oversized_upload_limit_is_rejected() {
        let huge = usize::MAX.to_string();
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(lookup(&[("PARSER_MAX_UPLOAD_MB", huge.as_str())]))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == "PARSER_MAX_UPLOAD_MB")
        );
        assert!(err.to_string().contains("too large"));
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
    }
}
