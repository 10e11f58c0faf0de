//! # Configuration
//!
//! The `doctest.json` file, storage engine selection and output formats.
//!
//! Files are read into a permissive shim first, then validated into the typed
//! [`DoctestConfig`], so an unknown engine or format produces a domain error
//! instead of a serde message.

use crate::error::{AppResult, DoctestError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// AIL schema version written into every document.
pub const DEFAULT_AIL_VERSION: &str = "0.1.0";

/// OpenAPI version written into every document and the rendered output.
pub const DEFAULT_OPEN_API_VERSION: &str = "3.0.0";

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "doctest.json";

/// Results directory used when the configuration names none.
pub const DEFAULT_RESULTS_DIRECTORY: &str = "./test/Results";

/// Where AIL documents are kept between generation and gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageEngine {
    /// One `<controller>.ail.json` file per controller.
    #[serde(rename = "FILE")]
    File,
    /// Documents held by the manager handle.
    #[serde(rename = "MEMORY")]
    Memory,
}

impl StorageEngine {
    /// Name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Memory => "MEMORY",
        }
    }
}

impl fmt::Display for StorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageEngine {
    type Err = DoctestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FILE" => Ok(Self::File),
            "MEMORY" => Ok(Self::Memory),
            other => Err(DoctestError::UnsupportedEngine(other.to_string())),
        }
    }
}

/// Documentation output targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// OpenAPI JSON written to `swagger.json`.
    Swagger,
    /// Recognised but not rendered.
    Sphinx,
}

impl FromStr for OutputFormat {
    type Err = DoctestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swagger" | "openapi" => Ok(Self::Swagger),
            "sphinx" => Ok(Self::Sphinx),
            other => Err(DoctestError::Config(format!(
                "{other} is not a supported output format"
            ))),
        }
    }
}

/// Validated doctest configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctestConfig {
    /// Storage engine for AIL documents.
    pub storage_engine: StorageEngine,
    /// Directory holding AIL files and rendered output.
    pub results_directory: PathBuf,
    /// Expected AIL version, when overridden.
    pub ail_version: Option<String>,
    /// Expected OpenAPI version, when overridden.
    pub open_api_version: Option<String>,
    /// Path to the application under test.
    pub app_path: Option<String>,
    /// Formats to render.
    pub output_formats: Vec<OutputFormat>,
}

impl DoctestConfig {
    /// A configuration with defaults for everything but the engine.
    pub fn new(storage_engine: StorageEngine, results_directory: impl Into<PathBuf>) -> Self {
        Self {
            storage_engine,
            results_directory: results_directory.into(),
            ail_version: None,
            open_api_version: None,
            app_path: None,
            output_formats: vec![OutputFormat::Swagger],
        }
    }

    /// The AIL version gathered documents must carry.
    pub fn ail_version(&self) -> &str {
        self.ail_version.as_deref().unwrap_or(DEFAULT_AIL_VERSION)
    }

    /// The OpenAPI version gathered documents must carry.
    pub fn open_api_version(&self) -> &str {
        self.open_api_version
            .as_deref()
            .unwrap_or(DEFAULT_OPEN_API_VERSION)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoctestConfigFile {
    storage_engine: Option<String>,
    results_directory: Option<PathBuf>,
    ail_version: Option<String>,
    open_api_version: Option<String>,
    app_path: Option<String>,
    output_formats: Option<Vec<String>>,
}

impl TryFrom<DoctestConfigFile> for DoctestConfig {
    type Error = DoctestError;

    fn try_from(file: DoctestConfigFile) -> AppResult<Self> {
        let engine = file.storage_engine.ok_or_else(|| {
            DoctestError::Config("The configuration requires a storageEngine".into())
        })?;

        let output_formats = match file.output_formats {
            Some(formats) => formats
                .iter()
                .map(|f| f.parse::<OutputFormat>())
                .collect::<AppResult<Vec<_>>>()?,
            None => vec![OutputFormat::Swagger],
        };

        Ok(Self {
            storage_engine: engine.parse::<StorageEngine>()?,
            results_directory: file
                .results_directory
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIRECTORY)),
            ail_version: file.ail_version,
            open_api_version: file.open_api_version,
            app_path: file.app_path,
            output_formats,
        })
    }
}

/// Parses and validates a configuration from JSON text.
pub fn parse_config(json: &str) -> AppResult<DoctestConfig> {
    let file: DoctestConfigFile = serde_json::from_str(json)
        .map_err(|e| DoctestError::Config(format!("Failed to parse configuration: {e}")))?;
    file.try_into()
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> AppResult<DoctestConfig> {
    if !path.is_file() {
        return Err(DoctestError::Config(format!(
            "No configuration file could be found at {}",
            path.display()
        )));
    }
    let raw = std::fs::read_to_string(path).map_err(|e| DoctestError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_config(&raw)
}

/// Resolves a path against the invocation directory.
pub fn resolve_path(path: impl AsRef<Path>) -> AppResult<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"{
                "storageEngine": "FILE",
                "resultsDirectory": "out",
                "ailVersion": "9.9.9",
                "appPath": "dist/app.js",
                "outputFormats": ["swagger", "sphinx"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.storage_engine, StorageEngine::File);
        assert_eq!(config.results_directory, PathBuf::from("out"));
        assert_eq!(config.ail_version(), "9.9.9");
        assert_eq!(config.open_api_version(), DEFAULT_OPEN_API_VERSION);
        assert_eq!(
            config.output_formats,
            vec![OutputFormat::Swagger, OutputFormat::Sphinx]
        );
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse_config(r#"{ "storageEngine": "MEMORY" }"#).unwrap();
        assert_eq!(
            config.results_directory,
            PathBuf::from(DEFAULT_RESULTS_DIRECTORY)
        );
        assert_eq!(config.output_formats, vec![OutputFormat::Swagger]);
    }

    #[test]
    fn test_unknown_engine_is_storage_error() {
        let err = parse_config(r#"{ "storageEngine": "S3" }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageEngine);
        assert_eq!(err.to_string(), "S3 is not a valid storage engine type");
    }

    #[test]
    fn test_missing_engine_and_bad_format() {
        assert!(parse_config("{}").is_err());
        let err =
            parse_config(r#"{ "storageEngine": "FILE", "outputFormats": ["pdf"] }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        assert!(load_config(&path).is_err());

        fs::write(&path, r#"{ "storageEngine": "FILE" }"#).unwrap();
        assert_eq!(load_config(&path).unwrap().storage_engine, StorageEngine::File);
    }

    #[test]
    fn test_resolve_path() {
        let abs = std::env::temp_dir();
        assert_eq!(resolve_path(&abs).unwrap(), abs);
        assert!(resolve_path("doctest.json").unwrap().is_absolute());
    }
}
