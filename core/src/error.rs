//! # Error Handling
//!
//! Provides the unified `DoctestError` enum used across the workspace.

use derive_more::{Display, From};

/// Broad classification of a [`DoctestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A raw record is missing a required field.
    StructuralValidation,
    /// A container or manager was used out of order.
    LifecycleViolation,
    /// The configured storage engine is unknown or unsupported here.
    StorageEngine,
    /// Reading or writing a file failed.
    Io,
    /// Gathered AIL results disagree on versions or controller names.
    CollectionIntegrity,
    /// A value cannot be encoded with the requested parameter style.
    ParameterEncoding,
    /// The doctest configuration is missing or malformed.
    Configuration,
}

/// The Global Error Enum.
///
/// Only `std::io::Error` and `serde_json::Error` convert implicitly.
#[derive(Debug, Display, From)]
pub enum DoctestError {
    /// Raw API data failed structural validation.
    #[from(ignore)]
    #[display("{_0}")]
    AilFactory(String),

    /// `save` was called on a consumed container.
    #[from(ignore)]
    #[display("Tried to add a result to a consumed container.")]
    ConsumedContainer,

    /// `consume` was called twice on the same container.
    #[from(ignore)]
    #[display("Tried to consume a container that has already been consumed.")]
    AlreadyConsumed,

    /// Storage engine name not recognised, or not supported by the caller.
    #[from(ignore)]
    #[display("{_0} is not a valid storage engine type")]
    UnsupportedEngine(String),

    /// Configuration could not be resolved or parsed.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// Writing a file failed.
    #[from(ignore)]
    #[display("Failed to write the following file: {path} ({source})")]
    FileWrite {
        /// Target file.
        path: String,
        /// Underlying failure.
        source: std::io::Error,
    },

    /// Reading a file or directory failed.
    #[from(ignore)]
    #[display("Failed to read the following path: {path} ({reason})")]
    FileRead {
        /// Offending file or directory.
        path: String,
        /// Underlying failure, already rendered.
        reason: String,
    },

    /// The results directory contained no AIL files.
    #[from(ignore)]
    #[display("No AIL results were found")]
    NoResults,

    /// A gathered AIL document is malformed or has incompatible versions.
    #[from(ignore)]
    #[display("{_0}")]
    InvalidAilResult(String),

    /// Two gathered documents share a controller name.
    #[from(ignore)]
    #[display("Encountered duplicate controller: {_0}")]
    DuplicateController(String),

    /// RFC6570 parameter or query string encoding failed.
    #[from(ignore)]
    #[display("{_0}")]
    ParameterEncoding(String),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),
}

impl DoctestError {
    /// Maps the error onto its taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AilFactory(_) => ErrorKind::StructuralValidation,
            Self::ConsumedContainer | Self::AlreadyConsumed => ErrorKind::LifecycleViolation,
            Self::UnsupportedEngine(_) => ErrorKind::StorageEngine,
            Self::FileWrite { .. } | Self::FileRead { .. } | Self::NoResults | Self::Io(_) => {
                ErrorKind::Io
            }
            Self::InvalidAilResult(_) | Self::DuplicateController(_) => {
                ErrorKind::CollectionIntegrity
            }
            Self::ParameterEncoding(_) => ErrorKind::ParameterEncoding,
            Self::Config(_) | Self::Json(_) => ErrorKind::Configuration,
        }
    }
}

impl std::error::Error for DoctestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileWrite { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Helper type alias for Result using DoctestError.
pub type AppResult<T> = Result<T, DoctestError>;

/// Builds the message used when a required field is absent.
///
/// ```
/// use doctest_core::error::missing_required_field;
///
/// assert_eq!(
///     missing_required_field("url", Some("The API path: /x result req object")),
///     "The API path: /x result req object requires a field named: url. This value is missing."
/// );
/// ```
pub fn missing_required_field(field: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => format!("{subject} requires a field named: {field}. This value is missing."),
        None => format!("The required field named: {field} is missing."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind as IoKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(IoKind::Other, "test");
        let app_err: DoctestError = io_err.into();
        assert!(matches!(app_err, DoctestError::Io(_)));
        assert_eq!(app_err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: DoctestError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_lifecycle_messages() {
        assert_eq!(
            DoctestError::ConsumedContainer.to_string(),
            "Tried to add a result to a consumed container."
        );
        assert_eq!(
            DoctestError::AlreadyConsumed.kind(),
            ErrorKind::LifecycleViolation
        );
    }

    #[test]
    fn test_file_write_names_path() {
        let err = DoctestError::FileWrite {
            path: "out/ctrl.ail.json".into(),
            source: Error::new(IoKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/ctrl.ail.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_field_without_subject() {
        assert_eq!(
            missing_required_field("status", None),
            "The required field named: status is missing."
        );
    }
}
