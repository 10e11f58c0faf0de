#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use doctest_core::DoctestError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the documentation pipeline.
    #[display("{}", _0)]
    Core(DoctestError),

    /// General failure message.
    #[display("{}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` carries no source, so `source()` is written out by hand.
impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Core(e) => Some(e),
            Self::General(_) => None,
        }
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
