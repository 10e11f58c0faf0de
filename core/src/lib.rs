#![deny(missing_docs)]

//! # Doctest Core
//!
//! Turns HTTP exchanges captured while API tests run into per-controller AIL
//! documents, then merges and renders them as OpenAPI.

/// Shared error types.
pub mod error;

/// HTTP verb classification.
pub mod http;

/// RFC6570 parameter strings and query string building.
pub mod params;

/// Captured exchange records and their per-controller container.
pub mod raw;

/// AIL document model and factory.
pub mod ail;

/// `doctest.json` loading and validation.
pub mod config;

/// Storage of generated AIL documents.
pub mod manager;

/// Reading back and merging AIL documents.
pub mod gatherer;

/// OpenAPI rendering.
pub mod output;

pub use ail::{AilCollection, AilDocument};
pub use config::{load_config, parse_config, DoctestConfig, OutputFormat, StorageEngine};
pub use error::{AppResult, DoctestError, ErrorKind};
pub use gatherer::{gather, gather_documents};
pub use manager::{AilManager, AilManagerConfig, ManagerInit};
pub use output::{ail_collection_to_swagger_paths, generate_output, SwaggerDocument};
pub use params::{build_query_string, QueryPair, QueryStringConfig};
pub use raw::{ContainerInfo, RawDocContainer, RawDocData};
