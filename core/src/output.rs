//! # Output Generator
//!
//! Renders a gathered [`AilCollection`] into the configured documentation
//! formats.

use crate::ail::{AilCollection, AilOperation, AilPathItem};
use crate::config::{resolve_path, DoctestConfig, OutputFormat};
use crate::error::AppResult;
use crate::http::is_path_item_verb;
use crate::manager::write_json_file;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use utoipa::openapi::{Info, InfoBuilder, LicenseBuilder};

/// File name of the rendered OpenAPI document.
pub const SWAGGER_FILE_NAME: &str = "swagger.json";

/// Verb to the single operation documented for it.
pub type SwaggerPathItem = IndexMap<String, AilOperation>;

/// Path string to path item.
pub type SwaggerPaths = IndexMap<String, SwaggerPathItem>;

/// The OpenAPI document written to `swagger.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwaggerDocument {
    /// OpenAPI version of the collection.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Collapsed path items.
    pub paths: SwaggerPaths,
}

impl SwaggerDocument {
    /// Builds the document for a collection.
    pub fn from_collection(collection: AilCollection) -> Self {
        Self {
            openapi: collection.open_api_version.clone(),
            info: placeholder_info(),
            paths: ail_collection_to_swagger_paths(collection),
        }
    }
}

/// Renders every configured output format.
///
/// Returns the files written.
pub fn generate_output(config: &DoctestConfig, collection: AilCollection) -> AppResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for format in &config.output_formats {
        match format {
            OutputFormat::Swagger => {
                written.push(generate_swagger_output(
                    &config.results_directory,
                    collection.clone(),
                )?);
            }
            OutputFormat::Sphinx => {
                warn!("Sphinx output is not supported yet, skipping");
            }
        }
    }

    Ok(written)
}

fn generate_swagger_output(results_directory: &Path, collection: AilCollection) -> AppResult<PathBuf> {
    let path = resolve_path(results_directory)?.join(SWAGGER_FILE_NAME);
    let document = SwaggerDocument::from_collection(collection);
    write_json_file(&path, &document)?;
    info!("Wrote OpenAPI output to {}", path.display());
    Ok(path)
}

fn placeholder_info() -> Info {
    InfoBuilder::new()
        .title("test title")
        .description(Some("test description"))
        .license(Some(LicenseBuilder::new().name("UNLICENSED").build()))
        .version("1.0.0")
        .build()
}

/// Converts a collection into OpenAPI paths with one operation per verb.
///
/// Controllers are walked in collection order. Each recognised verb keeps the
/// head of its candidate list. A path string emitted by a later controller
/// replaces the earlier value but keeps its position. The skip set is filled
/// with path strings and probed with controller names, so a controller is only
/// skipped when its name matches a path already emitted. Path items left with
/// no operations are not emitted.
pub fn ail_collection_to_swagger_paths(collection: AilCollection) -> SwaggerPaths {
    let mut encountered: HashSet<String> = HashSet::new();
    let mut swagger_paths = SwaggerPaths::new();

    for (controller, item) in collection.items {
        for (path, path_item) in item.paths {
            if encountered.contains(&controller) {
                continue;
            }
            encountered.insert(path.clone());
            let collapsed = collapse_path_item(&path, path_item);
            if collapsed.is_empty() {
                warn!(path = %path, "Skipping path with no documentable operations");
                continue;
            }
            swagger_paths.insert(path, collapsed);
        }
    }

    swagger_paths
}

fn collapse_path_item(path: &str, path_item: AilPathItem) -> SwaggerPathItem {
    path_item
        .into_iter()
        .filter_map(|(verb, candidates)| {
            if !is_path_item_verb(&verb) {
                warn!(path, verb = %verb, "Dropping operation with a verb OpenAPI path items do not support");
                return None;
            }
            candidates.into_iter().next().map(|op| (verb, op))
        })
        .collect()
}
