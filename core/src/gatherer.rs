//! # AIL Gatherer
//!
//! Reads back every controller's AIL document after the test run and merges
//! them into one [`AilCollection`].

use crate::ail::{AilCollection, AilCollectionItem, AilDocument, AilPaths};
use crate::config::{DoctestConfig, StorageEngine};
use crate::error::{AppResult, DoctestError};
use crate::manager::AIL_FILE_SUFFIX;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A persisted AIL result before validation.
///
/// Every field is optional so that a malformed file is reported by name
/// instead of as a serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AilResultFile {
    controller: Option<Value>,
    ail_version: Option<Value>,
    open_api_version: Option<Value>,
    date_created: Option<i64>,
    paths: Option<AilPaths>,
}

impl From<AilDocument> for AilResultFile {
    fn from(doc: AilDocument) -> Self {
        Self {
            controller: Some(Value::String(doc.controller)),
            ail_version: Some(Value::String(doc.ail_version)),
            open_api_version: Some(Value::String(doc.open_api_version)),
            date_created: Some(doc.date_created),
            paths: Some(doc.paths),
        }
    }
}

/// Collects every AIL result the configured storage engine holds.
///
/// Only the FILE engine can be read back after the test process exits; use
/// [`gather_documents`] with the documents of a MEMORY-engine manager.
pub fn gather(config: &DoctestConfig) -> AppResult<AilCollection> {
    let results = match config.storage_engine {
        StorageEngine::File => gather_from_filesystem(&config.results_directory)?,
        StorageEngine::Memory => {
            return Err(DoctestError::UnsupportedEngine(
                config.storage_engine.to_string(),
            ))
        }
    };
    build_collection(config, results)
}

/// Merges documents that are already loaded.
pub fn gather_documents(
    config: &DoctestConfig,
    documents: impl IntoIterator<Item = AilDocument>,
) -> AppResult<AilCollection> {
    let results = documents.into_iter().map(AilResultFile::from).collect();
    build_collection(config, results)
}

/// Lists the `*.ail.json` files directly inside `directory`, sorted by name.
pub fn ail_result_files(directory: &Path) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| DoctestError::FileRead {
            path: directory.display().to_string(),
            reason: e.to_string(),
        })?;
        let is_result = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(AIL_FILE_SUFFIX));
        if entry.file_type().is_file() && is_result {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn gather_from_filesystem(directory: &Path) -> AppResult<Vec<AilResultFile>> {
    let files = ail_result_files(directory)?;
    if files.is_empty() {
        return Err(DoctestError::NoResults);
    }

    files
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "Reading AIL result");
            let raw = std::fs::read_to_string(path).map_err(|e| DoctestError::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            serde_json::from_str(&raw).map_err(|e| DoctestError::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn build_collection(config: &DoctestConfig, results: Vec<AilResultFile>) -> AppResult<AilCollection> {
    if results.is_empty() {
        return Err(DoctestError::NoResults);
    }

    let ail_version = config.ail_version();
    let open_api_version = config.open_api_version();

    let mut items = results
        .into_iter()
        .map(|result| validate_ail_result(result, ail_version, open_api_version))
        .collect::<AppResult<Vec<_>>>()?;
    items.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut collection = AilCollection {
        ail_version: ail_version.to_string(),
        open_api_version: open_api_version.to_string(),
        date_created: chrono::Utc::now().timestamp_millis(),
        items: IndexMap::with_capacity(items.len()),
    };

    for (controller, item) in items {
        if collection.items.contains_key(&controller) {
            return Err(DoctestError::DuplicateController(controller));
        }
        collection.items.insert(controller, item);
    }

    debug!(controllers = collection.items.len(), "Built AIL collection");
    Ok(collection)
}

fn validate_ail_result(
    result: AilResultFile,
    ail_version: &str,
    open_api_version: &str,
) -> AppResult<(String, AilCollectionItem)> {
    let name = match result.controller {
        Some(Value::String(name)) if !name.is_empty() => name,
        _ => {
            return Err(DoctestError::InvalidAilResult(
                "Encountered an AIL result with no controller name or an invalid value for the controller name.".into(),
            ))
        }
    };

    let invalid = |message: String| {
        Err(DoctestError::InvalidAilResult(format!(
            "The {name} AIL result {message}."
        )))
    };

    let Some(found_ail_version) = result.ail_version else {
        return invalid("has no AIL version".into());
    };
    let Some(found_open_api_version) = result.open_api_version else {
        return invalid("has no OpenAPI version".into());
    };
    let Some(paths) = result.paths else {
        return invalid("has no path results".into());
    };

    if found_ail_version.as_str() != Some(ail_version) {
        return invalid(format!(
            "has an incompatible AIL version of {}. {ail_version} was expected",
            render(&found_ail_version)
        ));
    }
    if found_open_api_version.as_str() != Some(open_api_version) {
        return invalid(format!(
            "has an incompatible OpenAPI version of {}. {open_api_version} was expected",
            render(&found_open_api_version)
        ));
    }
    if paths.is_empty() {
        return invalid("has no path results".into());
    }

    let item = AilCollectionItem {
        date_created: result.date_created.unwrap_or_default(),
        paths,
    };
    Ok((name, item))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
