//! # AIL Manager
//!
//! Turns consumed containers into AIL documents and stores them with the
//! configured storage engine.
//!
//! The manager is an explicit handle: [`AilManager::init`] validates the
//! configuration and prepares storage, and every later call goes through the
//! returned value. One handle per test process.

use crate::ail::{factory, AilDocument};
use crate::config::{
    load_config, DoctestConfig, StorageEngine, DEFAULT_CONFIG_PATH, DEFAULT_RESULTS_DIRECTORY,
};
use crate::error::{AppResult, DoctestError};
use crate::raw::RawDocContainer;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix of every persisted AIL document.
pub const AIL_FILE_SUFFIX: &str = ".ail.json";

/// Settings the manager needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AilManagerConfig {
    /// Storage engine for AIL documents.
    pub storage_engine: StorageEngine,
    /// Target directory for the FILE engine.
    pub results_directory: Option<PathBuf>,
}

impl AilManagerConfig {
    /// In-memory storage.
    pub fn memory() -> Self {
        Self {
            storage_engine: StorageEngine::Memory,
            results_directory: None,
        }
    }

    /// File storage under `directory`.
    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            storage_engine: StorageEngine::File,
            results_directory: Some(directory.into()),
        }
    }
}

impl From<&DoctestConfig> for AilManagerConfig {
    fn from(config: &DoctestConfig) -> Self {
        Self {
            storage_engine: config.storage_engine,
            results_directory: Some(config.results_directory.clone()),
        }
    }
}

/// How the manager finds its configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerInit {
    /// Read `doctest.json` from the working directory.
    Default,
    /// Read a JSON configuration file.
    Path(PathBuf),
    /// Use the given settings.
    Config(AilManagerConfig),
}

impl From<AilManagerConfig> for ManagerInit {
    fn from(config: AilManagerConfig) -> Self {
        Self::Config(config)
    }
}

impl From<PathBuf> for ManagerInit {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ManagerInit {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

#[derive(Debug)]
enum AilStore {
    File { directory: PathBuf },
    Memory(IndexMap<String, AilDocument>),
}

/// Converts raw containers into stored AIL documents.
#[derive(Debug)]
pub struct AilManager {
    store: AilStore,
}

impl AilManager {
    /// Resolves the configuration and prepares the storage engine.
    ///
    /// For the FILE engine the results directory is created if missing; a
    /// plain file occupying that path is removed first.
    pub fn init(init: impl Into<ManagerInit>) -> AppResult<Self> {
        let config = match init.into() {
            ManagerInit::Config(config) => config,
            ManagerInit::Path(path) => config_from_filesystem(&path)?,
            ManagerInit::Default => config_from_filesystem(Path::new(DEFAULT_CONFIG_PATH))?,
        };

        let store = match config.storage_engine {
            StorageEngine::File => {
                let directory = config
                    .results_directory
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIRECTORY));
                ensure_results_directory(&directory)?;
                AilStore::File { directory }
            }
            StorageEngine::Memory => AilStore::Memory(IndexMap::new()),
        };

        Ok(Self { store })
    }

    /// The engine documents are stored with.
    pub fn storage_engine(&self) -> StorageEngine {
        match self.store {
            AilStore::File { .. } => StorageEngine::File,
            AilStore::Memory(_) => StorageEngine::Memory,
        }
    }

    /// The results directory, for the FILE engine.
    pub fn results_directory(&self) -> Option<&Path> {
        match &self.store {
            AilStore::File { directory } => Some(directory),
            AilStore::Memory(_) => None,
        }
    }

    /// Where a controller's document is written, for the FILE engine.
    pub fn result_file_path(&self, controller: &str) -> Option<PathBuf> {
        self.results_directory()
            .map(|dir| dir.join(format!("{controller}{AIL_FILE_SUFFIX}")))
    }

    /// Consumes a container, converts its data and stores the document under
    /// the controller's name.
    pub fn consume_container(&mut self, container: &mut RawDocContainer) -> AppResult<()> {
        let contents = container.consume()?;
        let document = factory::create(&contents.controller, &contents.paths, &contents.options())?;
        debug!(controller = %contents.controller, "Consumed container");

        match &mut self.store {
            AilStore::File { directory } => {
                let path = directory.join(format!("{}{AIL_FILE_SUFFIX}", contents.controller));
                write_json_file(&path, &document)?;
                info!(
                    "Wrote the {} controller's API results to the following file: {}",
                    contents.controller,
                    path.display()
                );
            }
            AilStore::Memory(documents) => {
                documents.insert(contents.controller, document);
            }
        }

        Ok(())
    }

    /// A stored document, for the MEMORY engine.
    pub fn document(&self, controller: &str) -> Option<&AilDocument> {
        match &self.store {
            AilStore::Memory(documents) => documents.get(controller),
            AilStore::File { .. } => None,
        }
    }

    /// All stored documents in insertion order; empty for the FILE engine.
    pub fn documents(&self) -> Vec<&AilDocument> {
        match &self.store {
            AilStore::Memory(documents) => documents.values().collect(),
            AilStore::File { .. } => Vec::new(),
        }
    }

    /// Releases the stored documents; empty for the FILE engine.
    pub fn into_documents(self) -> Vec<AilDocument> {
        match self.store {
            AilStore::Memory(documents) => documents.into_values().collect(),
            AilStore::File { .. } => Vec::new(),
        }
    }
}

fn config_from_filesystem(path: &Path) -> AppResult<AilManagerConfig> {
    if !path.is_file() {
        return Err(DoctestError::Config(format!(
            "No configuration was supplied and no {} file could be found",
            path.display()
        )));
    }
    Ok(AilManagerConfig::from(&load_config(path)?))
}

fn ensure_results_directory(directory: &Path) -> AppResult<()> {
    match fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            info!("API Test results is not a directory. Deleting file.");
            fs::remove_file(directory).map_err(|source| DoctestError::FileWrite {
                path: directory.display().to_string(),
                source,
            })?;
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            info!("API Test results directory does not exist!");
        }
        Err(e) => {
            return Err(DoctestError::FileRead {
                path: directory.display().to_string(),
                reason: e.to_string(),
            })
        }
    }

    info!("Creating the API Test results directory");
    fs::create_dir_all(directory).map_err(|source| DoctestError::FileWrite {
        path: directory.display().to_string(),
        source,
    })
}

/// Writes compact JSON followed by a newline.
pub(crate) fn write_json_file<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let mut json = serde_json::to_string(value)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| DoctestError::FileWrite {
        path: path.display().to_string(),
        source,
    })
}
