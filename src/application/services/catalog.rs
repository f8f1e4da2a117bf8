//! Catalog loading service
//!
//! Resolves catalog arguments to files and parses them into trees.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{parse_catalog, Catalog};
use crate::infrastructure::traits::FileSystem;

/// Service for locating and reading catalog files.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    data_dir: PathBuf,
    extension: String,
}

impl CatalogService {
    /// Create a new catalog service resolving bare names against `settings.data_dir`.
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self {
            fs,
            data_dir: settings.data_dir.clone(),
            extension: settings.extension.clone(),
        }
    }

    /// Map a catalog argument to a file.
    ///
    /// An existing file is used as given. Otherwise the argument is treated as a
    /// bare name and looked up as `<data_dir>/<name>.<extension>`.
    pub fn resolve(&self, catalog: &str) -> ApplicationResult<PathBuf> {
        let given = Path::new(catalog);
        if self.fs.is_file(given) {
            return Ok(given.to_path_buf());
        }

        let file_name = if self.extension.is_empty() {
            catalog.to_string()
        } else {
            format!("{}.{}", catalog, self.extension)
        };
        let candidate = self.data_dir.join(file_name);
        debug!("resolve: {} -> {}", catalog, candidate.display());

        if self.fs.is_file(&candidate) {
            Ok(candidate)
        } else {
            Err(ApplicationError::CatalogNotFound(candidate))
        }
    }

    /// Read and parse the catalog at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn read(&self, path: &Path) -> ApplicationResult<Catalog> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read catalog", path)?;

        let catalog = parse_catalog(&content).map_err(|source| ApplicationError::InvalidCatalog {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("read {} courses from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Resolve and read in one step.
    pub fn load(&self, catalog: &str) -> ApplicationResult<Catalog> {
        let path = self.resolve(catalog)?;
        self.read(&path)
    }
}
