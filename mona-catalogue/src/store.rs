//! Whole-document catalogue persistence.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::CatalogueResult;
use crate::model::Catalogue;

/// Trait implemented by catalogue backends.
#[async_trait]
pub trait CatalogueStore: Send + Sync {
    /// Reads the full catalogue.
    async fn load(&self) -> CatalogueResult<Catalogue>;

    /// Replaces the stored catalogue with `catalogue`.
    async fn save(&self, catalogue: &Catalogue) -> CatalogueResult<()>;
}

/// File-backed store holding the catalogue as one pretty-printed JSON document.
///
/// Every [`save`](CatalogueStore::save) first copies the current file to a
/// sibling with a `.backup` suffix, replacing the previous backup. The new
/// content is written to a `.tmp` sibling and renamed over the document, so
/// readers never observe a partly written file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    backup_path: PathBuf,
    staging_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            backup_path: sibling(&path, ".backup"),
            staging_path: sibling(&path, ".tmp"),
            path,
        }
    }

    /// Returns the path of the catalogue document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the pre-write snapshot.
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}

#[async_trait]
impl CatalogueStore for JsonFileStore {
    async fn load(&self) -> CatalogueResult<Catalogue> {
        let data = fs::read(&self.path).await?;
        let catalogue = Catalogue::from_slice(&data)?;
        debug!(
            path = %self.path.display(),
            museums = catalogue.museums().count(),
            artworks = catalogue.artwork_count(),
            "catalogue loaded"
        );
        Ok(catalogue)
    }

    async fn save(&self, catalogue: &Catalogue) -> CatalogueResult<()> {
        // Render first so a serialization failure leaves both files untouched.
        let rendered = catalogue.to_pretty_json()?;

        match fs::read(&self.path).await {
            Ok(previous) => fs::write(&self.backup_path, previous).await?,
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        fs::write(&self.staging_path, rendered).await?;
        fs::rename(&self.staging_path, &self.path).await?;
        debug!(path = %self.path.display(), "catalogue saved");
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
