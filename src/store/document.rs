use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{Dataset, LabelStore, StoreError};
use crate::event::ComplexEvent;

/// A JSON document holding datasets addressed by path
/// (for example `/entry_0001/labels`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    #[serde(default)]
    pub datasets: BTreeMap<String, Dataset>,
}

impl LabelDocument {
    /// Read a document from disk.
    pub fn read(file: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(file).map_err(|source| StoreError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: file.to_path_buf(),
            source,
        })
    }

    /// Write the document to disk.
    ///
    /// The document is written to a temporary file next to `file` and then
    /// renamed over it, so readers never observe a half-written document.
    pub fn write(&self, file: &Path) -> Result<(), StoreError> {
        if let Ok(metadata) = fs::metadata(file)
            && metadata.permissions().readonly()
        {
            return Err(StoreError::ReadOnly);
        }
        let dir = file
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, self)
            .map_err(|source| StoreError::Serialize { source })?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        // The temp file is created owner-only; keep the document's mode.
        if let Ok(metadata) = fs::metadata(file) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_err)?;
        }
        tmp.persist(file).map_err(|err| StoreError::Persist {
            path: file.to_path_buf(),
            source: err.error,
        })?;
        Ok(())
    }
}

/// Label store backed by one dataset inside a [`LabelDocument`] file.
///
/// Every mutation rewrites the whole document and only updates the in-memory
/// dataset once the write succeeded.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    file: PathBuf,
    path: String,
    dataset: Dataset,
}

impl DocumentStore {
    /// Open the dataset at `path` inside `file`.
    pub fn open(file: impl Into<PathBuf>, path: impl Into<String>) -> Result<Self, StoreError> {
        let file = file.into();
        let path = path.into();
        let dataset = load_dataset(&file, &path)?;
        tracing::debug!(
            "Opened {} ({} labels) in {}",
            path,
            dataset.records.len(),
            file.display()
        );
        Ok(Self {
            file,
            path,
            dataset,
        })
    }

    /// Insert `dataset` at `path` inside `file`, creating the file if needed,
    /// and open it.
    pub fn create(
        file: impl Into<PathBuf>,
        path: impl Into<String>,
        dataset: Dataset,
    ) -> Result<Self, StoreError> {
        let file = file.into();
        let path = path.into();
        let mut document = if file.exists() {
            LabelDocument::read(&file)?
        } else {
            LabelDocument::default()
        };
        document.datasets.insert(path.clone(), dataset.clone());
        document.write(&file)?;
        Ok(Self {
            file,
            path,
            dataset,
        })
    }

    /// File holding the document.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Dataset path inside the document.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn commit(&mut self, next: Dataset) -> Result<(), StoreError> {
        let mut document = LabelDocument::read(&self.file)?;
        document.datasets.insert(self.path.clone(), next.clone());
        document.write(&self.file)?;
        self.dataset = next;
        Ok(())
    }
}

impl LabelStore for DocumentStore {
    fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn append(&mut self, record: ComplexEvent) -> Result<(), StoreError> {
        self.dataset.check_append()?;
        let mut next = self.dataset.clone();
        next.records.push(record);
        self.commit(next)
    }

    fn set(&mut self, index: usize, record: ComplexEvent) -> Result<(), StoreError> {
        self.dataset.check_index(index)?;
        let mut next = self.dataset.clone();
        next.records[index] = record;
        self.commit(next)
    }

    fn write_all(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError> {
        self.dataset.check_same_len(&records)?;
        let mut next = self.dataset.clone();
        next.records = records;
        self.commit(next)
    }

    fn replace(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError> {
        let next = self.dataset.replaced_with(records);
        self.commit(next)
    }

    fn refresh(&mut self) -> Result<(), StoreError> {
        self.dataset = load_dataset(&self.file, &self.path)?;
        Ok(())
    }
}

fn load_dataset(file: &Path, path: &str) -> Result<Dataset, StoreError> {
    LabelDocument::read(file)?
        .datasets
        .remove(path)
        .ok_or_else(|| StoreError::MissingDataset {
            path: path.to_string(),
        })
}
