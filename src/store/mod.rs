//! Persisted label datasets.
//!
//! The label plot never owns its records directly. It talks to a
//! [`LabelStore`] handle that appends, edits and replaces records in the
//! backing dataset. [`MemoryStore`] keeps everything in process;
//! [`DocumentStore`] persists datasets inside a JSON document on disk.

mod document;

pub use document::{DocumentStore, LabelDocument};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::ComplexEvent;

/// What a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Named intervals with start and stop.
    ComplexEvent,
    /// Bare event times.
    SimpleEvent,
    /// Regularly sampled data.
    Sampled,
}

/// Attributes read once when a label plot is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttrs {
    /// Time units of `start`/`stop`: `ms`, `samples` or anything else.
    #[serde(default)]
    pub units: Option<String>,
    /// Required when `units` is `samples`.
    #[serde(default)]
    pub sampling_rate: Option<f64>,
}

impl DatasetAttrs {
    /// Attributes for millisecond times.
    pub fn milliseconds() -> Self {
        Self {
            units: Some("ms".to_string()),
            sampling_rate: None,
        }
    }

    /// Attributes for sample-index times.
    pub fn samples(sampling_rate: f64) -> Self {
        Self {
            units: Some("samples".to_string()),
            sampling_rate: Some(sampling_rate),
        }
    }
}

/// A resizable dataset of label records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub kind: DatasetKind,
    /// Maximum number of records; `None` means unbounded.
    #[serde(default)]
    pub max_len: Option<usize>,
    #[serde(default)]
    pub attrs: DatasetAttrs,
    #[serde(default)]
    pub records: Vec<ComplexEvent>,
}

impl Dataset {
    /// Create an unbounded complex event dataset.
    pub fn complex_events(attrs: DatasetAttrs, records: Vec<ComplexEvent>) -> Self {
        Self {
            kind: DatasetKind::ComplexEvent,
            max_len: None,
            attrs,
            records,
        }
    }

    /// Copy of this dataset holding `records`, with an unbounded maximum length.
    pub(crate) fn replaced_with(&self, records: Vec<ComplexEvent>) -> Self {
        Self {
            kind: self.kind,
            max_len: None,
            attrs: self.attrs.clone(),
            records,
        }
    }

    pub(crate) fn check_append(&self) -> Result<(), StoreError> {
        match self.max_len {
            Some(max_len) if self.records.len() >= max_len => Err(StoreError::Full { max_len }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    pub(crate) fn check_same_len(&self, records: &[ComplexEvent]) -> Result<(), StoreError> {
        if records.len() == self.records.len() {
            Ok(())
        } else {
            Err(StoreError::LengthMismatch {
                expected: self.records.len(),
                actual: records.len(),
            })
        }
    }
}

/// Errors raised by label stores.
///
/// A failed operation never leaves a store partially updated.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse label document {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize label document: {source}")]
    Serialize { source: serde_json::Error },
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No dataset at {path}")]
    MissingDataset { path: String },
    #[error("Dataset is read-only")]
    ReadOnly,
    #[error("Dataset is full ({max_len} records)")]
    Full { max_len: usize },
    #[error("Index {index} out of range for {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Expected {expected} records, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Handle to a persisted, ordered sequence of label records.
pub trait LabelStore {
    /// Current contents and attributes of the dataset.
    fn dataset(&self) -> &Dataset;

    /// Append one record, growing the dataset by one.
    fn append(&mut self, record: ComplexEvent) -> Result<(), StoreError>;

    /// Overwrite the record at `index`.
    fn set(&mut self, index: usize, record: ComplexEvent) -> Result<(), StoreError>;

    /// Overwrite every record in place; the length must not change.
    fn write_all(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError>;

    /// Replace the dataset's contents, keeping kind and attributes and an
    /// unbounded maximum length. Either everything is replaced or nothing is.
    fn replace(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError>;

    /// Re-fetch the canonical dataset after a replace.
    fn refresh(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// All records in stored order.
    fn records(&self) -> &[ComplexEvent] {
        &self.dataset().records
    }

    /// Number of records.
    fn len(&self) -> usize {
        self.dataset().records.len()
    }

    /// Check whether the dataset has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at `index`.
    fn get(&self, index: usize) -> Option<&ComplexEvent> {
        self.dataset().records.get(index)
    }
}

/// In-process label store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dataset: Dataset,
    read_only: bool,
}

impl MemoryStore {
    /// Wrap a dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            read_only: false,
        }
    }

    /// Unbounded complex event store with the given records.
    pub fn complex_events(attrs: DatasetAttrs, records: Vec<ComplexEvent>) -> Self {
        Self::new(Dataset::complex_events(attrs, records))
    }

    /// Reject every mutation with [`StoreError::ReadOnly`].
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl LabelStore for MemoryStore {
    fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn append(&mut self, record: ComplexEvent) -> Result<(), StoreError> {
        self.check_writable()?;
        self.dataset.check_append()?;
        self.dataset.records.push(record);
        Ok(())
    }

    fn set(&mut self, index: usize, record: ComplexEvent) -> Result<(), StoreError> {
        self.check_writable()?;
        self.dataset.check_index(index)?;
        self.dataset.records[index] = record;
        Ok(())
    }

    fn write_all(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError> {
        self.check_writable()?;
        self.dataset.check_same_len(&records)?;
        self.dataset.records = records;
        Ok(())
    }

    fn replace(&mut self, records: Vec<ComplexEvent>) -> Result<(), StoreError> {
        self.check_writable()?;
        self.dataset = self.dataset.replaced_with(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::complex_events(
            DatasetAttrs::milliseconds(),
            vec![
                ComplexEvent::new("a", 0.0, 10.0),
                ComplexEvent::new("b", 20.0, 30.0),
            ],
        )
    }

    #[test]
    fn append_and_set() {
        let mut store = store();
        store.append(ComplexEvent::instant("c", 40.0)).unwrap();
        assert_eq!(store.len(), 3);
        store.set(2, ComplexEvent::new("c", 40.0, 45.0)).unwrap();
        assert_eq!(store.get(2).unwrap().stop, 45.0);
        assert!(matches!(
            store.set(3, ComplexEvent::instant("d", 0.0)),
            Err(StoreError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn write_all_requires_same_length() {
        let mut store = store();
        let err = store
            .write_all(vec![ComplexEvent::instant("a", 0.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_keeps_attrs_and_unbounds() {
        let mut dataset = Dataset::complex_events(DatasetAttrs::samples(100.0), Vec::new());
        dataset.max_len = Some(4);
        let mut store = MemoryStore::new(dataset);
        store.replace(vec![ComplexEvent::instant("x", 1.0)]).unwrap();
        assert_eq!(store.dataset().max_len, None);
        assert_eq!(store.dataset().attrs, DatasetAttrs::samples(100.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn bounded_dataset_rejects_growth() {
        let mut dataset = Dataset::complex_events(DatasetAttrs::default(), Vec::new());
        dataset.max_len = Some(1);
        let mut store = MemoryStore::new(dataset);
        store.append(ComplexEvent::instant("a", 0.0)).unwrap();
        assert!(matches!(
            store.append(ComplexEvent::instant("b", 1.0)),
            Err(StoreError::Full { max_len: 1 })
        ));
    }

    #[test]
    fn read_only_store_rejects_mutation() {
        let mut store = store().read_only();
        assert!(matches!(store.replace(Vec::new()), Err(StoreError::ReadOnly)));
        assert!(matches!(
            store.append(ComplexEvent::instant("c", 1.0)),
            Err(StoreError::ReadOnly)
        ));
        assert_eq!(store.len(), 2);
    }
}
