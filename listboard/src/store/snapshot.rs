//! Whole-document JSON snapshots of a store.
//!
//! A snapshot is a single JSON object holding the record list under one key
//! and the next-id counter under another:
//!
//! ```json
//! { "todos": [ ... ], "next_id": 4 }
//! ```
//!
//! Every save overwrites the document in full.

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs;
use std::io;
use std::path::PathBuf;

use super::StoreError;

/// Where a snapshot document lives.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotMedium: Send {
    /// Reads the whole document.
    fn read(&self) -> io::Result<String>;
    /// Replaces the whole document.
    fn write(&self, contents: &str) -> io::Result<()>;
    /// Human readable location, used in logs.
    fn location(&self) -> String;
}

/// A snapshot document on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotMedium for FileMedium {
    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    /// Writes to a sibling temp file first and renames it over the target,
    /// so a crash mid-write leaves the previous snapshot intact.
    fn write(&self, contents: &str) -> io::Result<()> {
        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Binds one store to one snapshot document and its pair of keys.
pub struct SnapshotFile {
    medium: Box<dyn SnapshotMedium>,
    list_key: &'static str,
    counter_key: &'static str,
}

impl SnapshotFile {
    pub fn new(
        medium: impl SnapshotMedium + 'static,
        list_key: &'static str,
        counter_key: &'static str,
    ) -> Self {
        Self {
            medium: Box::new(medium),
            list_key,
            counter_key,
        }
    }

    pub fn location(&self) -> String {
        self.medium.location()
    }

    /// Loads the records and counter, falling back to an empty list and a
    /// counter of 1 when the document is missing or unusable.
    #[tracing::instrument(skip(self), fields(location = %self.medium.location()))]
    pub fn load<R: DeserializeOwned>(&self) -> (Vec<R>, u32) {
        match self.try_load() {
            Ok(state) => state,
            Err(StoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No snapshot yet, starting empty");
                (Vec::new(), 1)
            }
            Err(err) => {
                tracing::warn!("Ignoring unusable snapshot, starting empty: {}", err);
                (Vec::new(), 1)
            }
        }
    }

    /// Like [`SnapshotFile::load`] but reports why a document was unusable.
    pub fn try_load<R: DeserializeOwned>(&self) -> Result<(Vec<R>, u32), StoreError> {
        let contents = self.medium.read()?;
        let document: serde_json::Value =
            serde_json::from_str(&contents).map_err(StoreError::Decode)?;
        let serde_json::Value::Object(mut fields) = document else {
            return Err(StoreError::NotAnObject);
        };

        let records = match fields.remove(self.list_key) {
            Some(list) => serde_json::from_value(list).map_err(StoreError::Decode)?,
            None => Vec::new(),
        };
        // A bad counter alone is dropped; the store rebuilds it from the record ids.
        let next_id = match fields.remove(self.counter_key) {
            Some(counter) => serde_json::from_value(counter).unwrap_or_else(|err| {
                tracing::warn!("Ignoring unusable {}: {}", self.counter_key, err);
                1
            }),
            None => 1,
        };
        Ok((records, next_id))
    }

    /// Overwrites the document with the given records and counter.
    pub fn save<R: Serialize>(&self, records: &[R], next_id: u32) -> Result<(), StoreError> {
        let document = Document {
            list_key: self.list_key,
            records,
            counter_key: self.counter_key,
            next_id,
        };
        let contents = serde_json::to_string_pretty(&document).map_err(StoreError::Encode)?;
        self.medium.write(&contents)?;
        Ok(())
    }
}

struct Document<'a, R> {
    list_key: &'a str,
    records: &'a [R],
    counter_key: &'a str,
    next_id: u32,
}

impl<R: Serialize> Serialize for Document<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.list_key, self.records)?;
        map.serialize_entry(self.counter_key, &self.next_id)?;
        map.end()
    }
}
