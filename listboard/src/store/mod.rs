//! Ordered record stores with a monotonic id counter, mirrored to a JSON
//! snapshot after every mutation.

pub mod snapshot;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use snapshot::{FileMedium, SnapshotFile, SnapshotMedium};

/// Error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The snapshot medium could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The in-memory records could not be serialized.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// The snapshot document is not valid JSON or does not match the records.
    #[error("Malformed snapshot: {0}")]
    Decode(#[source] serde_json::Error),
    /// The snapshot document is valid JSON but not an object.
    #[error("Snapshot is not a JSON object")]
    NotAnObject,
}

/// An entity kept in a [`Store`].
pub trait Record: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    /// Snapshot key holding the record list.
    const LIST_KEY: &'static str;
    /// Snapshot key holding the next-id counter.
    const COUNTER_KEY: &'static str;

    fn id(&self) -> u32;
}

/// Whether an operation changed the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    Unchanged,
}

/// What happened when the state was flushed to the snapshot.
#[derive(Debug)]
pub enum Flush {
    Written,
    /// Nothing was written because nothing needed writing.
    Skipped,
    Failed(StoreError),
}

/// Result of a store operation. A failed flush never undoes the in-memory
/// change; the in-memory state stays authoritative.
#[derive(Debug)]
pub struct Outcome {
    pub change: Change,
    pub flush: Flush,
}

impl Outcome {
    /// An operation that touched neither memory nor disk.
    pub fn unchanged() -> Self {
        Self {
            change: Change::Unchanged,
            flush: Flush::Skipped,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.change == Change::Applied
    }

    /// `false` only when a flush was attempted and failed.
    pub fn is_persisted(&self) -> bool {
        !matches!(self.flush, Flush::Failed(_))
    }
}

/// An ordered sequence of records plus the id counter, bound to a snapshot.
pub struct Store<R: Record> {
    records: Vec<R>,
    next_id: u32,
    snapshot: SnapshotFile,
}

impl<R: Record> Store<R> {
    /// Opens a store over the given medium, loading whatever it holds.
    pub fn open(medium: impl SnapshotMedium + 'static) -> Self {
        let snapshot = SnapshotFile::new(medium, R::LIST_KEY, R::COUNTER_KEY);
        let (mut records, next_id) = snapshot.load::<R>();
        // A stale counter must never hand out an id that is already taken.
        let floor = match records.iter().map(Record::id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        let next_id = match floor {
            Some(floor) => next_id.max(floor),
            None => {
                tracing::warn!(
                    "Ignoring snapshot at {}, no {} ids left, starting empty",
                    snapshot.location(),
                    R::LIST_KEY
                );
                records.clear();
                1
            }
        };
        tracing::info!(
            "Loaded {} {} from {}, next id {}",
            records.len(),
            R::LIST_KEY,
            snapshot.location(),
            next_id
        );
        Self {
            records,
            next_id,
            snapshot,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Appends the record built from the next id and flushes.
    /// Leaves everything untouched once the counter cannot advance any further.
    pub fn insert_with(&mut self, build: impl FnOnce(u32) -> R) -> Outcome {
        let id = self.next_id;
        let Some(next_id) = id.checked_add(1) else {
            tracing::warn!("No {} ids left, ignoring insert", R::LIST_KEY);
            return Outcome::unchanged();
        };
        self.records.push(build(id));
        self.next_id = next_id;
        self.flush(Change::Applied)
    }

    /// Applies `update` to the first record with the given id, then flushes
    /// whether or not a record matched.
    pub fn update_first(&mut self, id: u32, update: impl FnOnce(&mut R)) -> Outcome {
        let change = match self.records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                update(record);
                Change::Applied
            }
            None => Change::Unchanged,
        };
        self.flush(change)
    }

    /// Removes every record with the given id, then flushes whether or not a
    /// record matched.
    pub fn remove_all(&mut self, id: u32) -> Outcome {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        let change = if self.records.len() < before {
            Change::Applied
        } else {
            Change::Unchanged
        };
        self.flush(change)
    }

    fn flush(&self, change: Change) -> Outcome {
        let flush = match self.snapshot.save(&self.records, self.next_id) {
            Ok(()) => Flush::Written,
            Err(err) => {
                tracing::warn!(
                    "Failed to persist {} to {}: {}",
                    R::LIST_KEY,
                    self.snapshot.location(),
                    err
                );
                Flush::Failed(err)
            }
        };
        Outcome { change, flush }
    }
}
