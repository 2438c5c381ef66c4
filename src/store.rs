//! Flat record store: keyed collections of JSON records with typed partial updates.
//!
//! The engine only talks to [`RecordStore`]. [`MemoryStore`] keeps every collection in
//! memory as `serde_json::Value`s (insertion order preserved) and can optionally be
//! backed by a single JSON file that is rewritten on [`MemoryStore::flush`].

use crate::models::{
    BracketMatch, MatchUpdate, Participant, ParticipantUpdate, Standings, Tournament,
    TournamentUpdate,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    RecordNotFound { collection: &'static str, id: Uuid },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A record kept in a named collection.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// A record that can be changed in place after it is inserted.
pub trait Updatable: Record {
    /// Typed partial update merged into the record by [`Updatable::apply`].
    type Update;

    fn apply(&mut self, update: Self::Update);
}

impl Record for Tournament {
    const COLLECTION: &'static str = "tournaments";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Updatable for Tournament {
    type Update = TournamentUpdate;

    fn apply(&mut self, update: TournamentUpdate) {
        update.apply_to(self);
    }
}

impl Record for Participant {
    const COLLECTION: &'static str = "participants";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Updatable for Participant {
    type Update = ParticipantUpdate;

    fn apply(&mut self, update: ParticipantUpdate) {
        update.apply_to(self);
    }
}

impl Record for BracketMatch {
    const COLLECTION: &'static str = "matches";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Updatable for BracketMatch {
    type Update = MatchUpdate;

    fn apply(&mut self, update: MatchUpdate) {
        update.apply_to(self);
    }
}

/// Standings are write-once, so they are not [`Updatable`].
impl Record for Standings {
    const COLLECTION: &'static str = "standings";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Generic keyed collection storage consumed by the bracket engine.
pub trait RecordStore {
    /// Append a record and return it as stored.
    fn insert<R: Record>(&mut self, record: R) -> Result<R, StoreError>;

    /// Merge `update` into the record with `id` and return the new value.
    fn update<R: Updatable>(&mut self, id: Uuid, update: R::Update) -> Result<R, StoreError>;

    /// Remove one record. Returns false if nothing had that id.
    fn delete<R: Record>(&mut self, id: Uuid) -> Result<bool, StoreError>;

    /// Remove every record matching `predicate`; returns how many were removed.
    fn delete_where<R, F>(&mut self, predicate: F) -> Result<usize, StoreError>
    where
        R: Record,
        F: Fn(&R) -> bool;

    /// All matching records in insertion order.
    fn find<R, F>(&self, predicate: F) -> Result<Vec<R>, StoreError>
    where
        R: Record,
        F: Fn(&R) -> bool;

    fn get_by_id<R: Record>(&self, id: Uuid) -> Result<Option<R>, StoreError>;
}

/// On-disk / in-memory layout: collection name -> records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Collections(BTreeMap<String, Vec<Value>>);

/// In-memory JSON record store, optionally persisted to a file.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collections: Collections,
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Empty store that never touches the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path` if the file exists; later flushes write back to it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let collections = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Collections::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Collections::default()
        };
        log::info!(
            "Opened record store at {} ({} collection(s))",
            path.display(),
            collections.0.len()
        );
        Ok(Self {
            collections,
            path: Some(path),
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    /// Write all collections to the backing file (temp file + rename). No-op when in-memory.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&self.collections)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    fn records(&self, collection: &str) -> &[Value] {
        self.collections
            .0
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn records_mut(&mut self, collection: &str) -> &mut Vec<Value> {
        self.collections.0.entry(collection.to_string()).or_default()
    }

    fn position<R: Record>(&self, id: Uuid) -> Result<Option<usize>, StoreError> {
        for (i, value) in self.records(R::COLLECTION).iter().enumerate() {
            if R::deserialize(value)?.id() == id {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

impl RecordStore for MemoryStore {
    fn insert<R: Record>(&mut self, record: R) -> Result<R, StoreError> {
        let value = serde_json::to_value(&record)?;
        self.records_mut(R::COLLECTION).push(value);
        Ok(record)
    }

    fn update<R: Updatable>(&mut self, id: Uuid, update: R::Update) -> Result<R, StoreError> {
        let idx = self
            .position::<R>(id)?
            .ok_or(StoreError::RecordNotFound {
                collection: R::COLLECTION,
                id,
            })?;
        let slot = &mut self.records_mut(R::COLLECTION)[idx];
        let mut record = R::deserialize(&*slot)?;
        record.apply(update);
        *slot = serde_json::to_value(&record)?;
        Ok(record)
    }

    fn delete<R: Record>(&mut self, id: Uuid) -> Result<bool, StoreError> {
        match self.position::<R>(id)? {
            Some(idx) => {
                self.records_mut(R::COLLECTION).remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_where<R, F>(&mut self, predicate: F) -> Result<usize, StoreError>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        let records = self.records_mut(R::COLLECTION);
        // Decide everything before touching the collection so a bad record leaves it intact.
        let mut doomed = Vec::with_capacity(records.len());
        for value in records.iter() {
            doomed.push(predicate(&R::deserialize(value)?));
        }
        let before = records.len();
        let mut flags = doomed.into_iter();
        records.retain(|_| !flags.next().unwrap_or(false));
        Ok(before - records.len())
    }

    fn find<R, F>(&self, predicate: F) -> Result<Vec<R>, StoreError>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        let mut out = Vec::new();
        for value in self.records(R::COLLECTION) {
            let record = R::deserialize(value)?;
            if predicate(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn get_by_id<R: Record>(&self, id: Uuid) -> Result<Option<R>, StoreError> {
        for value in self.records(R::COLLECTION) {
            let record = R::deserialize(value)?;
            if record.id() == id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}
