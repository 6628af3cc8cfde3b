//! Sled-backed persistence for visited destinations.
//!
//! Visited state is append-only: a record is written on the first
//! successful arrival and never removed. Recording an already-visited
//! destination is a no-op that preserves the original first-visit
//! timestamp.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::IVec;

use crate::travel::errors::StoreError;
use crate::travel::types::{VisitedSet, VISIT_SCHEMA_VERSION};

const TREE_VISITS: &str = "waygate_visits";

/// One visited-destination record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitRecord {
    pub destination_id: String,
    pub first_visited_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl VisitRecord {
    fn new(destination_id: &str) -> Self {
        Self {
            destination_id: destination_id.to_ascii_lowercase(),
            first_visited_at: Utc::now(),
            schema_version: VISIT_SCHEMA_VERSION,
        }
    }
}

/// Helper builder so tests can easily create throwaway stores with
/// custom paths.
pub struct VisitedStoreBuilder {
    path: PathBuf,
}

impl VisitedStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<VisitedStore, StoreError> {
        VisitedStore::open(self.path)
    }
}

/// Sled-backed store of destinations the actor has reached.
pub struct VisitedStore {
    _db: sled::Db,
    visits: sled::Tree,
}

impl VisitedStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let visits = db.open_tree(TREE_VISITS)?;
        Ok(Self { _db: db, visits })
    }

    fn visit_key(destination_id: &str) -> Vec<u8> {
        format!("visits:{}", destination_id.to_ascii_lowercase()).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize(bytes: IVec) -> Result<VisitRecord, StoreError> {
        let record: VisitRecord = bincode::deserialize(&bytes)?;
        if record.schema_version != VISIT_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                entity: "visit",
                expected: VISIT_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Record a first arrival. Returns `true` when the destination was
    /// newly recorded; re-recording keeps the original timestamp.
    pub fn record_visit(&self, destination_id: &str) -> Result<bool, StoreError> {
        let key = Self::visit_key(destination_id);
        if self.visits.get(&key)?.is_some() {
            return Ok(false);
        }
        let record = VisitRecord::new(destination_id);
        self.visits.insert(key, Self::serialize(&record)?)?;
        Ok(true)
    }

    /// Fetch one visit record, if present.
    pub fn get_visit(&self, destination_id: &str) -> Result<Option<VisitRecord>, StoreError> {
        match self.visits.get(Self::visit_key(destination_id))? {
            Some(bytes) => Ok(Some(Self::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the full visited set into memory.
    pub fn load_visited_set(&self) -> Result<VisitedSet, StoreError> {
        let mut visited = VisitedSet::new();
        for entry in self.visits.iter() {
            let (_, bytes) = entry?;
            let record = Self::deserialize(bytes)?;
            visited.mark_visited(&record.destination_id);
        }
        Ok(visited)
    }
}
