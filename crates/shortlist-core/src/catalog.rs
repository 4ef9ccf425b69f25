//! In-memory catalog of assessment records keyed by canonical URL.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::AssessmentRecord;

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<AssessmentRecord>,
    by_id: HashMap<String, usize>,
}

impl CatalogStore {
    /// Builds the store from records in dataset order. A repeated id replaces
    /// the earlier record in place and is logged.
    pub fn from_records(records: Vec<AssessmentRecord>) -> Self {
        let mut store = Self { records: Vec::with_capacity(records.len()), by_id: HashMap::new() };
        for record in records {
            if let Some(&pos) = store.by_id.get(&record.id) {
                warn!(id = %record.id, "duplicate catalog id; keeping the later record");
                store.records[pos] = record;
                continue;
            }
            store.by_id.insert(record.id.clone(), store.records.len());
            store.records.push(record);
        }
        store
    }

    /// Loads the catalog JSON array. A missing or malformed file is a startup
    /// failure and reported as `IndexUnavailable`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::IndexUnavailable(format!("cannot read catalog {}: {e}", path.display())))?;
        let records: Vec<AssessmentRecord> = serde_json::from_str(&raw)
            .map_err(|e| Error::IndexUnavailable(format!("malformed catalog {}: {e}", path.display())))?;
        let store = Self::from_records(records);
        info!(records = store.len(), path = %path.display(), "catalog loaded");
        Ok(store)
    }

    pub fn get(&self, id: &str) -> Option<&AssessmentRecord> {
        self.by_id.get(id).map(|&pos| &self.records[pos])
    }

    /// Like [`get`](Self::get) but reports a dangling id as `RecordNotFound`.
    pub fn resolve(&self, id: &str) -> Result<&AssessmentRecord> {
        self.get(id).ok_or_else(|| Error::RecordNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessmentRecord> {
        self.records.iter()
    }
}
