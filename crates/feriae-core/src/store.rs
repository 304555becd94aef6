//! In-process holiday record store.
//!
//! [`HolidayStore`] keeps records ordered by id, skips natural-key conflicts on
//! insert, and can be saved to / loaded from a JSON snapshot file. The server
//! loads a snapshot once at startup and only reads from it; the ingestion job
//! loads, inserts, and saves.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::holiday::{NaturalKey, NewHoliday, PublicHoliday};

/// Ordered record store.
#[derive(Debug, Clone)]
pub struct HolidayStore {
    records: BTreeMap<u64, PublicHoliday>,
    keys: HashSet<NaturalKey>,
    next_id: u64,
}

impl Default for HolidayStore {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk snapshot layout.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    next_id: u64,
    records: Vec<PublicHoliday>,
}

impl HolidayStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            keys: HashSet::new(),
            next_id: 1,
        }
    }

    /// Load a store from a JSON snapshot. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        let mut store = Self::new();
        for record in snapshot.records {
            if store.records.contains_key(&record.id) {
                return Err(Error::store(format!(
                    "duplicate id {} in snapshot {}",
                    record.id,
                    path.display()
                )));
            }
            if !store.keys.insert(record.natural_key()) {
                return Err(Error::store(format!(
                    "duplicate record in snapshot {}: {record}",
                    path.display()
                )));
            }
            store.next_id = store.next_id.max(record.id + 1);
            store.records.insert(record.id, record);
        }
        store.next_id = store.next_id.max(snapshot.next_id);

        log::info!(
            "Loaded {} holiday records from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Write the store to a JSON snapshot, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }

        let snapshot = Snapshot {
            next_id: self.next_id,
            records: self.records.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| Error::io_with_path(e, &tmp))?;
        std::fs::rename(&tmp, path).map_err(|e| Error::io_with_path(e, path))?;

        log::info!("Saved {} holiday records to {}", self.len(), path.display());
        Ok(())
    }

    /// Insert new holidays, skipping any whose natural key already exists.
    ///
    /// Returns the number of records actually inserted.
    pub fn insert_new(&mut self, holidays: impl IntoIterator<Item = NewHoliday>) -> usize {
        let mut inserted = 0;
        for holiday in holidays {
            if !self.keys.insert(holiday.natural_key()) {
                log::debug!(
                    "Skipping existing holiday {} {} ({})",
                    holiday.country,
                    holiday.date,
                    holiday.local_name
                );
                continue;
            }
            let id = self.next_id;
            self.next_id += 1;
            self.records.insert(id, holiday.into_record(id));
            inserted += 1;
        }
        inserted
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&PublicHoliday> {
        self.records.get(&id)
    }

    /// All records ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &PublicHoliday> {
        self.records.values()
    }

    /// A window of records ordered by id.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<&PublicHoliday> {
        self.records.values().skip(offset).take(limit).collect()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
