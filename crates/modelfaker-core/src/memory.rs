//! In-memory store backed by a JSON dataset snapshot.
//!
//! Used by the CLI to fake an exported dataset and by tests as a stand-in
//! for a real database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::OpenOptions;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::record::{Record, RecordId};
use crate::selection::Selection;
use crate::store::{DataStore, Uniqueness};
use crate::value::Value;

/// Serializable form of a whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub models: BTreeMap<String, ModelSnapshot>,
}

/// Rows and uniqueness rules of one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Each entry is a set of fields that must be unique together.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique: Vec<Vec<String>>,
    #[serde(default)]
    pub records: Vec<RecordSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
struct ModelTable {
    unique: Vec<UniqueSet>,
    next_id: RecordId,
    rows: BTreeMap<RecordId, BTreeMap<String, Value>>,
}

impl ModelTable {
    /// Replaces the uniqueness rules and indexes the current rows under them.
    fn set_unique(&mut self, unique: Vec<Vec<String>>) {
        self.unique = unique.into_iter().map(UniqueSet::new).collect();
        for (id, fields) in &self.rows {
            for set in &mut self.unique {
                set.add(*id, fields);
            }
        }
    }

    fn unique_fields(&self) -> Vec<Vec<String>> {
        self.unique.iter().map(|set| set.fields.clone()).collect()
    }

    fn put(&mut self, id: RecordId, fields: BTreeMap<String, Value>) {
        self.remove(id);
        for set in &mut self.unique {
            set.add(id, &fields);
        }
        self.rows.insert(id, fields);
    }

    fn remove(&mut self, id: RecordId) -> bool {
        let Some(fields) = self.rows.remove(&id) else {
            return false;
        };
        for set in &mut self.unique {
            set.drop_owner(id, &fields);
        }
        true
    }

    fn conflicts(&self, record: &Record) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        for set in &self.unique {
            if set.collides(record) {
                fields.extend(set.fields.iter().cloned());
            }
        }
        fields
    }
}

/// Index of one uniqueness rule: combined field key -> ids holding it.
///
/// Rows loaded from a dataset may already share a key, so a key can have
/// several owners.
#[derive(Debug, Clone, Default)]
struct UniqueSet {
    fields: Vec<String>,
    owners: HashMap<String, BTreeSet<RecordId>>,
}

impl UniqueSet {
    fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            owners: HashMap::new(),
        }
    }

    /// `None` when any field is NULL or absent: NULL never collides, as in SQL.
    fn key_for(&self, row: &BTreeMap<String, Value>) -> Option<String> {
        let mut parts = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            match row.get(field) {
                None | Some(Value::Null) => return None,
                Some(value) => parts.push(value.unique_key()),
            }
        }
        Some(parts.join("|"))
    }

    fn add(&mut self, id: RecordId, row: &BTreeMap<String, Value>) {
        if let Some(key) = self.key_for(row) {
            self.owners.entry(key).or_default().insert(id);
        }
    }

    fn drop_owner(&mut self, id: RecordId, row: &BTreeMap<String, Value>) {
        let Some(key) = self.key_for(row) else {
            return;
        };
        if let Some(ids) = self.owners.get_mut(&key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.owners.remove(&key);
            }
        }
    }

    fn collides(&self, record: &Record) -> bool {
        self.key_for(&record.fields)
            .and_then(|key| self.owners.get(&key))
            .is_some_and(|ids| ids.iter().any(|owner| *owner != record.id))
    }
}

/// A `DataStore` keeping every model in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    models: BTreeMap<String, ModelTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model, optionally with fields that must be unique together.
    pub fn define_model(&mut self, model: impl Into<String>, unique: Vec<Vec<String>>) {
        let table = self.models.entry(model.into()).or_default();
        table.set_unique(unique);
    }

    /// Inserts a new row, assigning the next primary key.
    ///
    /// Unknown models are created on the fly without uniqueness rules.
    pub fn insert<I, K, V>(&mut self, model: &str, fields: I) -> Record
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let table = self.models.entry(model.to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;
        let fields: BTreeMap<String, Value> = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        table.put(id, fields.clone());
        Record {
            model: model.to_string(),
            id,
            fields,
        }
    }

    pub fn get(&self, model: &str, id: RecordId) -> Option<Record> {
        let row = self.models.get(model)?.rows.get(&id)?;
        Some(Record {
            model: model.to_string(),
            id,
            fields: row.clone(),
        })
    }

    pub fn count(&self, model: &str) -> usize {
        self.models.get(model).map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn ids(&self, model: &str) -> Vec<RecordId> {
        self.models
            .get(model)
            .map(|table| table.rows.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut models = BTreeMap::new();
        for (name, snapshot) in dataset.models {
            let mut table = ModelTable::default();
            for record in snapshot.records {
                table.next_id = table.next_id.max(record.id);
                table.rows.insert(record.id, record.fields);
            }
            table.set_unique(snapshot.unique);
            models.insert(name, table);
        }
        Self { models }
    }

    pub fn to_dataset(&self) -> Dataset {
        let models = self
            .models
            .iter()
            .map(|(name, table)| {
                let records = table
                    .rows
                    .iter()
                    .map(|(id, fields)| RecordSnapshot {
                        id: *id,
                        fields: fields.clone(),
                    })
                    .collect();
                (
                    name.clone(),
                    ModelSnapshot {
                        unique: table.unique_fields(),
                        records,
                    },
                )
            })
            .collect();
        Dataset { models }
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;
        serde_json::to_writer_pretty(file, &self.to_dataset()).map_err(StoreError::from)
    }

    fn table(&self, model: &str) -> Result<&ModelTable> {
        self.models
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))
    }
}

impl DataStore for MemoryStore {
    fn filter(&self, selection: &Selection) -> Result<Vec<Record>> {
        let table = self.table(&selection.model)?;
        Ok(table
            .rows
            .iter()
            .map(|(id, fields)| Record {
                model: selection.model.clone(),
                id: *id,
                fields: fields.clone(),
            })
            .filter(|record| selection.predicate.matches(record))
            .collect())
    }

    fn delete(&mut self, records: &[Record]) -> Result<usize> {
        let mut deleted = 0;
        for record in records {
            if let Some(table) = self.models.get_mut(&record.model)
                && table.remove(record.id)
            {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    fn save(&mut self, record: &Record) -> Result<()> {
        let table = self.table(&record.model)?;
        if !table.rows.contains_key(&record.id) {
            return Err(StoreError::NotFound {
                model: record.model.clone(),
                id: record.id,
            });
        }
        let conflicts = table.conflicts(record);
        if !conflicts.is_empty() {
            return Err(StoreError::ConstraintViolation {
                model: record.model.clone(),
                id: record.id,
                fields: conflicts,
            });
        }
        if let Some(table) = self.models.get_mut(&record.model) {
            table.put(record.id, record.fields.clone());
        }
        Ok(())
    }

    fn validate_uniqueness(&self, record: &Record) -> Result<Uniqueness> {
        let conflicts = self.table(&record.model)?.conflicts(record);
        if conflicts.is_empty() {
            Ok(Uniqueness::Unique)
        } else {
            Ok(Uniqueness::Conflict(conflicts))
        }
    }
}
