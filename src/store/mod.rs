//! Record persistence boundary
//!
//! The query pipeline never talks to storage; it receives an already
//! fetched snapshot. This module defines the CRUD contract that snapshot
//! comes from, plus two implementations: an in-memory store and a JSON
//! file store used by the command-line front end.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::record::Record;

/// Field holding the record id
pub const ID_FIELD: &str = "id";

/// CRUD contract for one collection
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record in the collection, in storage order
    async fn list(&self) -> Result<Vec<Record>>;

    /// Record with the given id
    async fn get_by_id(&self, id: &str) -> Result<Record>;

    /// Insert a record, assigning an id when it has none
    ///
    /// # Returns
    /// * `Result<Record>` - The stored record including its id
    async fn create(&self, record: Record) -> Result<Record>;

    /// Replace the fields of an existing record; the id is preserved
    async fn update(&self, id: &str, record: Record) -> Result<Record>;

    /// Remove a record
    async fn delete(&self, id: &str) -> Result<()>;
}

fn assign_id(mut record: Record) -> Record {
    if record.id().is_none() {
        record.insert(ID_FIELD, Uuid::new_v4().to_string());
    }
    record
}

fn position(records: &[Record], id: &str) -> Result<usize> {
    records
        .iter()
        .position(|r| r.id().as_deref() == Some(id))
        .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
}

/// Store keeping the collection in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with records (ids are assigned where missing)
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(assign_id).collect()),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Record> {
        let records = self.records.read().await;
        let index = position(&records, id)?;
        Ok(records[index].clone())
    }

    async fn create(&self, record: Record) -> Result<Record> {
        let record = assign_id(record);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, record: Record) -> Result<Record> {
        let mut records = self.records.write().await;
        let index = position(&records, id)?;
        let updated = record.with(ID_FIELD, id);
        records[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.write().await;
        let index = position(&records, id)?;
        records.remove(index);
        Ok(())
    }
}

/// Store backed by a JSON file
///
/// The file holds either a bare array of records or an object with a
/// `records` array. Every call re-reads the file; writes replace it with
/// a bare array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode a collection payload
    ///
    /// # Arguments
    /// * `content` - JSON text, an array or `{"records": [...]}`
    ///
    /// # Returns
    /// * `Result<Vec<Record>>` - Records, or a decode error naming the problem
    pub fn decode(content: &str) -> Result<Vec<Record>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| StoreError::DecodeFailed(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("records") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(StoreError::DecodeFailed(
                        "expected an array or an object with a 'records' array".to_string(),
                    )
                    .into());
                }
            },
            other => {
                return Err(StoreError::DecodeFailed(format!(
                    "expected an array of records, found {}",
                    json_kind(&other)
                ))
                .into());
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(Record::from_fields(fields)),
                other => Err(StoreError::DecodeFailed(format!(
                    "record {} is {}, expected an object",
                    index,
                    json_kind(&other)
                ))
                .into()),
            })
            .collect()
    }

    async fn read_all(&self) -> Result<Vec<Record>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::FetchFailed(format!("{}: {}", self.path.display(), e)))?;
        let records = Self::decode(&content)?;
        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    async fn write_all(&self, records: &[Record]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;
        info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Record>> {
        self.read_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Record> {
        let mut records = self.read_all().await?;
        let index = position(&records, id)?;
        Ok(records.swap_remove(index))
    }

    async fn create(&self, record: Record) -> Result<Record> {
        let mut records = self.read_all().await?;
        let record = assign_id(record);
        records.push(record.clone());
        self.write_all(&records).await?;
        Ok(record)
    }

    async fn update(&self, id: &str, record: Record) -> Result<Record> {
        let mut records = self.read_all().await?;
        let index = position(&records, id)?;
        let updated = record.with(ID_FIELD, id);
        records[index] = updated.clone();
        self.write_all(&records).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.read_all().await?;
        let index = position(&records, id)?;
        records.remove(index);
        self.write_all(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();
        let created = store
            .create(Record::new().with("codigo", "A-1"))
            .await
            .unwrap();
        let id = created.id().unwrap();

        assert_eq!(store.get_by_id(&id).await.unwrap().text("codigo"), "A-1");

        let updated = store
            .update(&id, Record::new().with("codigo", "A-2"))
            .await
            .unwrap();
        assert_eq!(updated.id().as_deref(), Some(id.as_str()));
        assert_eq!(store.list().await.unwrap()[0].text("codigo"), "A-2");

        store.delete(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let store = MemoryStore::new();
        let err = store.get_by_id("missing").await.unwrap_err();
        assert!(matches!(err, AssetError::Store(StoreError::NotFound(_))));
        assert!(store.delete("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_create_keeps_existing_id() {
        let store = MemoryStore::new();
        let created = store
            .create(Record::new().with("id", "v-1"))
            .await
            .unwrap();
        assert_eq!(created.id().as_deref(), Some("v-1"));
    }

    #[test]
    fn test_decode_shapes() {
        assert_eq!(JsonFileStore::decode(r#"[{"codigo":"A"}]"#).unwrap().len(), 1);
        assert_eq!(
            JsonFileStore::decode(r#"{"records":[{"codigo":"A"},{"codigo":"B"}]}"#)
                .unwrap()
                .len(),
            2
        );
        assert!(JsonFileStore::decode(r#"{"rows":[]}"#).is_err());
        assert!(JsonFileStore::decode(r#"[1]"#).is_err());
        assert!(JsonFileStore::decode("not json").is_err());
    }

    #[tokio::test]
    async fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vias.json");
        std::fs::write(&path, json!([{"id": "1", "codigo": "A-1"}]).to_string()).unwrap();

        let store = JsonFileStore::new(&path);
        store
            .create(Record::new().with("codigo", "A-2"))
            .await
            .unwrap();
        store.delete("1").await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("codigo"), "A-2");
    }

    #[tokio::test]
    async fn test_json_file_store_missing_file() {
        let store = JsonFileStore::new("/nonexistent/vias.json");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, AssetError::Store(StoreError::FetchFailed(_))));
    }
}
