//! In-memory record store for tests and `DATABASE_BACKEND=memory` runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::store::{RecordStore, Row};
use crate::filter::{matcher, FilterData, FilterWhere};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Row>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored in a table
    pub async fn count(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn select(&self, table: &str, filter: &FilterData) -> Result<Vec<Row>, DatabaseError> {
        let rows: Vec<Row> = {
            let tables = self.tables.read().await;
            match tables.get(table) {
                Some(t) => t.rows.values().cloned().collect(),
                None => vec![],
            }
        };
        Ok(matcher::apply(rows, filter)?)
    }

    async fn select_id(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.rows.get(&id).cloned()))
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, DatabaseError> {
        let mut tables = self.tables.write().await;
        let t = tables.entry(table.to_string()).or_default();
        t.next_id += 1;
        let id = t.next_id;
        row.insert("id".to_string(), Value::from(id));
        t.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, id: i32, row: Row) -> Result<Option<Row>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.get_mut(table).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(None);
        };
        for (key, value) in row.into_iter().filter(|(k, _)| k != "id") {
            existing.insert(key, value);
        }
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.get_mut(table).and_then(|t| t.rows.remove(&id)))
    }

    async fn delete_where(&self, table: &str, filter: &FilterData) -> Result<u64, DatabaseError> {
        let conditions = match &filter.where_clause {
            Some(where_clause) => FilterWhere::parse(where_clause)?,
            None => vec![],
        };
        let mut tables = self.tables.write().await;
        let Some(t) = tables.get_mut(table) else { return Ok(0) };
        let before = t.rows.len();
        t.rows.retain(|_, row| !matcher::matches(row, &conditions));
        Ok((before - t.rows.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn assigns_ids_and_round_trips_rows() {
        let store = MemoryRecordStore::new();
        let a = store.insert("notes", row(json!({ "id": 99, "title": "a" }))).await.unwrap();
        let b = store.insert("notes", row(json!({ "title": "b" }))).await.unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));

        let updated = store.update("notes", 1, row(json!({ "id": 7, "title": "a2" }))).await.unwrap().unwrap();
        assert_eq!(updated["id"], json!(1));
        assert_eq!(updated["title"], json!("a2"));

        assert!(store.update("notes", 42, row(json!({ "title": "x" }))).await.unwrap().is_none());
        assert_eq!(store.delete("notes", 2).await.unwrap().unwrap()["title"], json!("b"));
        assert_eq!(store.count("notes").await, 1);
    }

    #[tokio::test]
    async fn deletes_by_filter() {
        let store = MemoryRecordStore::new();
        for progeny_id in [1, 1, 2] {
            store.insert("sleep", row(json!({ "progeny_id": progeny_id }))).await.unwrap();
        }
        let removed = store
            .delete_where("sleep", &FilterData::new().where_clause(json!({ "progeny_id": 1 })))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count("sleep").await, 1);
    }
}
