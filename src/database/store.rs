use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::database::manager::DatabaseError;
use crate::filter::FilterData;

pub type Row = Map<String, Value>;

/// Persistence collaborator. Rows are JSON objects keyed by column name; every
/// table has an integer `id` primary key assigned by the store on insert.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select(&self, table: &str, filter: &FilterData) -> Result<Vec<Row>, DatabaseError>;

    async fn select_id(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError>;

    /// Insert a row, ignoring any `id` it carries, and return the stored row
    async fn insert(&self, table: &str, row: Row) -> Result<Row, DatabaseError>;

    /// Replace every column present in `row` for the given id
    async fn update(&self, table: &str, id: i32, row: Row) -> Result<Option<Row>, DatabaseError>;

    async fn delete(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError>;

    async fn delete_where(&self, table: &str, filter: &FilterData) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
