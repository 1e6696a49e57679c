//! Postgres-backed record store. Rows travel as JSON: reads go through
//! `row_to_json`, writes through `jsonb_populate_record` so column types are
//! taken from the table definition.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row as _};
use std::time::Instant;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::store::{RecordStore, Row};
use crate::filter::{Filter, FilterData};

pub struct PgRecordStore {
    pool: PgPool,
    log_queries: bool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, log_queries: bool) -> Self {
        Self { pool, log_queries }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        let started = Instant::now();
        let mut q = sqlx::query(sql);
        for p in params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        if self.log_queries {
            tracing::debug!("query took {:?}: {}", started.elapsed(), sql);
        }

        rows.into_iter()
            .map(|row| {
                let v: Value = row.try_get("row")?;
                match v {
                    Value::Object(map) => Ok(map),
                    _ => Err(DatabaseError::QueryError("unexpected record format".to_string())),
                }
            })
            .collect()
    }

    /// Quoted column list for the writable columns of a row
    fn columns(row: &Row) -> Result<Vec<String>, DatabaseError> {
        let mut out = Vec::new();
        for key in row.keys().filter(|k| k.as_str() != "id") {
            let mut chars = key.chars();
            let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(DatabaseError::QueryError(format!("invalid column name: {}", key)));
            }
            out.push(format!("\"{}\"", key));
        }
        if out.is_empty() {
            return Err(DatabaseError::QueryError("row has no writable columns".to_string()));
        }
        Ok(out)
    }

    fn table(table: &str) -> Result<String, DatabaseError> {
        Filter::new(table)?;
        Ok(format!("\"{}\"", table))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn select(&self, table: &str, filter_data: &FilterData) -> Result<Vec<Row>, DatabaseError> {
        let mut filter = Filter::new(table)?;
        filter.assign(filter_data)?;
        let sql_result = filter.to_sql()?;
        self.fetch_rows(&sql_result.query, &sql_result.params).await
    }

    async fn select_id(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} WHERE \"id\" = $1) t",
            Self::table(table)?
        );
        let mut rows = self.fetch_rows(&sql, &[Value::from(id)]).await?;
        Ok(rows.pop())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, DatabaseError> {
        let table = Self::table(table)?;
        let columns = Self::columns(&row)?.join(", ");
        let sql = format!(
            "WITH inserted AS (INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) RETURNING *) \
             SELECT row_to_json(inserted) AS row FROM inserted"
        );
        let mut rows = self.fetch_rows(&sql, &[Value::Object(row)]).await?;
        rows.pop()
            .ok_or_else(|| DatabaseError::QueryError("insert returned no row".to_string()))
    }

    async fn update(&self, table: &str, id: i32, row: Row) -> Result<Option<Row>, DatabaseError> {
        let table = Self::table(table)?;
        let columns = Self::columns(&row)?.join(", ");
        let sql = format!(
            "WITH updated AS (UPDATE {table} SET ({columns}) = (SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)) \
             WHERE \"id\" = $2 RETURNING *) SELECT row_to_json(updated) AS row FROM updated"
        );
        let mut rows = self.fetch_rows(&sql, &[Value::Object(row), Value::from(id)]).await?;
        Ok(rows.pop())
    }

    async fn delete(&self, table: &str, id: i32) -> Result<Option<Row>, DatabaseError> {
        let sql = format!(
            "WITH deleted AS (DELETE FROM {} WHERE \"id\" = $1 RETURNING *) SELECT row_to_json(deleted) AS row FROM deleted",
            Self::table(table)?
        );
        let mut rows = self.fetch_rows(&sql, &[Value::from(id)]).await?;
        Ok(rows.pop())
    }

    async fn delete_where(&self, table: &str, filter_data: &FilterData) -> Result<u64, DatabaseError> {
        let mut filter = Filter::new(table)?;
        filter.assign(filter_data)?;
        let sql_result = filter.to_delete_sql()?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param(q, p);
        }
        let done = q.execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Rows and arrays go in as JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
