use serde_json::json;
use std::sync::Arc;

use crate::database::manager::DatabaseError;
use crate::database::record::{from_row, to_row, Record};
use crate::database::store::RecordStore;
use crate::filter::FilterData;

pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        self.store
            .select(T::TABLE, &filter_data)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        let mut rows = self.select_any(filter_data.limit(1)).await?;
        Ok(rows.pop())
    }

    pub async fn select_id(&self, id: i32) -> Result<Option<T>, DatabaseError> {
        self.store.select_id(T::TABLE, id).await?.map(from_row).transpose()
    }

    pub async fn select_404(&self, id: i32) -> Result<T, DatabaseError> {
        self.select_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} record {} not found", T::TABLE, id)))
    }

    /// Rows of this table owned by one progeny
    pub async fn select_progeny(&self, progeny_id: i32) -> Result<Vec<T>, DatabaseError> {
        self.select_any(FilterData::new().where_clause(json!({ "progeny_id": progeny_id })).order("id asc"))
            .await
    }

    pub async fn insert(&self, item: &T) -> Result<T, DatabaseError> {
        let row = self.store.insert(T::TABLE, to_row(item)?).await?;
        from_row(row)
    }

    pub async fn update(&self, item: &T) -> Result<Option<T>, DatabaseError> {
        self.store
            .update(T::TABLE, item.id(), to_row(item)?)
            .await?
            .map(from_row)
            .transpose()
    }

    pub async fn delete(&self, id: i32) -> Result<Option<T>, DatabaseError> {
        self.store.delete(T::TABLE, id).await?.map(from_row).transpose()
    }

    pub async fn delete_where(&self, filter_data: FilterData) -> Result<u64, DatabaseError> {
        self.store.delete_where(T::TABLE, &filter_data).await
    }
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}
