use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::store::Row;

/// A typed row of one store table
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> i32;

    fn set_id(&mut self, id: i32);
}

pub(crate) fn to_row<T: Record>(item: &T) -> Result<Row, DatabaseError> {
    match serde_json::to_value(item)? {
        Value::Object(map) => Ok(map),
        _ => Err(DatabaseError::QueryError(format!("{} record must serialize to an object", T::TABLE))),
    }
}

pub(crate) fn from_row<T: Record>(row: Row) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Implements `Record` for a struct with an `id: i32` primary key
#[macro_export]
macro_rules! impl_record {
    ($ty:ty, $table:literal) => {
        impl $crate::database::record::Record for $ty {
            const TABLE: &'static str = $table;

            fn id(&self) -> i32 {
                self.id
            }

            fn set_id(&mut self, id: i32) {
                self.id = id;
            }
        }
    };
}
