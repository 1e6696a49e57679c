pub mod types;
pub mod query;
pub mod filter_where;
pub mod filter_order;
pub mod matcher;
pub mod error;

pub use types::*;
pub use query::Filter;
pub use filter_where::FilterWhere;
pub use error::FilterError;
