use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{validate_column, FilterWhere};
use super::types::{FilterData, FilterOrderInfo, SqlResult};

/// SQL generator for one table. Rows come back as a single `row` JSON column.
pub struct Filter {
    table_name: String,
    where_data: Option<serde_json::Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        validate_column(&table_name).map_err(|_| FilterError::InvalidTableName(table_name.clone()))?;
        Ok(Self {
            table_name,
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: &FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = &data.where_clause {
            FilterWhere::parse(where_clause)?;
            self.where_data = Some(where_clause.clone());
        }
        if let Some(order) = &data.order {
            self.order_data = FilterOrder::validate_and_parse(order)?;
        }
        if let Some(limit) = data.limit {
            if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
            self.limit = Some(limit);
        }
        if let Some(offset) = data.offset {
            if offset < 0 { return Err(FilterError::InvalidLimit("Offset must be non-negative".to_string())); }
            self.offset = Some(offset);
        }
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        };

        let inner = [
            format!("SELECT * FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        // row_to_json keeps the row order of the inner query
        let query = format!("SELECT row_to_json(t) AS row FROM ({}) t", inner);
        Ok(SqlResult { query, params })
    }

    pub fn to_delete_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.where_sql()?;
        let query = format!("DELETE FROM \"{}\" WHERE {}", self.table_name, where_clause);
        Ok(SqlResult { query, params })
    }

    fn where_sql(&self) -> Result<(String, Vec<serde_json::Value>), FilterError> {
        match &self.where_data {
            Some(where_data) => FilterWhere::generate(where_data, 0),
            None => Ok(("1=1".to_string(), vec![])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_wraps_rows_as_json() {
        let mut filter = Filter::new("notes").unwrap();
        filter
            .assign(&FilterData::new().where_clause(json!({ "progeny_id": 1 })).order("created_date desc").limit(5))
            .unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM \"notes\" WHERE \"progeny_id\" = $1 ORDER BY \"created_date\" DESC LIMIT 5) t"
        );
    }

    #[test]
    fn rejects_bad_table_names() {
        assert!(Filter::new("notes; drop").is_err());
        assert!(Filter::new("").is_err());
    }
}
