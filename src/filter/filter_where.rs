use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Build a SQL predicate and its positional parameters from a where clause.
    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let conditions = Self::parse(where_data)?;
        let mut filter_where = Self::new(starting_param_index);
        let mut sql_conditions = vec![];
        for condition in &conditions {
            sql_conditions.push(filter_where.build_sql_condition(condition)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, filter_where.param_values))
    }

    /// Parse the JSON filter language into flat, AND-ed conditions.
    pub fn parse(where_data: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        match where_data {
            Value::Null => Ok(vec![]),
            Value::Object(obj) => {
                let mut conditions = vec![];
                for (field, value) in obj {
                    validate_column(field)?;
                    if let Value::Object(ops) = value {
                        for (op_key, op_val) in ops {
                            let operator = Self::map_operator(op_key)?;
                            conditions.push(FilterWhereInfo { column: field.clone(), operator, data: op_val.clone() });
                        }
                    } else {
                        // Implicit equality: { field: value }
                        conditions.push(FilterWhereInfo { column: field.clone(), operator: FilterOp::Eq, data: value.clone() });
                    }
                }
                Ok(conditions)
            }
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Neq,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$in" => FilterOp::In,
            "$any" => FilterOp::Any,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        match condition.operator {
            FilterOp::Eq => {
                if condition.data.is_null() { Ok(format!("{} IS NULL", quoted_column)) }
                else { Ok(format!("{} = {}", quoted_column, self.param(condition.data.clone()))) }
            }
            FilterOp::Neq => {
                if condition.data.is_null() { Ok(format!("{} IS NOT NULL", quoted_column)) }
                else { Ok(format!("{} <> {}", quoted_column, self.param(condition.data.clone()))) }
            }
            FilterOp::Gt => Ok(format!("{} > {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Gte => Ok(format!("{} >= {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Lt => Ok(format!("{} < {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::Lte => Ok(format!("{} <= {}", quoted_column, self.param(condition.data.clone()))),
            FilterOp::In => {
                if let Value::Array(values) = &condition.data {
                    if values.is_empty() { return Ok("1=0".to_string()); }
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
                } else {
                    Ok(format!("{} = {}", quoted_column, self.param(condition.data.clone())))
                }
            }
            FilterOp::Any => {
                let values = match &condition.data {
                    Value::Array(values) => values.clone(),
                    other => vec![other.clone()],
                };
                if values.is_empty() { return Ok("1=0".to_string()); }
                if values.iter().any(|v| v.is_array() || v.is_object()) {
                    return Err(FilterError::InvalidOperatorData("$any requires scalar values".to_string()));
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} && ARRAY[{}]", quoted_column, params.join(", ")))
            }
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column))),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn implicit_equality_and_operators() {
        let (sql, params) = FilterWhere::generate(
            &json!({ "progeny_id": 5, "access_level": { "$gte": 2 } }),
            0,
        )
        .unwrap();
        assert_eq!(sql, "\"access_level\" >= $1 AND \"progeny_id\" = $2");
        assert_eq!(params, vec![json!(2), json!(5)]);
    }

    #[test]
    fn in_with_empty_list_matches_nothing() {
        let (sql, params) = FilterWhere::generate(&json!({ "id": { "$in": [] } }), 0).unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn any_generates_array_overlap() {
        let (sql, _) = FilterWhere::generate(&json!({ "admins": { "$any": "a@b.com" } }), 3).unwrap();
        assert_eq!(sql, "\"admins\" && ARRAY[$4]");
    }

    #[test]
    fn rejects_injection_in_column_names() {
        assert!(FilterWhere::generate(&json!({ "id\"; DROP TABLE notes": 1 }), 0).is_err());
        assert!(FilterWhere::generate(&json!({ "id": { "$regex": "x" } }), 0).is_err());
    }
}
