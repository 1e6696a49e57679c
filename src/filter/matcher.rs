//! In-process evaluation of the filter language, mirroring the SQL the
//! Postgres store generates for the same `FilterData`.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOp, FilterWhereInfo, SortDirection};

pub fn apply(rows: Vec<Map<String, Value>>, data: &FilterData) -> Result<Vec<Map<String, Value>>, FilterError> {
    let conditions = match &data.where_clause {
        Some(where_clause) => FilterWhere::parse(where_clause)?,
        None => vec![],
    };
    let mut out: Vec<Map<String, Value>> = rows.into_iter().filter(|row| matches(row, &conditions)).collect();

    if let Some(order) = &data.order {
        let infos = FilterOrder::validate_and_parse(order)?;
        out.sort_by(|a, b| {
            for info in &infos {
                let ord = compare_nulls_last(a.get(&info.column), b.get(&info.column));
                let ord = match info.sort {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    let offset = data.offset.unwrap_or(0).max(0) as usize;
    let limit = data.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    Ok(out.into_iter().skip(offset).take(limit).collect())
}

pub fn matches(row: &Map<String, Value>, conditions: &[FilterWhereInfo]) -> bool {
    conditions.iter().all(|condition| matches_condition(row.get(&condition.column), condition))
}

fn matches_condition(field: Option<&Value>, condition: &FilterWhereInfo) -> bool {
    let field = field.unwrap_or(&Value::Null);
    match condition.operator {
        FilterOp::Eq => {
            if condition.data.is_null() { field.is_null() } else { compare(field, &condition.data) == Some(Ordering::Equal) }
        }
        FilterOp::Neq => {
            if condition.data.is_null() { !field.is_null() } else { matches!(compare(field, &condition.data), Some(o) if o != Ordering::Equal) }
        }
        FilterOp::Gt => compare(field, &condition.data) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(compare(field, &condition.data), Some(Ordering::Greater | Ordering::Equal)),
        FilterOp::Lt => compare(field, &condition.data) == Some(Ordering::Less),
        FilterOp::Lte => matches!(compare(field, &condition.data), Some(Ordering::Less | Ordering::Equal)),
        FilterOp::In => match &condition.data {
            Value::Array(values) => values.iter().any(|v| compare(field, v) == Some(Ordering::Equal)),
            other => compare(field, other) == Some(Ordering::Equal),
        },
        FilterOp::Any => {
            let Value::Array(items) = field else { return false };
            let wanted: Vec<&Value> = match &condition.data {
                Value::Array(values) => values.iter().collect(),
                other => vec![other],
            };
            items.iter().any(|item| wanted.iter().any(|w| compare(item, w) == Some(Ordering::Equal)))
        }
    }
}

/// SQL-like comparison: NULL compares to nothing, timestamps compare as instants.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => Some(tx.cmp(&ty)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare_nulls_last(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Map<String, Value>> {
        vec![
            json!({ "id": 1, "access_level": 0, "admins": ["a@x.com"], "when": "2024-01-01T10:00:00.500Z" }),
            json!({ "id": 2, "access_level": 3, "admins": [], "when": "2024-01-01T10:00:00Z" }),
            json!({ "id": 3, "access_level": 5, "admins": ["b@x.com", "a@x.com"], "when": null }),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn ids(rows: &[Map<String, Value>]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn filters_by_comparison_and_membership() {
        let out = apply(rows(), &FilterData::new().where_clause(json!({ "access_level": { "$gte": 3 } }))).unwrap();
        assert_eq!(ids(&out), vec![2, 3]);

        let out = apply(rows(), &FilterData::new().where_clause(json!({ "admins": { "$any": "a@x.com" } }))).unwrap();
        assert_eq!(ids(&out), vec![1, 3]);

        let out = apply(rows(), &FilterData::new().where_clause(json!({ "id": { "$in": [1, 3] } }))).unwrap();
        assert_eq!(ids(&out), vec![1, 3]);
    }

    #[test]
    fn orders_timestamps_as_instants_with_nulls_last() {
        let out = apply(rows(), &FilterData::new().order("when asc")).unwrap();
        assert_eq!(ids(&out), vec![2, 1, 3]);

        let out = apply(rows(), &FilterData::new().order("id desc").limit(2)).unwrap();
        assert_eq!(ids(&out), vec![3, 2]);
    }
}
