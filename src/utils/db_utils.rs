use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use sqlx::MySqlPool;

/// Value bindable into a dynamic UPDATE statement.
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// A rendered UPDATE statement plus its bind values, in column order.
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Builds `UPDATE <table> SET col = ?, ... WHERE <id_column> = ?` from a
/// map of column names to JSON values. Date-shaped strings bind as DATE /
/// DATETIME so MySQL comparisons stay typed.
pub fn build_update_sql(
    table: &str,
    fields: &Map<String, Value>,
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    if fields.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let set_clause = fields
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(fields.len() + 1);

    for value in fields.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    values.push(SqlValue::I64(id_value as i64));

    Ok(SqlUpdate { sql, values })
}

/// Executes a built UPDATE and returns the affected row count.
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_renders_set_clause_in_field_order() {
        let update = build_update_sql(
            "leave_requests",
            &fields(json!({"description": "dentist", "half_day": true})),
            "id",
            7,
        )
        .unwrap();

        assert_eq!(
            update.sql,
            "UPDATE leave_requests SET description = ?, half_day = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
    }

    #[test]
    fn test_date_shaped_strings_bind_as_dates() {
        let update = build_update_sql(
            "leave_requests",
            &fields(json!({"date_from": "2024-06-03"})),
            "id",
            1,
        )
        .unwrap();

        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }

    #[test]
    fn test_null_clears_a_column() {
        let update = build_update_sql(
            "leave_requests",
            &fields(json!({"date_to": null})),
            "id",
            1,
        )
        .unwrap();

        assert!(matches!(update.values[0], SqlValue::Null));
    }

    #[test]
    fn test_empty_field_map_is_rejected() {
        let fields = Map::new();
        assert!(build_update_sql("leave_requests", &fields, "id", 1).is_err());
    }
}
