//! Conversion between JSON values and SQLite values.
//!
//! Binding:
//! - `null` → `NULL`, booleans → `0`/`1`
//! - numbers → `INTEGER` when they fit an `i64`, otherwise `REAL`
//! - strings → `TEXT`
//! - arrays and objects → their JSON text
//!
//! Reading maps `INTEGER`, `REAL` and `TEXT` back to JSON scalars and `BLOB`
//! to an array of byte values. SQLite has no boolean type, so booleans come
//! back as `0`/`1`.

use rusqlite::Row;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Map, Number, Value};

use crate::error::{Result, SqliteError};

/// Converts a JSON parameter into a bindable SQLite value.
///
/// # Errors
///
/// Returns [`SqliteError::ConversionError`] for integers outside the `i64`
/// range that cannot be represented as a finite `f64` either.
pub fn to_sql_value(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                SqlValue::Real(f)
            } else {
                return Err(SqliteError::ConversionError(format!(
                    "number {n} cannot be stored"
                )));
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    })
}

/// Converts a slice of JSON parameters.
pub fn to_sql_values(values: &[Value]) -> Result<Vec<SqlValue>> {
    values.iter().map(to_sql_value).collect()
}

/// Converts a borrowed SQLite value into JSON.
///
/// Non-finite reals become `null`, as JSON cannot represent them.
pub fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

/// Reads `row` into a JSON object keyed by `columns`.
pub(crate) fn row_to_json(row: &Row<'_>, columns: &[String]) -> Result<Value> {
    let mut object = Map::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        object.insert(name.clone(), from_value_ref(row.get_ref(i)?));
    }
    Ok(Value::Object(object))
}
