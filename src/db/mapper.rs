//! Records in, columns out, and back again.
//!
//! A record is any `Serialize` type whose serde field names follow the
//! camel-case convention. Serializing it to a JSON object is how the
//! mapper learns its fields, so no entity needs hand-written SQL.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::models::ListItem;

use super::{
    error::{StoreError, StoreResult},
    executor::RawRow,
    naming::{to_column_name, to_field_name},
};

/// Ordered column name -> value pairs.
pub type Columns = Map<String, Value>;

const AUDIT_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// List-valued fields are dropped; they never map onto a single column.
pub fn to_columns<T: Serialize>(record: &T) -> StoreResult<Columns> {
    let Value::Object(fields) = serde_json::to_value(record)? else {
        return Err(StoreError::NotARecord);
    };

    Ok(fields
        .into_iter()
        .filter(|(_, value)| !value.is_array())
        .map(|(field, value)| (to_column_name(&field), value))
        .collect())
}

/// Renames every column of `row` to its field name, optionally without the
/// identifier and audit timestamps.
pub fn to_fields(row: RawRow, suppress_audit: bool) -> Map<String, Value> {
    row.into_iter()
        .map(|(column, value)| (to_field_name(&column), value))
        .filter(|(field, _)| !suppress_audit || !AUDIT_FIELDS.contains(&field.as_str()))
        .collect()
}

pub fn to_record<T: DeserializeOwned>(row: RawRow, suppress_audit: bool) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(to_fields(row, suppress_audit)))?)
}

/// Splits the row's `id` off and maps the rest with audit columns removed.
pub fn to_list_item<T: DeserializeOwned>(row: RawRow) -> StoreResult<ListItem<T>> {
    let id = row_id(&row);
    Ok(ListItem { id, data: to_record(row, true)? })
}

/// Like [`to_list_item`] but keeps every column, for raw table dumps.
pub fn to_raw_list_item(row: RawRow) -> ListItem<Map<String, Value>> {
    let id = row_id(&row);
    ListItem { id, data: to_fields(row, false) }
}

fn row_id(row: &RawRow) -> String {
    match row.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
