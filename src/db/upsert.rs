//! `INSERT ... ON CONFLICT(id) DO UPDATE` built from any record.
//!
//! The conflict target is the identifier, so updating needs the caller to
//! know it already. Entities with a natural key look it up first.

use serde::Serialize;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::{
    error::StoreResult,
    executor::Executor,
    mapper::{to_columns, Columns},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn now_rfc3339() -> StoreResult<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

/// Milliseconds since the epoch, the unit of message timestamps.
pub fn now_millis() -> i64 {
    to_millis(OffsetDateTime::now_utc())
}

fn to_millis(at: OffsetDateTime) -> i64 {
    i64::try_from(at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Binds the id, the insert values, the update values, then the id again.
pub fn build_upsert(table: &str, id: &str, columns: &Columns) -> Statement {
    let names: Vec<&str> = columns.keys().map(String::as_str).collect();
    let placeholders = vec!["?"; names.len() + 1].join(", ");
    let assignments = names
        .iter()
        .map(|name| format!("{name} = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "INSERT INTO {table} (id, {}) VALUES ({placeholders}) ON CONFLICT(id) DO UPDATE SET {assignments} WHERE id = ?",
        names.join(", "),
    );

    let mut params = Vec::with_capacity(columns.len() * 2 + 2);
    params.push(Value::from(id));
    params.extend(columns.values().cloned());
    params.extend(columns.values().cloned());
    params.push(Value::from(id));

    Statement { sql, params }
}

/// `UPDATE table SET c1 = ?, ... WHERE id = ?`, never inserting.
pub fn build_update(table: &str, id: &str, columns: &Columns) -> Statement {
    let assignments = columns
        .keys()
        .map(|name| format!("{name} = ?"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut params: Vec<Value> = columns.values().cloned().collect();
    params.push(Value::from(id));

    Statement { sql: format!("UPDATE {table} SET {assignments} WHERE id = ?"), params }
}

/// Overwrites the supplied fields of an existing row. A missing row is left
/// missing.
pub async fn update<T: Serialize>(executor: &Executor, table: &str, id: &str, record: &T) -> StoreResult<()> {
    let mut columns = to_columns(record)?;
    columns.insert("updated_at".to_owned(), Value::from(now_rfc3339()?));

    let Statement { sql, params } = build_update(table, id, &columns);
    executor.execute(&sql, &params).await
}

/// Inserts or updates `record` in `table` and returns the identifier used.
pub async fn upsert<T: Serialize>(
    executor: &Executor,
    table: &str,
    record: &T,
    existing_id: Option<&str>,
) -> StoreResult<String> {
    let id = existing_id.map_or_else(new_id, str::to_owned);

    let mut columns = to_columns(record)?;
    let now = now_rfc3339()?;
    if !columns.contains_key("created_at") {
        columns.insert("created_at".to_owned(), Value::from(now.clone()));
    }
    columns.insert("updated_at".to_owned(), Value::from(now));

    let Statement { sql, params } = build_upsert(table, &id, &columns);
    executor.execute(&sql, &params).await?;
    debug!(%table, %id, "upserted");

    Ok(id)
}
