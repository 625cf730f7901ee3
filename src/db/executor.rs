//! Statement execution against a single tenant file.
//!
//! Every call opens its own connection, runs one statement and closes it.
//! There is no pool and no transaction, so a caller issuing several
//! statements sees each one land (or fail) on its own.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow},
    Column, Connection, Row, Sqlite, TypeInfo, ValueRef,
};
use tracing::{debug, error, warn};

use super::error::{StoreError, StoreResult};

/// A row as it comes out of storage, keyed by column name.
pub type RawRow = serde_json::Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Executor {
    location: PathBuf,
}

impl Executor {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self { location: location.into() }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    async fn connect(&self) -> StoreResult<SqliteConnection> {
        let options = SqliteConnectOptions::new()
            .filename(&self.location)
            .create_if_missing(true);
        Ok(SqliteConnection::connect_with(&options).await?)
    }

    /// Runs a mutating statement.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> StoreResult<()> {
        debug!(%sql, ?params, "execute");
        let mut conn = self.connect().await?;
        let result = bind_all(sqlx::query(sql), params).execute(&mut conn).await;
        release(conn).await;

        match result {
            Ok(done) => {
                debug!(rows_affected = done.rows_affected(), "execute done");
                Ok(())
            }
            Err(e) => {
                error!(%sql, error = %e, "statement rejected");
                Err(e.into())
            }
        }
    }

    /// At most one row, `None` when the statement produced nothing.
    pub async fn query_optional(&self, sql: &str, params: &[Value]) -> StoreResult<Option<RawRow>> {
        debug!(%sql, ?params, "query_optional");
        let mut conn = self.connect().await?;
        let result = bind_all(sqlx::query(sql), params).fetch_optional(&mut conn).await;
        release(conn).await;

        match result {
            Ok(row) => row.as_ref().map(row_to_map).transpose(),
            Err(e) => {
                error!(%sql, error = %e, "query rejected");
                Err(e.into())
            }
        }
    }

    /// Exactly one row or [`StoreError::NotFound`].
    pub async fn query_one(&self, sql: &str, params: &[Value]) -> StoreResult<RawRow> {
        self.query_optional(sql, params)
            .await?
            .ok_or_else(|| StoreError::NotFound(sql.to_owned()))
    }

    /// Zero or more rows; an empty result is not an error.
    pub async fn query_many_lenient(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<RawRow>> {
        debug!(%sql, ?params, "query_many");
        let mut conn = self.connect().await?;
        let result = bind_all(sqlx::query(sql), params).fetch_all(&mut conn).await;
        release(conn).await;

        match result {
            Ok(rows) => {
                debug!(rows = rows.len(), "query_many done");
                rows.iter().map(row_to_map).collect()
            }
            Err(e) => {
                error!(%sql, error = %e, "query rejected");
                Err(e.into())
            }
        }
    }

    /// One or more rows; an empty result is [`StoreError::NotFound`].
    pub async fn query_many(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<RawRow>> {
        let rows = self.query_many_lenient(sql, params).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(sql.to_owned()));
        }
        Ok(rows)
    }
}

/// The statement's outcome is already decided by the time the connection
/// goes away, so a failed close is only logged.
async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "closing connection failed");
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.clone()),
            // nested values have no column type of their own
            other => query.bind(other.to_string()),
        };
    }
    query
}

fn row_to_map(row: &SqliteRow) -> StoreResult<RawRow> {
    let mut map = RawRow::new();
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(index)?),
                "REAL" => Value::from(row.try_get::<f64, _>(index)?),
                "BLOB" => Value::from(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(index)?).into_owned()),
                _ => Value::from(row.try_get::<String, _>(index)?),
            }
        };
        map.insert(column.name().to_owned(), value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn executor(dir: &tempfile::TempDir) -> Executor {
        Executor::new(dir.path().join("exec.db"))
    }

    #[tokio::test]
    async fn creates_the_file_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(&dir);
        exec.execute("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER, r REAL, s TEXT)", &[])
            .await
            .unwrap();
        assert!(exec.location().exists());
    }

    #[tokio::test]
    async fn rows_come_back_typed() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(&dir);
        exec.execute("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER, r REAL, s TEXT)", &[])
            .await
            .unwrap();
        exec.execute(
            "INSERT INTO t (id, n, r, s) VALUES (?, ?, ?, ?)",
            &[json!("a"), json!(7), json!(1.5), Value::Null],
        )
        .await
        .unwrap();

        let row = exec.query_one("SELECT * FROM t WHERE id = ?", &[json!("a")]).await.unwrap();
        assert_eq!(row["id"], json!("a"));
        assert_eq!(row["n"], json!(7));
        assert_eq!(row["r"], json!(1.5));
        assert_eq!(row["s"], Value::Null);
    }

    #[tokio::test]
    async fn strict_and_lenient_reads() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(&dir);
        exec.execute("CREATE TABLE t (id TEXT PRIMARY KEY)", &[]).await.unwrap();

        let err = exec.query_one("SELECT * FROM t", &[]).await.unwrap_err();
        assert!(err.is_not_found());
        let err = exec.query_many("SELECT * FROM t", &[]).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(exec.query_optional("SELECT * FROM t", &[]).await.unwrap().is_none());
        assert!(exec.query_many_lenient("SELECT * FROM t", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_write_reports_the_statement_error() {
        let dir = tempfile::tempdir().unwrap();
        let exec = executor(&dir);
        exec.execute("CREATE TABLE t (id TEXT PRIMARY KEY)", &[]).await.unwrap();
        exec.execute("INSERT INTO t (id) VALUES (?)", &[json!("a")]).await.unwrap();

        let err = exec.execute("INSERT INTO t (id) VALUES (?)", &[json!("a")]).await.unwrap_err();
        match err {
            StoreError::Storage(sqlx::Error::Database(db)) => assert!(db.is_unique_violation()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(exec.query_many("SELECT * FROM t", &[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_sql_is_a_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = executor(&dir).execute("CREATE TABEL nope", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }
}
