//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/count/create/get/update/delete over the `records` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate `RecordFields` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Ordered listings break ties by insertion sequence, so pages are stable.
//! - `created_at` is monotonic in insertion order; `updated_at >= created_at`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::record::{
    parse_start_date, Record, RecordFields, RecordId, RecordValidationError, START_DATE_FORMAT,
};
use crate::query::planner::{QueryPlan, SortOrder, TitleFilter, TITLE_CONTAINS_SQL_FN};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    start_date,
    description,
    created_at,
    updated_at
FROM records";

const REQUIRED_COLUMNS: &[&str] = &[
    "seq",
    "uuid",
    "title",
    "start_date",
    "description",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the record collection.
pub trait RecordRepository {
    /// Returns one page of records matching `plan`.
    fn find_records(&self, plan: &QueryPlan) -> RepoResult<Vec<Record>>;
    /// Counts all records matching `filter`, ignoring pagination.
    fn count_records(&self, filter: &TitleFilter) -> RepoResult<u64>;
    /// Inserts a record with a fresh id and creation timestamp.
    fn create_record(&self, fields: &RecordFields) -> RepoResult<Record>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>>;
    /// Replaces all editable fields. Returns `None` when `id` is unknown.
    fn update_record(&self, id: RecordId, fields: &RecordFields) -> RepoResult<Option<Record>>;
    /// Hard-deletes one record. Returns whether a row was removed.
    fn delete_record(&self, id: RecordId) -> RepoResult<bool>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Rejects connections whose schema is not fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn find_records(&self, plan: &QueryPlan) -> RepoResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        push_filter(&mut sql, &mut bind_values, &plan.filter);

        match plan.sort {
            SortOrder::StartDesc => {
                sql.push_str(" ORDER BY start_date DESC, created_at DESC, seq DESC");
            }
            SortOrder::CreatedAtDesc => sql.push_str(" ORDER BY created_at DESC, seq DESC"),
            SortOrder::Natural => {}
        }

        sql.push_str(" LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(plan.take)));
        bind_values.push(Value::Integer(
            i64::try_from(plan.skip).unwrap_or(i64::MAX),
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn count_records(&self, filter: &TitleFilter) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM records WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter(&mut sql, &mut bind_values, filter);

        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative record count `{count}`")))
    }

    fn create_record(&self, fields: &RecordFields) -> RepoResult<Record> {
        fields.validate()?;

        let id = Uuid::new_v4();
        let now_ms = Utc::now().timestamp_millis();
        // created_at never goes below the newest existing row, even if the
        // wall clock steps backwards.
        self.conn.execute(
            "INSERT INTO records (
                uuid,
                title,
                start_date,
                description,
                created_at,
                updated_at
            )
            SELECT ?1, ?2, ?3, ?4, stamp, stamp
            FROM (
                SELECT MAX(?5, COALESCE(MAX(created_at), ?5)) AS stamp
                FROM records
            );",
            params![
                id.to_string(),
                fields.title.as_str(),
                fields.start.format(START_DATE_FORMAT).to_string(),
                fields.description.as_str(),
                now_ms,
            ],
        )?;

        self.get_record(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created record {id} missing on read-back"))
        })
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn update_record(&self, id: RecordId, fields: &RecordFields) -> RepoResult<Option<Record>> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE records
             SET
                title = ?1,
                start_date = ?2,
                description = ?3,
                updated_at = MAX(?4, created_at)
             WHERE uuid = ?5;",
            params![
                fields.title.as_str(),
                fields.start.format(START_DATE_FORMAT).to_string(),
                fields.description.as_str(),
                Utc::now().timestamp_millis(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }

        self.get_record(id)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn push_filter(sql: &mut String, bind_values: &mut Vec<Value>, filter: &TitleFilter) {
    if let TitleFilter::Contains(needle) = filter {
        sql.push_str(&format!(" AND {TITLE_CONTAINS_SQL_FN}(title, ?)"));
        bind_values.push(Value::Text(needle.clone()));
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in records.uuid"))
    })?;

    let start_text: String = row.get("start_date")?;
    let start = parse_start_date(&start_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{start_text}` in records.start_date"))
    })?;

    Ok(Record {
        id,
        title: row.get("title")?,
        start,
        description: row.get("description")?,
        created_at: parse_millis(row.get("created_at")?, "created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "updated_at")?,
    })
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in records.{column}"))
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "records")? {
        return Err(RepoError::MissingRequiredTable("records"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "records", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "records",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
