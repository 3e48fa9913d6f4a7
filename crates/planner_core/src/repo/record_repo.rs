//! Schema-driven record repository over SQLite.
//!
//! # Responsibility
//! - Provide insert/update/exists/get/list for any [`Record`] type.
//! - Build SQL from `Record::FIELDS` so no query hand-lists columns.
//!
//! # Invariants
//! - Write paths validate the record before any SQL mutation.
//! - Read paths reject malformed rows instead of masking them.
//! - Lists come back in insertion order.

use crate::db::DbError;
use crate::model::assignment::AssignmentValidationError;
use crate::model::category::CategoryValidationError;
use crate::model::record::Record;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    InvalidAssignment(AssignmentValidationError),
    InvalidCategory(CategoryValidationError),
    Db(DbError),
    NotFound { table: &'static str, id: Uuid },
    AlreadyExists { table: &'static str, id: Uuid },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAssignment(err) => write!(f, "{err}"),
            Self::InvalidCategory(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "{table} record not found: {id}"),
            Self::AlreadyExists { table, id } => write!(f, "{table} record already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAssignment(err) => Some(err),
            Self::InvalidCategory(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::AlreadyExists { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<AssignmentValidationError> for RepoError {
    fn from(value: AssignmentValidationError) -> Self {
        Self::InvalidAssignment(value)
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::InvalidCategory(value)
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

/// Behavior of `insert` when a row with the same id exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Update the existing row in place.
    #[default]
    Upsert,
    /// Fail with `AlreadyExists`.
    Strict,
}

/// Persistence contract for schema-described records.
pub trait RecordRepository {
    fn exists<R: Record>(&self, id: Uuid) -> RepoResult<bool>;
    fn insert<R: Record>(&self, record: &R, mode: InsertMode) -> RepoResult<Uuid>;
    fn update<R: Record>(&self, record: &R) -> RepoResult<()>;
    fn get<R: Record>(&self, id: Uuid) -> RepoResult<Option<R>>;
    fn select_all<R: Record>(&self) -> RepoResult<Vec<R>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn update_row<R: Record>(&self, record: &R) -> RepoResult<usize> {
        let changed = self.conn.execute(
            &update_sql::<R>(),
            params_from_iter(with_trailing_id(record)),
        )?;
        Ok(changed)
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn exists<R: Record>(&self, id: Uuid) -> RepoResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", R::TABLE);
        let found: i64 = self
            .conn
            .query_row(&sql, [id.to_string()], |row| row.get(0))?;
        Ok(found == 1)
    }

    fn insert<R: Record>(&self, record: &R, mode: InsertMode) -> RepoResult<Uuid> {
        record.check()?;
        let id = record.id();

        let tx = self.conn.unchecked_transaction()?;
        let outcome = if self.exists::<R>(id)? {
            if mode == InsertMode::Strict {
                return Err(RepoError::AlreadyExists { table: R::TABLE, id });
            }
            self.update_row(record)?;
            "updated"
        } else {
            let mut values = vec![Value::Text(id.to_string())];
            values.extend(record.to_values());
            self.conn
                .execute(&insert_sql::<R>(), params_from_iter(values))?;
            "inserted"
        };
        tx.commit()?;

        debug!(
            "event=record_insert module=repo status=ok table={} outcome={outcome}",
            R::TABLE
        );
        Ok(id)
    }

    fn update<R: Record>(&self, record: &R) -> RepoResult<()> {
        record.check()?;
        if self.update_row(record)? == 0 {
            return Err(RepoError::NotFound {
                table: R::TABLE,
                id: record.id(),
            });
        }
        Ok(())
    }

    fn get<R: Record>(&self, id: Uuid) -> RepoResult<Option<R>> {
        let sql = format!("{} WHERE id = ?1;", select_sql::<R>());
        let mut stmt = self.conn.prepare(&sql)?;
        let record = stmt
            .query_row([id.to_string()], |row| Ok(R::from_row(row)))
            .optional()?;
        record.transpose()
    }

    fn select_all<R: Record>(&self) -> RepoResult<Vec<R>> {
        let sql = format!("{} ORDER BY rowid ASC;", select_sql::<R>());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }
}

fn column_list<R: Record>() -> String {
    std::iter::once("id")
        .chain(R::FIELDS.iter().map(|field| field.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_sql<R: Record>() -> String {
    format!("SELECT {} FROM {}", column_list::<R>(), R::TABLE)
}

fn insert_sql<R: Record>() -> String {
    let placeholders = (1..=R::FIELDS.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders});",
        R::TABLE,
        column_list::<R>()
    )
}

fn update_sql<R: Record>() -> String {
    let assignments = R::FIELDS
        .iter()
        .enumerate()
        .map(|(index, field)| format!("{} = ?{}", field.name, index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE id = ?{};",
        R::TABLE,
        R::FIELDS.len() + 1
    )
}

fn with_trailing_id<R: Record>(record: &R) -> Vec<Value> {
    let mut values = record.to_values();
    values.push(Value::Text(record.id().to_string()));
    values
}
