//! Storage schema description for domain records.
//!
//! # Responsibility
//! - Map each record field name to an explicit storage kind.
//! - Convert records to and from SQLite rows without dynamic typing.
//!
//! # Invariants
//! - `to_values()` yields one value per `FIELDS` entry, in the same order.
//! - Every table also carries an `id TEXT PRIMARY KEY` column not listed in
//!   `FIELDS`.
//! - `from_row()` rejects malformed persisted data instead of masking it.

use crate::model::assignment::Assignment;
use crate::model::category::Category;
use crate::repo::record_repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of one persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Real,
    /// Calendar date stored as `YYYY-MM-DD` text.
    Date,
}

impl FieldKind {
    /// SQLite column affinity used for this kind.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Text | Self::Date => "TEXT",
            Self::Real => "REAL",
        }
    }
}

/// One named column of a record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// A record type with an explicit table schema.
pub trait Record: Sized {
    const TABLE: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> Uuid;

    /// Runs entity validation, mapped into the repository error space.
    fn check(&self) -> RepoResult<()>;

    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

impl Record for Assignment {
    const TABLE: &'static str = "assignments";
    const FIELDS: &'static [FieldSpec] = &[
        field("title", FieldKind::Text),
        field("start_date", FieldKind::Date),
        field("end_date", FieldKind::Date),
        field("weight", FieldKind::Real),
        field("category", FieldKind::Text),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn check(&self) -> RepoResult<()> {
        Ok(self.validate()?)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(date_to_db(self.start_date)),
            Value::Text(date_to_db(self.end_date)),
            Value::Real(self.weight),
            Value::Text(self.category.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id = parse_id(Self::TABLE, row)?;
        let start_text: String = row.get("start_date")?;
        let end_text: String = row.get("end_date")?;
        let assignment = Self::with_id(
            id,
            row.get::<_, String>("title")?,
            parse_date(Self::TABLE, "start_date", &start_text)?,
            parse_date(Self::TABLE, "end_date", &end_text)?,
            row.get::<_, f64>("weight")?,
            row.get::<_, String>("category")?,
        )?;
        assignment.validate()?;
        Ok(assignment)
    }
}

impl Record for Category {
    const TABLE: &'static str = "categories";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", FieldKind::Text),
        field("color", FieldKind::Text),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn check(&self) -> RepoResult<()> {
        Ok(self.validate()?)
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.color.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let category = Self {
            id: parse_id(Self::TABLE, row)?,
            name: row.get("name")?,
            color: row.get("color")?,
        };
        category.validate()?;
        Ok(category)
    }
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(table: &str, column: &str, value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in {table}.{column}"))
    })
}

fn parse_id(table: &str, row: &Row<'_>) -> RepoResult<Uuid> {
    let id_text: String = row.get("id")?;
    Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in {table}.id")))
}
