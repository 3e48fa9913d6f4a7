use chrono::NaiveDate;
use planner_core::db::migrations::latest_version;
use planner_core::db::{open_db, open_db_in_memory, DbError};
use planner_core::model::record::Record;
use planner_core::{
    Assignment, AssignmentValidationError, Category, InsertMode, RecordRepository, RepoError,
    SqliteRecordRepository,
};
use rusqlite::Connection;

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

#[test]
fn open_db_in_memory_creates_record_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(table_columns(&conn, Assignment::TABLE), expected_columns::<Assignment>());
    assert_eq!(table_columns(&conn, Category::TABLE), expected_columns::<Category>());
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");
    let essay = Assignment::new("essay", march(5), march(10), 0.5, "school");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteRecordRepository::new(&conn);
        repo.insert(&essay, InsertMode::Strict).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteRecordRepository::new(&conn);
    let loaded = repo.get::<Assignment>(essay.id).unwrap().unwrap();
    assert_eq!(loaded, essay);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn insert_upsert_updates_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let mut essay = Assignment::new("essay", march(5), march(10), 0.5, "school");

    repo.insert(&essay, InsertMode::Upsert).unwrap();
    essay.title = "final essay".to_string();
    essay.end_date = march(12);
    repo.insert(&essay, InsertMode::Upsert).unwrap();

    let all = repo.select_all::<Assignment>().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "final essay");
    assert_eq!(all[0].end_date, march(12));
}

#[test]
fn insert_strict_rejects_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let school = Category::new("school", "#1e88e5");

    repo.insert(&school, InsertMode::Strict).unwrap();
    let err = repo.insert(&school, InsertMode::Strict).unwrap_err();

    assert!(matches!(
        err,
        RepoError::AlreadyExists { table: "categories", id } if id == school.id
    ));
    assert!(repo.exists::<Category>(school.id).unwrap());
}

#[test]
fn update_missing_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let essay = Assignment::new("essay", march(5), march(10), 0.5, "school");

    let err = repo.update(&essay).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id, .. } if id == essay.id));
    assert!(!repo.exists::<Assignment>(essay.id).unwrap());
}

#[test]
fn invalid_records_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let reversed = Assignment::new("reversed", march(10), march(5), 0.5, "school");

    let err = repo.insert(&reversed, InsertMode::Upsert).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidAssignment(AssignmentValidationError::ReversedRange { .. })
    ));
    assert!(repo.select_all::<Assignment>().unwrap().is_empty());

    let bad_color = Category::new("school", "url(#x)");
    assert!(matches!(
        repo.insert(&bad_color, InsertMode::Upsert).unwrap_err(),
        RepoError::InvalidCategory(_)
    ));
}

#[test]
fn select_all_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let names = ["work", "school", "home"];
    for name in names {
        repo.insert(&Category::new(name, "red"), InsertMode::Strict)
            .unwrap();
    }

    let loaded: Vec<String> = repo
        .select_all::<Category>()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(loaded, names);
}

#[test]
fn malformed_persisted_date_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    let essay = Assignment::new("essay", march(5), march(10), 0.5, "school");
    repo.insert(&essay, InsertMode::Strict).unwrap();
    conn.execute(
        "UPDATE assignments SET start_date = '2024-03-0x' WHERE id = ?1;",
        [essay.id.to_string()],
    )
    .unwrap();

    let err = repo.get::<Assignment>(essay.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("start_date")));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_columns(conn: &Connection, table: &str) -> Vec<(String, String)> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(Result::unwrap)
        .collect()
}

fn expected_columns<R: Record>() -> Vec<(String, String)> {
    std::iter::once(("id".to_string(), "TEXT".to_string()))
        .chain(
            R::FIELDS
                .iter()
                .map(|field| (field.name.to_string(), field.kind.sql_type().to_string())),
        )
        .collect()
}
