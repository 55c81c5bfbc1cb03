use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::error::StoreError;
use crate::types::{AnalysisId, AnalysisRecord, DomainLevel, SkillLevel};

use super::AnalysisStore;
use super::schema;

/// SQLite-backed implementation of [`AnalysisStore`].
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: &Path) -> crate::error::Result<Self> {
        let conn = Connection::open(path).map_err(StoreError::Sqlite)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> crate::error::Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Sqlite)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn initialize(&self) -> crate::error::Result<()> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");

        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(StoreError::Sqlite)?;

        // Try WAL mode — silently ignored for in-memory
        let _ = conn.execute_batch("PRAGMA journal_mode = WAL;");

        conn.execute_batch(schema::SCHEMA_SQL)
            .map_err(StoreError::Sqlite)?;

        conn.execute(
            "INSERT OR IGNORE INTO pygrade_meta (key, value) VALUES ('schema_version', ?1)",
            params![schema::SCHEMA_VERSION],
        )
        .map_err(StoreError::Sqlite)?;

        let version: String = conn
            .query_row(
                "SELECT value FROM pygrade_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .map_err(StoreError::Sqlite)?;
        if version != schema::SCHEMA_VERSION {
            return Err(StoreError::Migration(format!(
                "unsupported schema version {version} (expected {})",
                schema::SCHEMA_VERSION
            ))
            .into());
        }

        debug!(path = ?self.db_path, "Analysis store initialized");
        Ok(())
    }
}

impl AnalysisStore for SqliteStore {
    fn save(&self, record: &AnalysisRecord) -> crate::error::Result<AnalysisId> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");
        conn.execute(
            "INSERT INTO analyses (
                filename, code_content, is_valid, error_message, error_line,
                skill_level, skill_score, is_domain_match, has_calculation,
                has_classification, domain_level, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.filename,
                record.code_content,
                record.is_valid,
                record.error_message,
                record.error_line,
                record.skill_level.as_str(),
                i64::from(record.skill_score),
                record.is_domain_match,
                record.has_calculation,
                record.has_classification,
                record.domain_level.as_str(),
                record.created_at.to_rfc3339(),
            ],
        )
        .map_err(StoreError::Sqlite)?;
        Ok(AnalysisId(conn.last_insert_rowid()))
    }

    fn get(&self, id: AnalysisId) -> crate::error::Result<Option<AnalysisRecord>> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");
        let record = conn
            .query_row(
                &format!("{SELECT_RECORD} WHERE id = ?1"),
                params![id.0],
                record_from_row,
            )
            .optional()
            .map_err(StoreError::Sqlite)?;
        Ok(record)
    }

    fn list(&self, limit: Option<u32>) -> crate::error::Result<Vec<AnalysisRecord>> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");
        let sql = match limit {
            Some(n) => format!("{SELECT_RECORD} ORDER BY created_at DESC, id DESC LIMIT {n}"),
            None => format!("{SELECT_RECORD} ORDER BY created_at DESC, id DESC"),
        };
        let mut stmt = conn.prepare(&sql).map_err(StoreError::Sqlite)?;
        let rows = stmt
            .query_map([], record_from_row)
            .map_err(StoreError::Sqlite)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(StoreError::Sqlite)?);
        }
        Ok(records)
    }

    fn delete(&self, id: AnalysisId) -> crate::error::Result<bool> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");
        let deleted = conn
            .execute("DELETE FROM analyses WHERE id = ?1", params![id.0])
            .map_err(StoreError::Sqlite)?;
        Ok(deleted > 0)
    }

    fn count(&self) -> crate::error::Result<u64> {
        let conn = self.conn.lock().expect("pygrade store mutex poisoned");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))
            .map_err(StoreError::Sqlite)?;
        Ok(count.max(0) as u64)
    }
}

const SELECT_RECORD: &str = "SELECT id, filename, code_content, is_valid, error_message, \
     error_line, skill_level, skill_score, is_domain_match, has_calculation, \
     has_classification, domain_level, created_at FROM analyses";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<AnalysisRecord> {
    let skill_level: String = row.get(6)?;
    let skill_level = SkillLevel::parse(&skill_level).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown skill level: {skill_level}").into(),
        )
    })?;
    let domain_level: String = row.get(11)?;
    let domain_level = DomainLevel::parse(&domain_level).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            11,
            rusqlite::types::Type::Text,
            format!("unknown domain level: {domain_level}").into(),
        )
    })?;
    let created_at: String = row.get(12)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                12,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?
        .with_timezone(&Utc);
    let skill_score: i64 = row.get(7)?;

    Ok(AnalysisRecord {
        id: AnalysisId(row.get(0)?),
        filename: row.get(1)?,
        code_content: row.get(2)?,
        is_valid: row.get(3)?,
        error_message: row.get(4)?,
        error_line: row.get(5)?,
        skill_level,
        skill_score: u8::try_from(skill_score.clamp(0, 100)).unwrap_or(0),
        is_domain_match: row.get(8)?,
        has_calculation: row.get(9)?,
        has_classification: row.get(10)?,
        domain_level,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Analyzer;
    use crate::types::{PythonVersion, ValidationResult};

    fn store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    fn record_for(source: &str) -> AnalysisRecord {
        let result = Analyzer::default().validate(source, PythonVersion::Py3);
        AnalysisRecord::from_result("test.py", source, &result)
    }

    #[test]
    fn save_and_get_round_trip() {
        let store = store();
        let record = record_for("def soma(a, b):\n    return a + b");
        let id = store.save(&record).unwrap();

        let loaded = store.get(id).unwrap().expect("record should exist");
        assert_eq!(loaded.filename, "test.py");
        assert!(loaded.is_valid);
        assert_eq!(loaded.skill_level, SkillLevel::Beginner);
        assert_eq!(loaded.skill_score, 25);
        assert_eq!(loaded.domain_level, DomainLevel::DoesNotMeetCriteria);
    }

    #[test]
    fn syntax_error_analysis_is_persisted_too() {
        let store = store();
        let record = record_for("def f(:\n  pass");
        let id = store.save(&record).unwrap();

        let loaded = store.get(id).unwrap().unwrap();
        assert!(!loaded.is_valid);
        assert_eq!(loaded.error_line, 1);
        assert_eq!(loaded.skill_level, SkillLevel::WithErrors);
    }

    #[test]
    fn empty_analysis_carries_assessment_and_is_persisted() {
        let store = store();
        let result = ValidationResult::empty();
        let record = AnalysisRecord::from_result("empty.py", "", &result);
        let id = store.save(&record).unwrap();

        let loaded = store.get(id).unwrap().unwrap();
        assert_eq!(loaded.skill_level, SkillLevel::Empty);
        assert_eq!(loaded.skill_score, 0);
    }

    #[test]
    fn list_returns_newest_first() {
        let store = store();
        let first = store.save(&record_for("x = 1")).unwrap();
        let second = store.save(&record_for("y = 2")).unwrap();

        let records = store.list(None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second);
        assert_eq!(records[1].id, first);

        let limited = store.list(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, second);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let store = store();
        let id = store.save(&record_for("x = 1")).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn open_creates_file_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("analyses.db");
        let store = SqliteStore::open(&path).unwrap();
        store.save(&record_for("x = 1")).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
