pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::types::{AnalysisId, AnalysisRecord};

/// Persistence abstraction for completed analyses.
///
/// The pipeline never touches the store itself; callers record results
/// after validation and read them back for history views.
pub trait AnalysisStore: Send + Sync {
    /// Persist a record. The record's id is ignored; the assigned id is
    /// returned.
    fn save(&self, record: &AnalysisRecord) -> crate::error::Result<AnalysisId>;

    /// Fetch one record by id.
    fn get(&self, id: AnalysisId) -> crate::error::Result<Option<AnalysisRecord>>;

    /// List records, newest first, up to `limit` when given.
    fn list(&self, limit: Option<u32>) -> crate::error::Result<Vec<AnalysisRecord>>;

    /// Delete one record. Returns whether a row was removed.
    fn delete(&self, id: AnalysisId) -> crate::error::Result<bool>;

    /// Total number of stored records.
    fn count(&self) -> crate::error::Result<u64>;
}
