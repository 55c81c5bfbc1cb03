/// Current schema version.
pub const SCHEMA_VERSION: &str = "1";

/// Full SQL schema for pygrade's `SQLite` database.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS pygrade_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per completed analysis
CREATE TABLE IF NOT EXISTS analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    code_content TEXT NOT NULL,
    is_valid INTEGER NOT NULL DEFAULT 0,
    error_message TEXT NOT NULL DEFAULT '',
    error_line INTEGER NOT NULL DEFAULT -1,
    skill_level TEXT NOT NULL,
    skill_score INTEGER NOT NULL,
    is_domain_match INTEGER NOT NULL DEFAULT 0,
    has_calculation INTEGER NOT NULL DEFAULT 0,
    has_classification INTEGER NOT NULL DEFAULT 0,
    domain_level TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_analyses_created ON analyses(created_at);
CREATE INDEX IF NOT EXISTS idx_analyses_level ON analyses(skill_level);
";
