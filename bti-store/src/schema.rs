//! SQLite schema for the report table

/// Report table schema.
///
/// `strengths` is a JSON-encoded array of strings. `created_at` is RFC 3339
/// in UTC, so lexicographic ordering matches chronological ordering; rowid
/// breaks ties between rows created in the same instant.
pub const REPORTS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS teacher_reports (
    id                        TEXT PRIMARY KEY,
    character_name            TEXT NOT NULL,
    character_description     TEXT NOT NULL,
    slogan                    TEXT NOT NULL,
    strengths                 TEXT NOT NULL,
    growth_point_title        TEXT NOT NULL,
    growth_point_description  TEXT NOT NULL,
    image_url                 TEXT NOT NULL,
    blob_name                 TEXT NOT NULL DEFAULT '',
    created_at                TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reports_created_at
    ON teacher_reports (created_at);
"#;
