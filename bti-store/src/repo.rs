//! Report repository
//!
//! Relational persistence for reports. The trait is the seam; the SQLite
//! implementation covers both file-backed and in-memory (test) databases.

use async_trait::async_trait;
use bti_core::{Character, GrowthPoint, NewReport, Report};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::schema::REPORTS_SCHEMA;

/// Relational report operations
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert one report, assigning id and created_at
    async fn insert(&self, report: NewReport) -> StoreResult<Report>;

    /// All reports ordered by created_at descending (no pagination)
    async fn list(&self) -> StoreResult<Vec<Report>>;

    /// Total report count
    async fn count(&self) -> StoreResult<u64>;

    /// The `limit` oldest reports, created_at ascending
    async fn oldest(&self, limit: u64) -> StoreResult<Vec<Report>>;

    /// Delete rows by id, returning the number deleted
    async fn delete_by_ids(&self, ids: &[String]) -> StoreResult<u64>;

    /// Delete rows whose backing blob is not in `existing`, returning the
    /// number deleted (storage↔DB sync support)
    async fn delete_missing_blobs(&self, existing: &HashSet<String>) -> StoreResult<u64>;
}

/// SQLite-backed report repository
pub struct SqliteReportRepository {
    conn: Mutex<Connection>,
}

impl SqliteReportRepository {
    /// Open (or create) a file-backed database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Configuration(e.to_string()))?;
        Self::init(conn)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(REPORTS_SCHEMA)?;
        info!("Report repository schema initialized");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_report(row: &Row<'_>) -> rusqlite::Result<Report> {
        let strengths_json: String = row.get("strengths")?;
        let strengths: Vec<String> = serde_json::from_str(&strengths_json).unwrap_or_default();
        let created_at: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Report {
            id: row.get("id")?,
            character: Character {
                name: row.get("character_name")?,
                description: row.get("character_description")?,
            },
            slogan: row.get("slogan")?,
            strengths,
            growth_point: GrowthPoint {
                title: row.get("growth_point_title")?,
                description: row.get("growth_point_description")?,
            },
            image_url: row.get("image_url")?,
            blob_name: row.get("blob_name")?,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, character_name, character_description, slogan, strengths, \
     growth_point_title, growth_point_description, image_url, blob_name, created_at";

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn insert(&self, report: NewReport) -> StoreResult<Report> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let strengths_json = serde_json::to_string(&report.strengths)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO teacher_reports \
             (id, character_name, character_description, slogan, strengths, \
              growth_point_title, growth_point_description, image_url, blob_name, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                report.character.name,
                report.character.description,
                report.slogan,
                strengths_json,
                report.growth_point.title,
                report.growth_point.description,
                report.image_url,
                report.blob_name,
                created_at.to_rfc3339(),
            ],
        )?;

        debug!(report_id = %id, "Report inserted");

        Ok(Report {
            id,
            character: report.character,
            slogan: report.slogan,
            strengths: report.strengths,
            growth_point: report.growth_point,
            image_url: report.image_url,
            blob_name: report.blob_name,
            created_at,
        })
    }

    async fn list(&self) -> StoreResult<Vec<Report>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM teacher_reports ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))?;
        let reports = stmt
            .query_map([], Self::row_to_report)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reports)
    }

    async fn count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock().await;
        let count: u64 =
            conn.query_row("SELECT COUNT(*) FROM teacher_reports", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn oldest(&self, limit: u64) -> StoreResult<Vec<Report>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM teacher_reports ORDER BY created_at ASC, rowid ASC LIMIT ?1",
            SELECT_COLUMNS
        ))?;
        let reports = stmt
            .query_map(params![limit], Self::row_to_report)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reports)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self.conn.lock().await;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM teacher_reports WHERE id IN ({})",
            placeholders
        );
        let deleted = conn.execute(&sql, rusqlite::params_from_iter(ids.iter()))?;
        debug!(count = deleted, "Reports deleted by id");
        Ok(deleted as u64)
    }

    async fn delete_missing_blobs(&self, existing: &HashSet<String>) -> StoreResult<u64> {
        let orphan_ids: Vec<String> = {
            let conn = self.conn.lock().await;
            let mut stmt =
                conn.prepare("SELECT id, image_url, blob_name FROM teacher_reports")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>("id")?,
                    row.get::<_, String>("image_url")?,
                    row.get::<_, String>("blob_name")?,
                ))
            })?;

            let mut orphans = Vec::new();
            for row in rows {
                let (id, image_url, blob_name) = row?;
                let name = if blob_name.is_empty() {
                    Report::blob_name_from_url(&image_url)
                } else {
                    Some(blob_name)
                };
                match name {
                    Some(name) if existing.contains(&name) => {}
                    _ => orphans.push(id),
                }
            }
            orphans
        };

        self.delete_by_ids(&orphan_ids).await
    }
}
