//! Retention and cleanup
//!
//! Caps the stored report count: count, select the oldest excess, delete
//! their blobs best-effort, then delete the rows. The two phases are not
//! atomic — a blob failure is recorded and the run continues, a row failure
//! fails the run even though blobs may already be gone. The outcome type
//! keeps those cases distinguishable.
//!
//! Count-then-delete takes no transaction across phases; concurrent report
//! creation can leave the final count above the target. Retention is
//! approximate housekeeping, not a hard capacity guarantee.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::blob::ImageStore;
use crate::error::{StoreError, StoreResult};
use crate::repo::ReportRepository;

/// Result of one cleanup run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOutcome {
    /// Rows (and, best-effort, blobs) removed
    pub deleted_count: u64,
    /// The keep-count the run aimed for
    pub remaining_target: u64,
    /// Blob names whose deletion failed; their rows are gone, the blobs
    /// linger in storage until a later sync or manual removal
    pub orphaned_blobs: Vec<String>,
}

impl CleanupOutcome {
    fn noop(remaining_target: u64) -> Self {
        Self {
            deleted_count: 0,
            remaining_target,
            orphaned_blobs: Vec::new(),
        }
    }

    /// Whether every selected blob was removed along with its row
    pub fn fully_consistent(&self) -> bool {
        self.orphaned_blobs.is_empty()
    }
}

/// Result of a storage↔DB orphan sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Blobs found in object storage
    pub storage_files: u64,
    /// Rows found in the report table before the sync
    pub db_records: u64,
    /// Rows deleted because their blob no longer exists
    pub orphans_deleted: u64,
    /// Rows remaining after the sync
    pub final_db_count: u64,
}

/// Retention/cleanup service over a repository and an image store
pub struct CleanupService {
    repo: Arc<dyn ReportRepository>,
    images: Arc<dyn ImageStore>,
}

impl CleanupService {
    /// Create the service
    pub fn new(repo: Arc<dyn ReportRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { repo, images }
    }

    /// Delete the oldest reports beyond `keep_count`.
    ///
    /// Blobs are deleted first, then rows. Blob failures are logged and
    /// reported but never abort the run; a row deletion failure is a
    /// [`StoreError::Cleanup`].
    pub async fn cleanup(&self, keep_count: u64) -> StoreResult<CleanupOutcome> {
        let total = self.repo.count().await?;
        info!(total, keep_count, "Starting report cleanup");

        if total <= keep_count {
            info!("No cleanup needed");
            return Ok(CleanupOutcome::noop(keep_count));
        }

        let excess = total - keep_count;
        let victims = self.repo.oldest(excess).await?;

        let mut orphaned_blobs = Vec::new();
        for report in &victims {
            let Some(name) = report.effective_blob_name() else {
                warn!(report_id = %report.id, url = %report.image_url, "No blob name recoverable");
                continue;
            };
            if let Err(e) = self.images.delete(&name).await {
                warn!(blob = %name, error = %e, "Blob deletion failed, continuing");
                orphaned_blobs.push(name);
            }
        }

        let ids: Vec<String> = victims.iter().map(|r| r.id.clone()).collect();
        let deleted_count = self
            .repo
            .delete_by_ids(&ids)
            .await
            .map_err(|e| StoreError::Cleanup(format!("row deletion failed: {}", e)))?;

        info!(
            deleted = deleted_count,
            orphaned = orphaned_blobs.len(),
            "Cleanup complete"
        );

        Ok(CleanupOutcome {
            deleted_count,
            remaining_target: keep_count,
            orphaned_blobs,
        })
    }

    /// Remove report rows whose backing blob no longer exists in storage
    pub async fn sync_orphans(&self) -> StoreResult<SyncOutcome> {
        let names: HashSet<String> = self.images.list().await?.into_iter().collect();
        let db_records = self.repo.count().await?;

        info!(
            storage_files = names.len(),
            db_records, "Starting storage/DB sync"
        );

        let orphans_deleted = self.repo.delete_missing_blobs(&names).await?;
        let final_db_count = db_records.saturating_sub(orphans_deleted);

        info!(orphans_deleted, final_db_count, "Sync complete");

        Ok(SyncOutcome {
            storage_files: names.len() as u64,
            db_records,
            orphans_deleted,
            final_db_count,
        })
    }
}
