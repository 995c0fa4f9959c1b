//! BTI Store
//!
//! Persistence layer for the branding report service:
//!
//! - [`ReportRepository`] — the relational side (SQLite), gallery listing,
//!   retention queries
//! - [`ImageStore`] — the object-storage side, with local-filesystem and
//!   in-memory backends
//! - [`CleanupService`] — the retention saga capping stored report count,
//!   plus the storage↔DB orphan sync
//!
//! Every persisted report has exactly one backing image blob; retention
//! deletes blobs first, rows second, and reports partial failure instead of
//! collapsing it into a boolean.

pub mod blob;
pub mod error;
pub mod repo;
pub mod retention;
pub mod schema;

pub use blob::{ImageStore, LocalImageStore, MemoryImageStore};
pub use error::{StoreError, StoreResult};
pub use repo::{ReportRepository, SqliteReportRepository};
pub use retention::{CleanupOutcome, CleanupService, SyncOutcome};
pub use schema::REPORTS_SCHEMA;
