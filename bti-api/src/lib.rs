//! 쌤BTI API Server
//!
//! REST surface of the teacher branding report service.
//!
//! ## Endpoints
//!
//! ### Quiz & Analysis
//! - GET /api/questions - Question catalog
//! - POST /api/analyze - Run the text analysis over a completed answer set
//! - POST /api/generate-image - Generate the character image
//!
//! ### Reports
//! - POST /api/reports - Persist a report (image blob + row)
//! - GET /api/reports - Gallery listing, newest first
//! - GET /images/:name - Serve a stored image blob
//!
//! ### Admin
//! - POST /api/admin/auth - Exchange the admin password for a token
//! - POST /api/admin/cleanup - Delete the oldest reports beyond keep_count
//! - POST /api/admin/sync - Remove rows whose blob no longer exists
//!
//! ### Health
//! - GET /health - Status and version

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
