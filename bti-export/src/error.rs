//! Export pipeline error types

use thiserror::Error;

use crate::pipeline::ExportPhase;

/// Export pipeline errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Target region has no layers or zero area
    #[error("Empty region: nothing to capture")]
    EmptyRegion,

    /// Rasterization produced no pixels
    #[error("Rendering produced empty output")]
    EmptyOutput,

    /// Rasterization failed
    #[error("Render failed in {phase:?}: {message}")]
    Render { phase: ExportPhase, message: String },

    /// PNG/PDF serialization failed
    #[error("Serialization failed: {0}")]
    Encode(String),

    /// Image post-processing (decode or re-encode) failed
    #[error("Compression failed: {0}")]
    Compression(String),

    /// Compressed output exceeded the configured size bound
    #[error("Compressed image too large: {actual} bytes (bound {bound})")]
    TooLarge { actual: usize, bound: usize },
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
