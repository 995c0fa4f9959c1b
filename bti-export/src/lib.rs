//! BTI Export
//!
//! Turns an on-screen report into a downloadable artifact:
//!
//! - [`compress`] — post-processes freshly generated image bytes into a
//!   size-bounded JPEG data URL before persistence
//! - [`Exporter`] — the capture pipeline: wait for a region's embedded
//!   images, rasterize the region into a bitmap at an upscale factor
//!   against an opaque background, then serialize to a PNG blob or a
//!   single-page PDF sized to A4
//!
//! The pipeline walks `Idle → AwaitingImages → Rendering → Serializing →
//! Done | Failed`; visual effects on the region are neutralized for the
//! duration of capture and restored in a final cleanup step regardless of
//! outcome.

pub mod compress;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod region;

pub use compress::{compress, compress_jpeg, compress_jpeg_bounded, decode_data_url};
pub use error::{ExportError, ExportResult};
pub use pipeline::{
    CaptureOptions, ExportArtifact, ExportPhase, Exporter, HttpImageFetcher, ImageFetcher,
};
pub use region::{ImageSource, Layer, LayerKind, Rect, RegionEffects, ReportRegion};
