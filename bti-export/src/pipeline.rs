//! Export capture pipeline
//!
//! One invocation walks `Idle → AwaitingImages → Rendering → Serializing →
//! Done | Failed`. The awaiting phase resolves every embedded image source
//! to bytes — a source that fails counts as loaded and renders as a
//! placeholder, so a broken image can never hang an export. Rendering
//! composes the region's layers into an upscaled bitmap on an opaque
//! background. Serializing emits a PNG blob or a one-page A4 PDF.

use async_trait::async_trait;
use bti_core::constants::{MIN_EXPORT_SCALE, PDF_REPORT_FILENAME};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::compress::decode_data_url;
use crate::error::{ExportError, ExportResult};
use crate::pdf::write_single_image_pdf;
use crate::region::{ImageSource, LayerKind, Rect, ReportRegion};

/// Pipeline states of one export invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    AwaitingImages,
    Rendering,
    Serializing,
    Done,
    Failed,
}

/// Capture configuration — the one surface where rasterization is tuned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Upscale factor; clamped to at least [`MIN_EXPORT_SCALE`]
    pub scale: u32,
    /// Opaque background color painted under all layers
    pub background: [u8; 3],
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: MIN_EXPORT_SCALE,
            background: [255, 255, 255],
        }
    }
}

impl CaptureOptions {
    fn effective_scale(&self) -> u32 {
        self.scale.max(MIN_EXPORT_SCALE)
    }
}

/// A finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Download filename
    pub filename: String,
    /// MIME type of `bytes`
    pub media_type: &'static str,
    /// Serialized document
    pub bytes: Vec<u8>,
}

/// Fetches remote image sources during the awaiting-images phase
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the bytes behind a URL
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// reqwest-backed fetcher
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with the standard transport timeout
    pub fn new() -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }
}

/// The export pipeline
pub struct Exporter {
    fetcher: Arc<dyn ImageFetcher>,
}

impl Exporter {
    /// Create an exporter over the given fetcher
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Export the region as a PNG blob under a caller-supplied filename
    pub async fn export_png(
        &self,
        region: &mut ReportRegion,
        options: CaptureOptions,
        filename: &str,
    ) -> ExportResult<ExportArtifact> {
        let bitmap = self.capture(region, options).await?;

        let mut out = Cursor::new(Vec::new());
        bitmap
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let bytes = out.into_inner();
        if bytes.is_empty() {
            return Err(ExportError::EmptyOutput);
        }

        info!(filename = %filename, size = bytes.len(), "PNG export complete");
        Ok(ExportArtifact {
            filename: filename.to_string(),
            media_type: "image/png",
            bytes,
        })
    }

    /// Export the region as a single-page A4 PDF under the fixed report name
    pub async fn export_pdf(
        &self,
        region: &mut ReportRegion,
        options: CaptureOptions,
    ) -> ExportResult<ExportArtifact> {
        let bitmap = self.capture(region, options).await?;
        let (width, height) = bitmap.dimensions();

        let mut jpeg = Cursor::new(Vec::new());
        let rgb = image::DynamicImage::ImageRgba8(bitmap).to_rgb8();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, 90))
            .map_err(|e| ExportError::Encode(e.to_string()))?;

        let bytes = write_single_image_pdf(&jpeg.into_inner(), width, height)?;

        info!(size = bytes.len(), "PDF export complete");
        Ok(ExportArtifact {
            filename: PDF_REPORT_FILENAME.to_string(),
            media_type: "application/pdf",
            bytes,
        })
    }

    /// Await embedded images and rasterize the region.
    ///
    /// Effects are neutralized via guard before the first await and restored
    /// when the guard drops, on success and failure alike.
    async fn capture(
        &self,
        region: &mut ReportRegion,
        options: CaptureOptions,
    ) -> ExportResult<RgbaImage> {
        if region.layers.is_empty() || region.width == 0 || region.height == 0 {
            return Err(ExportError::EmptyRegion);
        }

        let scale = options.effective_scale();
        let guard = region.neutralize();
        let region = guard.region();

        // AwaitingImages: resolve every source; failures count as loaded
        debug!(images = region.image_count(), "Awaiting embedded images");

        let mut resolved: Vec<Option<RgbaImage>> = Vec::with_capacity(region.layers.len());
        for layer in &region.layers {
            let source = match &layer.kind {
                LayerKind::Image(source) => source,
                LayerKind::Panel(_) => {
                    resolved.push(None);
                    continue;
                }
            };
            resolved.push(self.resolve(source).await);
        }

        // Rendering: compose onto an opaque upscaled canvas
        let phase = ExportPhase::Rendering;
        let canvas_w = region
            .width
            .checked_mul(scale)
            .ok_or_else(|| render_err(phase, "scaled width overflows"))?;
        let canvas_h = region
            .height
            .checked_mul(scale)
            .ok_or_else(|| render_err(phase, "scaled height overflows"))?;

        let [r, g, b] = options.background;
        let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([r, g, b, 255]));

        for (layer, image) in region.layers.iter().zip(resolved.iter()) {
            let rect = scale_rect(layer.rect, scale);
            match (&layer.kind, image) {
                (LayerKind::Panel(color), _) => fill_rect(&mut canvas, rect, *color),
                (LayerKind::Image(_), Some(img)) => {
                    if rect.width == 0 || rect.height == 0 {
                        continue;
                    }
                    let placed = imageops::resize(img, rect.width, rect.height, FilterType::Lanczos3);
                    imageops::overlay(&mut canvas, &placed, rect.x as i64, rect.y as i64);
                }
                // a source that errored renders as a neutral placeholder
                (LayerKind::Image(_), None) => fill_rect(&mut canvas, rect, [224, 224, 224]),
            }
        }

        Ok(canvas)
    }

    /// Resolve one image source to a decoded bitmap; any failure yields
    /// `None` (placeholder) rather than an error
    async fn resolve(&self, source: &ImageSource) -> Option<RgbaImage> {
        let bytes = match source {
            ImageSource::Inline(bytes) => bytes.clone(),
            ImageSource::DataUrl(url) => match decode_data_url(url) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "Data URL unreadable, using placeholder");
                    return None;
                }
            },
            ImageSource::Remote(url) => match self.fetcher.fetch(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(url = %url, error = %e, "Image fetch failed, using placeholder");
                    return None;
                }
            },
        };

        match image::load_from_memory(&bytes) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!(error = %e, "Image undecodable, using placeholder");
                None
            }
        }
    }
}

fn render_err(phase: ExportPhase, message: &str) -> ExportError {
    ExportError::Render {
        phase,
        message: message.to_string(),
    }
}

fn scale_rect(rect: Rect, scale: u32) -> Rect {
    Rect {
        x: rect.x.saturating_mul(scale),
        y: rect.y.saturating_mul(scale),
        width: rect.width.saturating_mul(scale),
        height: rect.height.saturating_mul(scale),
    }
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: [u8; 3]) {
    let (cw, ch) = canvas.dimensions();
    let x_end = (rect.x + rect.width).min(cw);
    let y_end = (rect.y + rect.height).min(ch);
    for y in rect.y.min(ch)..y_end {
        for x in rect.x.min(cw)..x_end {
            canvas.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Layer;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Map-backed fetcher counting calls
    struct StaticFetcher {
        blobs: HashMap<String, Vec<u8>>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn empty() -> Self {
            Self {
                blobs: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with(url: &str, bytes: Vec<u8>) -> Self {
            let mut blobs = HashMap::new();
            blobs.insert(url.to_string(), bytes);
            Self {
                blobs,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.blobs
                .get(url)
                .cloned()
                .ok_or_else(|| "not found".to_string())
        }
    }

    fn png_bytes(color: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn panel_region() -> ReportRegion {
        ReportRegion::new(100, 150)
            .with_layer(Layer::panel([250, 240, 220], Rect::new(0, 0, 100, 150)))
    }

    #[tokio::test]
    async fn test_zero_image_region_skips_fetching() {
        let fetcher = Arc::new(StaticFetcher::empty());
        let exporter = Exporter::new(fetcher.clone());

        let mut region = panel_region();
        let artifact = exporter
            .export_png(&mut region, CaptureOptions::default(), "report.png")
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(artifact.media_type, "image/png");
        assert!(artifact.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn test_output_is_upscaled_and_opaque() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = panel_region();

        let artifact = exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap();

        let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (200, 300)); // 2x layout size
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[tokio::test]
    async fn test_scale_below_minimum_is_clamped() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = panel_region();
        let options = CaptureOptions {
            scale: 1,
            ..Default::default()
        };

        let artifact = exporter.export_png(&mut region, options, "r.png").await.unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(img.width(), 200);
    }

    #[tokio::test]
    async fn test_failed_remote_image_renders_placeholder() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = ReportRegion::new(50, 50).with_layer(Layer::image(
            ImageSource::Remote("http://nowhere/x.png".into()),
            Rect::new(0, 0, 50, 50),
        ));

        // the error counts as loaded; the export completes
        let artifact = exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(10, 10).0, [224, 224, 224, 255]);
    }

    #[tokio::test]
    async fn test_remote_image_composited() {
        let url = "http://images/char.png";
        let exporter = Exporter::new(Arc::new(StaticFetcher::with(url, png_bytes([10, 200, 30]))));
        let mut region = ReportRegion::new(40, 40)
            .with_layer(Layer::panel([255, 255, 255], Rect::new(0, 0, 40, 40)))
            .with_layer(Layer::image(
                ImageSource::Remote(url.into()),
                Rect::new(10, 10, 20, 20),
            ));

        let artifact = exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        // inside the placed image (layout 10..30 → canvas 20..60)
        assert_eq!(img.get_pixel(40, 40).0, [10, 200, 30, 255]);
        // outside: background
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[tokio::test]
    async fn test_effects_restored_after_capture() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = panel_region();
        region.effects.opacity = 0.3;

        exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap();
        assert_eq!(region.effects.opacity, 0.3);
        assert!(region.effects.animations_enabled);
    }

    #[tokio::test]
    async fn test_empty_region_fails_without_mutation() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = ReportRegion::new(100, 100);
        region.effects.opacity = 0.5;

        let err = exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::EmptyRegion));
        assert_eq!(region.effects.opacity, 0.5);
    }

    #[tokio::test]
    async fn test_pdf_export_uses_fixed_filename() {
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = panel_region();

        let artifact = exporter
            .export_pdf(&mut region, CaptureOptions::default())
            .await
            .unwrap();
        assert_eq!(artifact.filename, PDF_REPORT_FILENAME);
        assert_eq!(artifact.media_type, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_data_url_source() {
        let data_url = crate::compress::compress(&png_bytes([5, 5, 200]), 0.9).unwrap();
        let exporter = Exporter::new(Arc::new(StaticFetcher::empty()));
        let mut region = ReportRegion::new(30, 30).with_layer(Layer::image(
            ImageSource::DataUrl(data_url),
            Rect::new(0, 0, 30, 30),
        ));

        let artifact = exporter
            .export_png(&mut region, CaptureOptions::default(), "r.png")
            .await
            .unwrap();
        let img = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        // JPEG-lossy blue-ish pixel, alpha opaque
        let px = img.get_pixel(15, 15).0;
        assert!(px[2] > 150);
        assert_eq!(px[3], 255);
    }
}
