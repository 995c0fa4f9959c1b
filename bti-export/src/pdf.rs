//! Single-page PDF serializer
//!
//! Wraps one JPEG-encoded bitmap into a one-page A4 document. The bitmap is
//! laid out at full page width and scaled down proportionally when its
//! rendered height would exceed one page. No crate in this stack speaks
//! PDF, and a one-image document needs only five objects, so the file is
//! assembled directly.

use bti_core::constants::{PDF_MAX_IMAGE_HEIGHT_MM, PDF_PAGE_WIDTH_MM, PDF_TOP_OFFSET_MM};

use crate::error::{ExportError, ExportResult};

/// A4 page size in PostScript points
const PAGE_WIDTH_PT: f64 = 595.28;
const PAGE_HEIGHT_PT: f64 = 841.89;

/// Points per millimeter
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Compute the placed image size in millimeters for a bitmap of the given
/// pixel dimensions: full page width, shrunk proportionally when too tall.
pub fn placed_size_mm(px_width: u32, px_height: u32) -> (f64, f64) {
    let mut width_mm = PDF_PAGE_WIDTH_MM;
    let mut height_mm = px_height as f64 * PDF_PAGE_WIDTH_MM / px_width as f64;

    if height_mm > PDF_MAX_IMAGE_HEIGHT_MM {
        height_mm = PDF_MAX_IMAGE_HEIGHT_MM;
        width_mm = px_width as f64 * PDF_MAX_IMAGE_HEIGHT_MM / px_height as f64;
    }

    (width_mm, height_mm)
}

/// Assemble a one-page PDF containing a single JPEG image
pub fn write_single_image_pdf(jpeg: &[u8], px_width: u32, px_height: u32) -> ExportResult<Vec<u8>> {
    if jpeg.is_empty() || px_width == 0 || px_height == 0 {
        return Err(ExportError::Encode("empty bitmap".into()));
    }

    let (width_mm, height_mm) = placed_size_mm(px_width, px_height);
    let w_pt = width_mm * PT_PER_MM;
    let h_pt = height_mm * PT_PER_MM;
    let x_pt = 0.0;
    // PDF origin is bottom-left; the image sits PDF_TOP_OFFSET_MM below the top edge
    let y_pt = PAGE_HEIGHT_PT - PDF_TOP_OFFSET_MM * PT_PER_MM - h_pt;

    let content = format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ\n",
        w_pt, h_pt, x_pt, y_pt
    );

    let mut out: Vec<u8> = Vec::with_capacity(jpeg.len() + 1024);
    let mut offsets: Vec<usize> = Vec::with_capacity(5);

    out.extend_from_slice(b"%PDF-1.4\n");

    let mut push_obj = |out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &[u8]| {
        offsets.push(out.len());
        out.extend_from_slice(body);
    };

    push_obj(
        &mut out,
        &mut offsets,
        b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
    );
    push_obj(
        &mut out,
        &mut offsets,
        b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
    );
    push_obj(
        &mut out,
        &mut offsets,
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
             /Resources << /XObject << /Im0 5 0 R >> >> /Contents 4 0 R >>\nendobj\n",
            PAGE_WIDTH_PT, PAGE_HEIGHT_PT
        )
        .as_bytes(),
    );
    push_obj(
        &mut out,
        &mut offsets,
        format!(
            "4 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
            content.len(),
            content
        )
        .as_bytes(),
    );

    // image XObject carries the raw JPEG under DCTDecode
    offsets.push(out.len());
    out.extend_from_slice(
        format!(
            "5 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
            px_width,
            px_height,
            jpeg.len()
        )
        .as_bytes(),
    );
    out.extend_from_slice(jpeg);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    let xref_offset = out.len();
    out.extend_from_slice(b"xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            xref_offset
        )
        .as_bytes(),
    );

    Ok(out)
}
