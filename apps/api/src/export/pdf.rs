//! Single-page PDF assembly around a captured preview.
//!
//! The page is portrait, 210 mm wide, and exactly as tall as the capture's
//! aspect ratio requires. The capture is stored as a Flate-compressed RGB
//! image XObject and drawn across the whole page.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use serde::Serialize;
use tracing::info;

use crate::export::capture::{PreviewSurface, RasterCapture, CAPTURE_SCALE};
use crate::export::ExportError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
const PT_PER_MM: f32 = 72.0 / 25.4;
const COMPRESSION_LEVEL: u8 = 6;
const IMAGE_NAME: Name<'static> = Name(b"Im1");
const FALLBACK_FILE_STEM: &str = "resume";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageGeometry {
    /// height = width × (captured_height / captured_width)
    pub fn for_capture(width_px: u32, height_px: u32) -> Result<Self, ExportError> {
        if width_px == 0 || height_px == 0 {
            return Err(ExportError::EmptyCapture);
        }
        let width_pt = PAGE_WIDTH_MM * PT_PER_MM;
        let height_pt = width_pt * height_px as f32 / width_px as f32;
        Ok(Self {
            width_pt,
            height_pt,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub file_name: String,
    pub page: PageGeometry,
    pub bytes: Vec<u8>,
}

/// Captures `surface` at [`CAPTURE_SCALE`] and wraps it in a one-page PDF.
///
/// Nothing is produced unless the capture succeeds.
pub fn export_pdf(surface: &dyn PreviewSurface, title: &str) -> Result<ExportedPdf, ExportError> {
    let capture = surface.capture(CAPTURE_SCALE)?;
    let page = PageGeometry::for_capture(capture.width(), capture.height())?;
    let bytes = write_pdf(&capture, page, title);

    info!(
        "Exported '{title}': {}x{} px capture at {}x on a {:.1}x{:.1} pt page ({} bytes)",
        capture.width(),
        capture.height(),
        capture.scale,
        page.width_pt,
        page.height_pt,
        bytes.len()
    );

    Ok(ExportedPdf {
        file_name: export_file_name(title),
        page,
        bytes,
    })
}

pub fn write_pdf(capture: &RasterCapture, page: PageGeometry, title: &str) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let info_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut pdf_page = pdf.page(page_id);
    pdf_page.media_box(Rect::new(0.0, 0.0, page.width_pt, page.height_pt));
    pdf_page.parent(page_tree_id);
    pdf_page.contents(content_id);
    pdf_page.resources().x_objects().pair(IMAGE_NAME, image_id);
    pdf_page.finish();

    let encoded = miniz_oxide::deflate::compress_to_vec_zlib(capture.image.as_raw(), COMPRESSION_LEVEL);
    let mut image = pdf.image_xobject(image_id, &encoded);
    image.filter(Filter::FlateDecode);
    image.width(capture.width() as i32);
    image.height(capture.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    // Unit square scaled to the page: the image fills it from the top left.
    let mut content = Content::new();
    content.save_state();
    content.transform([page.width_pt, 0.0, 0.0, page.height_pt, 0.0, 0.0]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.document_info(info_id).title(TextStr(title));

    pdf.finish()
}

/// `"{title}.pdf"` with characters that break file names replaced.
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.pdf")
    } else {
        format!("{stem}.pdf")
    }
}
