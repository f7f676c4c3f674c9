//! Preview capture: the raster image of the rendered preview pane.
//!
//! The browser rasterizes the preview (it owns the DOM) and uploads the PNG;
//! this module turns that upload into an RGB bitmap at the export scale.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageReader, Rgb, RgbImage, Rgba};
use tracing::debug;

use crate::export::ExportError;

/// Upscale factor applied to the preview for print sharpness.
pub const CAPTURE_SCALE: f32 = 2.0;

/// Declared capture scales outside this range are rejected.
pub const MIN_DECLARED_SCALE: f32 = 0.5;
pub const MAX_DECLARED_SCALE: f32 = 4.0;

/// Upper bound on the pixel count of the capture handed to the PDF writer.
pub const MAX_CAPTURE_PIXELS: u64 = 50_000_000;

const SCALE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct RasterCapture {
    pub image: RgbImage,
    pub scale: f32,
}

impl RasterCapture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Something that can produce a raster of the rendered preview.
pub trait PreviewSurface: Send {
    fn capture(&self, scale: f32) -> Result<RasterCapture, ExportError>;
}

/// A preview the client already captured and uploaded as PNG, along with the
/// scale it was captured at.
pub struct UploadedSurface {
    png: Bytes,
    captured_scale: f32,
}

impl UploadedSurface {
    pub fn new(png: Bytes, captured_scale: f32) -> Self {
        Self {
            png,
            captured_scale,
        }
    }
}

impl PreviewSurface for UploadedSurface {
    fn capture(&self, scale: f32) -> Result<RasterCapture, ExportError> {
        if self.png.is_empty() {
            return Err(ExportError::SurfaceMissing);
        }
        if !(MIN_DECLARED_SCALE..=MAX_DECLARED_SCALE).contains(&self.captured_scale) {
            return Err(ExportError::InvalidScale(self.captured_scale));
        }

        // Dimensions come from the PNG header so oversized captures are turned
        // away before any pixel buffer is allocated.
        let (source_width, source_height) =
            ImageReader::with_format(Cursor::new(&self.png[..]), ImageFormat::Png)
                .into_dimensions()
                .map_err(|e| ExportError::Decode(e.to_string()))?;
        if source_width == 0 || source_height == 0 {
            return Err(ExportError::EmptyCapture);
        }

        let factor = scale / self.captured_scale;
        let resample = (self.captured_scale - scale).abs() > SCALE_EPSILON;
        let (width, height) = if resample {
            (
                scaled_dimension(source_width, factor),
                scaled_dimension(source_height, factor),
            )
        } else {
            (source_width, source_height)
        };
        if u64::from(width) * u64::from(height) > MAX_CAPTURE_PIXELS {
            return Err(ExportError::CaptureTooLarge { width, height });
        }

        let decoded = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(|e| ExportError::Decode(e.to_string()))?;
        let mut flat = flatten_on_white(&decoded.to_rgba8());

        if resample {
            debug!(
                "Resampling capture from {}x{} ({}x) to {width}x{height} ({scale}x)",
                flat.width(),
                flat.height(),
                self.captured_scale
            );
            flat = imageops::resize(&flat, width, height, FilterType::Lanczos3);
        }

        Ok(RasterCapture { image: flat, scale })
    }
}

fn scaled_dimension(pixels: u32, factor: f32) -> u32 {
    (f64::from(pixels) * f64::from(factor))
        .round()
        .clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Composites the capture over an opaque white page.
fn flatten_on_white(rgba: &image::RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let blend = |c: u8| -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
