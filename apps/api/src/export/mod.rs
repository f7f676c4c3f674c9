// Export pipeline: preview capture → single-page PDF. CPU-bound work here must
// run inside tokio::task::spawn_blocking.

pub mod capture;
pub mod handlers;
pub mod pdf;

use thiserror::Error;

pub use capture::{UploadedSurface, CAPTURE_SCALE};
pub use pdf::export_pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("preview surface not found")]
    SurfaceMissing,

    #[error("captured preview is empty")]
    EmptyCapture,

    #[error("invalid capture scale {0}, expected 0.5 to 4")]
    InvalidScale(f32),

    #[error("capture of {width}x{height} pixels exceeds the export limit")]
    CaptureTooLarge { width: u32, height: u32 },

    #[error("could not decode captured preview: {0}")]
    Decode(String),
}
