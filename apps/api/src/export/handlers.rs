use axum::{
    extract::Multipart,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use crate::errors::AppError;
use crate::export::{export_pdf, UploadedSurface, CAPTURE_SCALE};
use crate::models::resume::DEFAULT_TITLE;
use crate::models::user::CurrentUser;

/// RFC 5987 `attr-char`: everything but ALPHA / DIGIT / `-._~` gets encoded.
const ATTR_CHAR_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// POST /api/v1/export
/// Multipart fields: `capture` (PNG of the preview), `title`, `scale`.
/// Responds with the PDF as an attachment, or 422 with no file.
pub async fn handle_export(
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut capture = Bytes::new();
    let mut title = DEFAULT_TITLE.to_string();
    let mut scale = CAPTURE_SCALE;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("capture") => capture = field.bytes().await?,
            Some("title") => title = field.text().await?,
            Some("scale") => {
                let raw = field.text().await?;
                scale = raw.trim().parse::<f32>().map_err(|_| {
                    AppError::Validation(format!("scale must be a number, got '{raw}'"))
                })?;
            }
            _ => {}
        }
    }

    let exported = tokio::task::spawn_blocking(move || {
        let surface = UploadedSurface::new(capture, scale);
        export_pdf(&surface, &title)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))??;

    info!(
        "User {} exported {} ({:.1}x{:.1} pt)",
        user.id, exported.file_name, exported.page.width_pt, exported.page.height_pt
    );

    let disposition = HeaderValue::from_str(&content_disposition(&exported.file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bad Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response())
}

/// `attachment` disposition with an ASCII `filename` and, when the name has
/// anything else in it, an RFC 5987 `filename*`.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect();
    if ascii == file_name {
        return format!("attachment; filename=\"{ascii}\"");
    }

    let encoded = utf8_percent_encode(file_name, ATTR_CHAR_SET);
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
