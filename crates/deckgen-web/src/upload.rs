use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use deckgen_core::{UPLOAD_FIELD, UploadError, UploadedFile, ValidationError};

/// Parse a multipart upload, returning the first `pdfFile` field if any.
///
/// Other fields are drained and ignored. A field without a declared content
/// type gets an empty MIME type so it fails the type check rather than being
/// treated as missing.
pub async fn parse_multipart(
    mut multipart: Multipart,
    max_file_size: u64,
) -> Result<Option<UploadedFile>, UploadError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == UPLOAD_FIELD && file.is_none() {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let mime_type = field.content_type().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_file_size))?
                .to_vec();

            file = Some(UploadedFile::new(filename, mime_type, data));
        } else {
            // Ignore unknown fields
            let _ = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_file_size))?;
        }
    }

    Ok(file)
}

/// A body-limit hit while streaming is reported as an oversized file; any
/// other multipart failure is a malformed request.
fn multipart_error(err: MultipartError, max_file_size: u64) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(max_file_size, "upload exceeded request body limit");
        // The real size is unknown here; it is at least one byte over.
        UploadError::Validation(ValidationError::TooLarge {
            size_bytes: max_file_size + 1,
            max_bytes: max_file_size,
        })
    } else {
        UploadError::Multipart(err.body_text())
    }
}
