//! Reading a medicine name out of an uploaded file.
//!
//! There is no OCR: an upload is only usable when it is a short UTF-8 text file whose trimmed
//! content passes [`MedicineName`] validation.

use crate::{CoreResult, UploadError};
use hai_types::MedicineName;

/// Decode uploaded bytes into a medicine name.
pub fn medicine_name_from_upload(bytes: &[u8]) -> Result<MedicineName, UploadError> {
    let text = std::str::from_utf8(bytes).map_err(|_| UploadError::NotUtf8)?;
    Ok(MedicineName::new(text)?)
}

/// Decode uploaded bytes, substituting `fallback` when the upload is unusable.
///
/// Without a fallback an unusable upload is reported as [`CoreError::InvalidUpload`](crate::CoreError::InvalidUpload).
pub fn resolve_medicine_name(
    bytes: &[u8],
    fallback: Option<&MedicineName>,
) -> CoreResult<MedicineName> {
    match (medicine_name_from_upload(bytes), fallback) {
        (Ok(name), _) => Ok(name),
        (Err(e), Some(fallback)) => {
            tracing::warn!(
                "unusable upload ({}), substituting fallback medicine {}",
                e,
                fallback
            );
            Ok(fallback.clone())
        }
        (Err(e), None) => Err(e.into()),
    }
}
