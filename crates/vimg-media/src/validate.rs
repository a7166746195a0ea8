//! Output image validation.

use std::path::Path;

use image::GenericImageView;

use crate::error::{MediaError, MediaResult};

/// Check that `path` is a non-empty, decodable image of exactly
/// `width`x`height` pixels.
pub fn validate_image(path: &Path, width: u32, height: u32) -> MediaResult<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MediaError::invalid_output(path, "file was not produced"));
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.len() == 0 {
        return Err(MediaError::invalid_output(path, "file is empty"));
    }

    let decoded = image::open(path)
        .map_err(|e| MediaError::invalid_output(path, format!("failed to decode: {}", e)))?;

    let (actual_width, actual_height) = decoded.dimensions();
    if (actual_width, actual_height) != (width, height) {
        return Err(MediaError::invalid_output(
            path,
            format!(
                "expected {}x{}, got {}x{}",
                width, height, actual_width, actual_height
            ),
        ));
    }

    Ok(())
}
