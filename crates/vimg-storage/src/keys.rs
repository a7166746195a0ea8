//! Object key derivation.

use std::path::Path;

use crate::error::{StorageError, StorageResult};

/// Prefix under which stills are stored when none is configured.
pub const DEFAULT_IMAGES_PREFIX: &str = "video-images";

/// Key for a local image: `<prefix>/<file name>`.
pub fn image_key(prefix: &str, path: &Path) -> StorageResult<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::invalid_key(format!("no file name in {}", path.display())))?;

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        Ok(file_name.to_string())
    } else {
        Ok(format!("{}/{}", prefix, file_name))
    }
}
