//! Normalization of one provider's non-standard conventions: full-size
//! thumbnails and item-number canvas labels.

use paleo_types::{LanguageMap, Manifest};

use crate::image_uri;

/// Rewrite thumbnail sizes and relabel canvases `Page {index}` (0-based).
/// Nothing else is touched.
pub fn strip_vendor_artifacts(manifest: &mut Manifest, thumbnail_size: &str) {
    for thumbnail in &mut manifest.thumbnail {
        match image_uri::with_size(&thumbnail.id, thumbnail_size) {
            Some(resized) => thumbnail.id = resized,
            None => tracing::debug!("Thumbnail {} is not an Image API URL", thumbnail.id),
        }
    }

    for (index, canvas) in manifest.items.iter_mut().enumerate() {
        canvas.label = LanguageMap::none(format!("Page {index}"));
    }
}
