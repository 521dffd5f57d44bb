//! IIIF Image API URL handling.
//!
//! An Image API request has the shape
//! `{base}/{region}/{size}/{rotation}/{quality}.{format}`.

const QUALITIES: [&str; 5] = ["default", "color", "gray", "bitonal", "native"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageApiUrl<'a> {
    pub base: &'a str,
    pub region: &'a str,
    pub size: &'a str,
    pub rotation: &'a str,
    pub quality: &'a str,
    pub format: &'a str,
}

impl<'a> ImageApiUrl<'a> {
    pub fn parse(uri: &'a str) -> Option<Self> {
        let mut segments = uri.rsplitn(5, '/');
        let file = segments.next()?;
        let rotation = segments.next()?;
        let size = segments.next()?;
        let region = segments.next()?;
        let base = segments.next()?;

        let (quality, format) = file.rsplit_once('.')?;
        if !QUALITIES.contains(&quality) || format.is_empty() {
            return None;
        }

        if !is_rotation(rotation) || !is_region(region) || size.is_empty() {
            return None;
        }

        if !base.contains("://") && !base.starts_with('/') {
            return None;
        }

        Some(Self {
            base,
            region,
            size,
            rotation,
            quality,
            format,
        })
    }

    pub fn with_size(&self, size: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}.{}",
            self.base, self.region, size, self.rotation, self.quality, self.format
        )
    }
}

fn is_rotation(segment: &str) -> bool {
    let degrees = segment.strip_prefix('!').unwrap_or(segment);
    !degrees.is_empty() && degrees.parse::<f64>().is_ok()
}

fn is_region(segment: &str) -> bool {
    match segment {
        "full" | "square" => true,
        _ => {
            let coords = segment.strip_prefix("pct:").unwrap_or(segment);
            let parts: Vec<&str> = coords.split(',').collect();
            parts.len() == 4 && parts.iter().all(|p| p.parse::<f64>().is_ok())
        }
    }
}

/// Same image at another size, or `None` when `uri` is not an Image API URL
pub fn with_size(uri: &str, size: &str) -> Option<String> {
    ImageApiUrl::parse(uri).map(|url| url.with_size(size))
}

/// Image service base of an Image API URL
pub fn service_base(uri: &str) -> Option<&str> {
    ImageApiUrl::parse(uri).map(|url| url.base)
}

/// MIME type guessed from a URI's file extension
pub fn format_from_extension(uri: &str) -> Option<&'static str> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let (_, extension) = path.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        "jp2" => Some("image/jp2"),
        _ => None,
    }
}
