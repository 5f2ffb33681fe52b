//! Content detection: pick a classifier for freshly read bytes.

/// Classifier for content nothing recognizes.
pub const UNKNOWN_CLASSIFIER: &str = "unknown";

/// Detect the classifier for a byte buffer.
///
/// Order:
/// - Magic bytes (images, ZIP archives)
/// - JSON by file extension or by leading `{` / `[`
/// - Image and archive formats by file extension
/// - Otherwise `"unknown"`
pub fn detect_classifier(bytes: &[u8], name_hint: Option<&str>) -> String {
    if let Some(format) = image_format_from_magic(bytes) {
        return format!("image/{format}");
    }
    if is_zip_header(bytes) {
        return "zip".to_string();
    }

    let extension = name_hint.and_then(extension_of);

    if matches!(extension.as_deref(), Some("json" | "jsonl" | "geojson")) || looks_like_json(bytes)
    {
        return "json".to_string();
    }

    match extension.as_deref() {
        Some(ext @ ("png" | "gif" | "webp" | "bmp" | "tiff")) => format!("image/{ext}"),
        Some("jpg" | "jpeg") => "image/jpeg".to_string(),
        Some("tif") => "image/tiff".to_string(),
        Some("zip") => "zip".to_string(),
        _ => UNKNOWN_CLASSIFIER.to_string(),
    }
}

fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if the header bytes match known image formats.
fn image_format_from_magic(header: &[u8]) -> Option<&'static str> {
    if header.len() < 4 {
        return None;
    }

    // JPEG: FF D8 FF
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpeg");
    }

    // PNG: 89 50 4E 47
    if header.starts_with(&[0x89, b'P', b'N', b'G']) {
        return Some("png");
    }

    // GIF: GIF8
    if header.starts_with(b"GIF8") {
        return Some("gif");
    }

    // WebP: RIFF....WEBP
    if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"WEBP" {
        return Some("webp");
    }

    // BMP: BM
    if header.starts_with(b"BM") {
        return Some("bmp");
    }

    // TIFF: II (little-endian) or MM (big-endian) followed by version 42
    if header.starts_with(&[b'I', b'I', 0x2A, 0x00]) || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
    {
        return Some("tiff");
    }

    None
}

/// ZIP local file header or end-of-central-directory (empty archive).
fn is_zip_header(header: &[u8]) -> bool {
    header.starts_with(&[b'P', b'K', 0x03, 0x04]) || header.starts_with(&[b'P', b'K', 0x05, 0x06])
}

fn looks_like_json(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    matches!(
        bytes.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{') | Some(b'[')
    )
}
