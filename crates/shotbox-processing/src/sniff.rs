//! Magic-byte type detection.
//!
//! Only the leading bytes of a buffer are inspected. Declared content types and
//! filenames are never consulted here.

use shotbox_core::constants::SNIFF_WINDOW;
use shotbox_core::ImageKind;

fn window(bytes: &[u8]) -> &[u8] {
    &bytes[..bytes.len().min(SNIFF_WINDOW)]
}

/// Detect which allow-listed image format `bytes` holds, if any.
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    let head = window(bytes);
    if infer::image::is_jpeg(head) {
        Some(ImageKind::Jpeg)
    } else if infer::image::is_png(head) {
        Some(ImageKind::Png)
    } else if infer::image::is_webp(head) {
        Some(ImageKind::Webp)
    } else if infer::image::is_gif(head) {
        Some(ImageKind::Gif)
    } else {
        None
    }
}

/// Best-effort MIME type of arbitrary content, for logging rejected uploads.
pub fn detected_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(window(bytes)).map(|kind| kind.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";
    const WEBP: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";

    #[test]
    fn test_sniff_allow_listed_signatures() {
        assert_eq!(sniff(PNG), Some(ImageKind::Png));
        assert_eq!(sniff(JPEG), Some(ImageKind::Jpeg));
        assert_eq!(sniff(GIF), Some(ImageKind::Gif));
        assert_eq!(sniff(WEBP), Some(ImageKind::Webp));
    }

    #[test]
    fn test_sniff_rejects_text_and_empty() {
        assert_eq!(sniff(b"hello, this is plain text"), None);
        assert_eq!(sniff(b""), None);
    }

    #[test]
    fn test_sniff_ignores_trailing_content() {
        let mut buf = PNG.to_vec();
        buf.extend_from_slice(b"%PDF-1.7 trailing junk");
        assert_eq!(sniff(&buf), Some(ImageKind::Png));
    }

    #[test]
    fn test_detected_mime_for_unsupported_content() {
        assert_eq!(detected_mime(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(detected_mime(b"plain"), None);
    }
}
