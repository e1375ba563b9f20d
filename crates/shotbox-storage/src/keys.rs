//! Shared key generation for storage backends.
//!
//! Key format: `{uuid}.{ext}` with a random v4 UUID and the canonical extension
//! of the detected image kind.

use shotbox_core::ImageKind;
use uuid::Uuid;

/// Generate a fresh storage key for content of the given kind.
pub fn generate_storage_key(kind: ImageKind) -> String {
    format!("{}.{}", Uuid::new_v4(), kind.extension())
}

/// Whether `key` has the shape produced by [`generate_storage_key`].
///
/// Used to reject lookups for arbitrary paths before they reach a backend.
pub fn is_valid_storage_key(key: &str) -> bool {
    let Some((stem, ext)) = key.rsplit_once('.') else {
        return false;
    };
    Uuid::parse_str(stem).is_ok()
        && stem.len() == 36
        && ImageKind::from_extension(ext).is_some_and(|kind| kind.extension() == ext)
}
