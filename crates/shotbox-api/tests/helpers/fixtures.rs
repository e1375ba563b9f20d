//! Test fixtures: signature-prefixed blobs.

/// 10-byte buffer with the PNG signature.
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00]
}

pub fn jpeg_bytes() -> Vec<u8> {
    vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
    ]
}

pub fn gif_bytes() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x00\x00\x00".to_vec()
}

pub fn webp_bytes() -> Vec<u8> {
    b"RIFF\x1a\x00\x00\x00WEBPVP8L\x0d\x00\x00\x00\x2f\x00\x00\x00".to_vec()
}

/// PNG signature followed by filler up to `len` bytes.
pub fn png_of_len(len: usize) -> Vec<u8> {
    let mut data = png_bytes();
    data.resize(len, 0xAB);
    data
}
