//! Shotbox Storage Library
//!
//! Storage abstraction for accepted uploads plus the local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are flat and server-generated: `{uuid}.{ext}`, where the extension comes
//! from the sniffed image kind. Client-supplied filenames never reach a key.
//! Key generation and validation live in the `keys` module.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::{generate_storage_key, is_valid_storage_key};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
