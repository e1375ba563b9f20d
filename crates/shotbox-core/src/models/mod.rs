//! Domain models shared between the ingestion service and its clients.

pub mod file;
pub mod image;

pub use file::{FileDescriptor, UploadResponse};
pub use image::ImageKind;
