pub mod upload;

pub use upload::{extract_upload, IncomingUpload};
