//! Shotbox Processing Library
//!
//! Content inspection for incoming uploads: magic-byte sniffing and the
//! validator that applies the size ceiling and the image allow-list.

pub mod sniff;
pub mod validator;

pub use sniff::{detected_mime, sniff};
pub use validator::{UploadValidator, ValidationError};
