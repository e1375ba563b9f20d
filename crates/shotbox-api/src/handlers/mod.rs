pub mod health;
pub mod upload;
pub mod uploads_get;
