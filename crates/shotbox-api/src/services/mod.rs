//! Request-independent services used by handlers

pub mod ingestion;
