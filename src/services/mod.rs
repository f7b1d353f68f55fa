//! Resource Services
//!
//! One function per backend operation, each a direct mapping onto a single
//! HTTP call through [`ApiClient`](crate::client::ApiClient). Errors are
//! never swallowed here; presenting them is the caller's job.

pub mod auth;
pub mod chat;
pub mod documents;
pub mod summary;

pub use documents::{UploadFile, PDF_MIME};
