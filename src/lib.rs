//! # DocChat
//!
//! Session-aware client for a PDF question-answering backend: upload PDFs,
//! ask one-shot questions, hold conversations about a document, and generate
//! summaries.
//!
//! ## Modules
//!
//! - [`session`]: persisted token, change notifications, and route guards
//! - [`client`]: the configured HTTP client and wire types
//! - [`services`]: one function per backend operation
//! - [`views`]: panel state (documents, upload, chat, summary, conversations)
//! - [`pages`]: login, register, home, and dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docchat::client::{ApiClient, ClientConfig};
//! use docchat::session::{FileStore, Session};
//! use docchat::services::{auth, documents};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::new("session.json"));
//!     let session = Arc::new(Session::load(store).await?);
//!     let client = ApiClient::new(ClientConfig::default(), session)?;
//!
//!     auth::login(&client, "alice", "secret").await?;
//!     for doc in documents::list(&client).await? {
//!         println!("{} {}", doc.uuid, doc.filename);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod pages;
pub mod services;
pub mod session;
pub mod theme;
pub mod views;

// Re-export top-level types for convenience
pub use client::{ApiClient, ClientConfig, ClientError, ClientResult};

pub use config::{Config, ConfigError};

pub use session::{FileStore, KeyValueStore, MemoryStore, Route, Session, SessionEvent};

pub use theme::Theme;
