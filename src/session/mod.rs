//! Session Layer
//!
//! Everything the client remembers about the signed-in user.
//!
//! ## Architecture
//!
//! - **Store**: persistent key-value entries (`token`, `theme`)
//! - **Session**: the single bearer token plus change notifications
//! - **Route**: the views a session change navigates between

mod route;
mod store;
mod token;

pub use route::{Route, EXPIRED_MARKER};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult, THEME_KEY, TOKEN_KEY,
};
pub use token::{Session, SessionEvent};
