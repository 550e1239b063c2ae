//! Catsgram - Minimal Social Backend
//!
//! In-memory users and posts behind a small HTTP API.
//!
//! Features:
//! - Users with unique emails and field-level patch updates
//! - Posts tied to existing authors, listed by date with paging
//! - Typed store errors mapped to HTTP status codes

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod paging;
pub mod posts;
pub mod state;
pub mod users;

pub use error::{StoreError, StoreResult};
pub use paging::{PageRequest, SortOrder};
pub use posts::{NewPost, Post, PostPatch, PostStore};
pub use state::AppState;
pub use users::{NewUser, User, UserPatch, UserStore};

/// Application name
pub const APP_NAME: &str = "catsgram";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
