//! Shared application state handed to every HTTP handler.

use crate::clock::{Clock, SystemClock};
use crate::posts::PostStore;
use crate::users::UserStore;
use std::sync::Arc;

/// Cloneable handle to both stores
#[derive(Debug, Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub posts: Arc<PostStore>,
}

impl AppState {
    /// Empty stores stamped with wall time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty stores sharing one clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let users = Arc::new(UserStore::with_clock(clock.clone()));
        let posts = Arc::new(PostStore::with_clock(users.clone(), clock));
        Self { users, posts }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
