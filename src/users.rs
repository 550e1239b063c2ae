//! User Store
//!
//! TigerStyle: Owns the user collection. Every read-modify-write sequence
//! (validate, check email, assign id, insert) runs under a single write guard,
//! so concurrent requests can neither duplicate an id nor lose an update.
//!
//! Rules:
//! - `username`, `email` and `password` are required and non-blank on create
//! - `email` is unique across users (exact, case-sensitive match)
//! - updates are field-level patches: absent or blank fields are left alone
//! - `id` and `registrationDate` never change after creation

use crate::clock::{Clock, SystemClock};
use crate::error::{non_blank, require_non_blank, StoreError, StoreResult};
use crate::ids::{stored_id, IdSequence};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// =============================================================================
// Types
// =============================================================================

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned id, never reused
    pub id: u64,
    pub username: String,
    /// Unique across all users
    pub email: String,
    /// Stored and returned as given
    pub password: String,
    /// Set once at creation
    pub registration_date: DateTime<Utc>,
}

/// Payload for creating a user. Missing fields are rejected by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial update addressed by `id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// =============================================================================
// User Store
// =============================================================================

/// Collection plus its id sequence, always locked together
#[derive(Debug, Default)]
struct UserTable {
    users: BTreeMap<u64, User>,
    ids: IdSequence,
}

impl UserTable {
    /// Fail if `email` belongs to a user other than `owner`
    fn check_email_free(&self, email: &str, owner: Option<u64>) -> StoreResult<()> {
        let taken = self
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != owner);

        if taken {
            return Err(StoreError::duplicate(format!(
                "email {} is already in use",
                email
            )));
        }
        Ok(())
    }
}

/// Thread-safe in-memory user store
#[derive(Debug)]
pub struct UserStore {
    table: RwLock<UserTable>,
    clock: Arc<dyn Clock>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Create an empty store stamping dates with wall time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store using the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(UserTable::default()),
            clock,
        }
    }

    /// All users in id order
    pub async fn find_all(&self) -> Vec<User> {
        self.table.read().await.users.values().cloned().collect()
    }

    /// Look up a user, returning `None` if absent
    pub async fn find_by_id(&self, id: u64) -> Option<User> {
        self.table.read().await.users.get(&id).cloned()
    }

    /// Look up a user, failing with `NotFound` if absent
    pub async fn get_user_by_id(&self, id: u64) -> StoreResult<User> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| StoreError::not_found(format!("user with id {} not found", id)))
    }

    /// Validate and register a new user
    pub async fn create(&self, input: NewUser) -> StoreResult<User> {
        let username = require_non_blank(
            input.username.as_deref(),
            "username",
            "username cannot be empty",
        )?;
        let email = require_non_blank(input.email.as_deref(), "email", "email must be provided")?;
        let password = require_non_blank(
            input.password.as_deref(),
            "password",
            "password cannot be empty",
        )?;

        let mut table = self.table.write().await;
        if let Err(e) = table.check_email_free(email, None) {
            tracing::warn!(email, "Rejected user with duplicate email");
            return Err(e);
        }

        let user = User {
            id: table.ids.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            registration_date: self.clock.now(),
        };
        table.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Apply a partial update to an existing user
    pub async fn update(&self, patch: UserPatch) -> StoreResult<User> {
        let raw_id = patch
            .id
            .ok_or_else(|| StoreError::validation("id", "id must be provided"))?;
        let id = stored_id(raw_id)
            .ok_or_else(|| StoreError::not_found(format!("user with id {} not found", raw_id)))?;

        let mut table = self.table.write().await;
        let current_email = match table.users.get(&id) {
            Some(user) => user.email.clone(),
            None => {
                return Err(StoreError::not_found(format!(
                    "user with id {} not found",
                    id
                )))
            }
        };

        // Validate everything before touching the user so a failure leaves it intact
        let new_email = non_blank(patch.email.as_deref()).filter(|e| *e != current_email);
        if let Some(email) = new_email {
            if let Err(e) = table.check_email_free(email, Some(id)) {
                tracing::warn!(user_id = id, email, "Rejected email change to a taken address");
                return Err(e);
            }
        }

        let user = table
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("user with id {} not found", id)))?;

        if let Some(username) = non_blank(patch.username.as_deref()) {
            user.username = username.to_string();
        }
        if let Some(email) = new_email {
            user.email = email.to_string();
        }
        if let Some(password) = non_blank(patch.password.as_deref()) {
            user.password = password.to_string();
        }

        tracing::debug!(user_id = id, "Updated user");
        Ok(user.clone())
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.table.read().await.users.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
