//! User domain record.
//!
//! # Invariants
//! - `user_id` is the primary key and never reused for another account.
//! - Deleting a user removes every status owned by it (repository contract).

use super::{require_field, ValidationError};
use serde::{Deserialize, Serialize};

/// One user account record.
///
/// Wire field names match the stored column names so the document backend
/// and SQLite rows stay interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account key, e.g. `dave03`.
    pub user_id: String,
    #[serde(rename = "user_email")]
    pub email: String,
    #[serde(rename = "user_name")]
    pub name: String,
    #[serde(rename = "user_last_name")]
    pub last_name: String,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
            last_name: last_name.into(),
        }
    }

    /// Checks that every required field is present.
    ///
    /// Presence-only by design: the ingest policy keeps any row whose
    /// required columns are non-empty, so stricter format checks here would
    /// reject records the loaders are contracted to accept.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("user", "user_id", &self.user_id)?;
        require_field("user", "user_email", &self.email)?;
        require_field("user", "user_name", &self.name)?;
        require_field("user", "user_last_name", &self.last_name)?;
        Ok(())
    }
}
