//! Social-network use-case service.
//!
//! # Responsibility
//! - Provide the driver surface: user/status CRUD plus CSV loads.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic: any backend pair implementing
//!   the repository contracts plugs in at construction time.

use crate::ingest::{self, IngestResult, LoadReport};
use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::{RepoResult, StatusRepository, UserRepository};
use std::path::Path;

/// Use-case service wrapper over one backend pair.
pub struct SocialService<U: UserRepository, S: StatusRepository> {
    users: U,
    statuses: S,
}

impl<U: UserRepository, S: StatusRepository> SocialService<U, S> {
    /// Creates a service using the provided repository implementations.
    ///
    /// Both repositories are expected to target the same underlying store;
    /// the service does not bridge backends.
    pub fn new(users: U, statuses: S) -> Self {
        Self { users, statuses }
    }

    /// Creates a new user account.
    pub fn add_user(&self, user: &User) -> RepoResult<()> {
        self.users.create_user(user)
    }

    /// Replaces every mutable field of an existing user.
    pub fn update_user(&self, user: &User) -> RepoResult<()> {
        self.users.update_user(user)
    }

    /// Deletes a user together with every status it owns.
    pub fn delete_user(&self, user_id: &str) -> RepoResult<()> {
        self.users.delete_user(user_id)
    }

    /// Looks up one user. Absence is `Ok(None)`.
    pub fn find_user(&self, user_id: &str) -> RepoResult<Option<User>> {
        self.users.find_user(user_id)
    }

    /// Creates a status for an existing user.
    pub fn add_status(&self, status: &Status) -> RepoResult<()> {
        self.statuses.create_status(status)
    }

    /// Replaces the text of an existing status after the ownership check.
    pub fn update_status(&self, status_id: &str, user_id: &str, text: &str) -> RepoResult<()> {
        self.statuses.update_status(status_id, user_id, text)
    }

    /// Deletes one status.
    pub fn delete_status(&self, status_id: &str) -> RepoResult<()> {
        self.statuses.delete_status(status_id)
    }

    /// Looks up one status. Absence is `Ok(None)`.
    pub fn find_status(&self, status_id: &str) -> RepoResult<Option<Status>> {
        self.statuses.find_status(status_id)
    }

    /// Batch-loads a users CSV file through the user repository.
    pub fn load_users(&self, path: impl AsRef<Path>, batch_size: usize) -> IngestResult<LoadReport> {
        ingest::load_users(path, batch_size, &self.users)
    }

    /// Batch-loads a statuses CSV file through the status repository.
    pub fn load_statuses(
        &self,
        path: impl AsRef<Path>,
        batch_size: usize,
    ) -> IngestResult<LoadReport> {
        ingest::load_statuses(path, batch_size, &self.statuses)
    }
}
