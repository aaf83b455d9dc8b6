//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data-access contract per entity, shared by both backends.
//! - Isolate SQLite and redb details from service/ingest orchestration.
//!
//! # Invariants
//! - Repository writes must enforce record `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`,
//!   `OwnerMismatch`, `UnknownOwner`) in addition to transport errors.
//! - Absence on lookup is `Ok(None)`, never an error.
//! - Bulk inserts are non-ordered: a uniqueness collision never aborts the
//!   non-conflicting records of the same batch.

use crate::db::DbError;
use crate::doc::DocError;
use crate::model::status::Status;
use crate::model::user::User;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod doc;
pub mod sqlite;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error shared by the user and status contracts.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field-presence validation before reaching the backend.
    Validation(ValidationError),
    /// SQLite transport/bootstrap error.
    Db(DbError),
    /// redb transport/bootstrap error.
    Doc(DocError),
    /// Operation targeted an id that does not exist.
    NotFound { record: &'static str, id: String },
    /// Create collided with an existing primary key.
    DuplicateId { record: &'static str, id: String },
    /// Status create referenced a user that does not exist.
    UnknownOwner { user_id: String },
    /// Status update supplied an owner id different from the stored one.
    OwnerMismatch { status_id: String, user_id: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing from the backing store.
    MissingRequiredTable(&'static str),
    /// Required column is missing from an expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Doc(err) => write!(f, "{err}"),
            Self::NotFound { record, id } => write!(f, "{record} not found: {id}"),
            Self::DuplicateId { record, id } => {
                write!(f, "{record} id already exists: {id}")
            }
            Self::UnknownOwner { user_id } => {
                write!(f, "owning user does not exist: {user_id}")
            }
            Self::OwnerMismatch { status_id, user_id } => write!(
                f,
                "user {user_id} does not own status {status_id}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table is missing: {table}")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column is missing: {table}.{column}")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted record data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Doc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<DocError> for RepoError {
    fn from(value: DocError) -> Self {
        Self::Doc(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<redb::TransactionError> for RepoError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Doc(DocError::Redb(value.into()))
    }
}

impl From<redb::TableError> for RepoError {
    fn from(value: redb::TableError) -> Self {
        Self::Doc(DocError::Redb(value.into()))
    }
}

impl From<redb::StorageError> for RepoError {
    fn from(value: redb::StorageError) -> Self {
        Self::Doc(DocError::Redb(value.into()))
    }
}

impl From<redb::CommitError> for RepoError {
    fn from(value: redb::CommitError) -> Self {
        Self::Doc(DocError::Redb(value.into()))
    }
}

/// Result of one non-ordered bulk insert.
///
/// `duplicates > 0` means the batch hit the uniqueness constraint; every
/// non-conflicting record of the batch is still committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Records newly written by this batch.
    pub inserted: usize,
    /// Records skipped because their key already existed.
    pub duplicates: usize,
}

impl BatchOutcome {
    /// Whether the batch completed without any uniqueness collision.
    pub fn is_clean(&self) -> bool {
        self.duplicates == 0
    }
}

/// Repository contract for user CRUD and bulk insert.
pub trait UserRepository {
    /// Creates one user. Fails with `DuplicateId` when the key exists.
    fn create_user(&self, user: &User) -> RepoResult<()>;
    /// Replaces every mutable field of an existing user.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    /// Deletes one user and every status it owns.
    fn delete_user(&self, user_id: &str) -> RepoResult<()>;
    /// Point lookup by key. Absence is `Ok(None)`.
    fn find_user(&self, user_id: &str) -> RepoResult<Option<User>>;
    /// Non-ordered bulk insert of pre-validated records.
    fn insert_users(&self, batch: &[User]) -> RepoResult<BatchOutcome>;
}

/// Repository contract for status CRUD and bulk insert.
pub trait StatusRepository {
    /// Creates one status. Fails with `UnknownOwner` when the referenced
    /// user does not exist and `DuplicateId` when the key exists.
    fn create_status(&self, status: &Status) -> RepoResult<()>;
    /// Replaces the text of an existing status after checking that
    /// `user_id` matches the stored owner. The owner is never rewritten.
    fn update_status(&self, status_id: &str, user_id: &str, text: &str) -> RepoResult<()>;
    /// Deletes one status unconditionally given existence.
    fn delete_status(&self, status_id: &str) -> RepoResult<()>;
    /// Point lookup by key. Absence is `Ok(None)`.
    fn find_status(&self, status_id: &str) -> RepoResult<Option<Status>>;
    /// Non-ordered bulk insert. Owner existence is not checked here; bulk
    /// referential integrity is whatever the backend enforces.
    fn insert_statuses(&self, batch: &[Status]) -> RepoResult<BatchOutcome>;
}
