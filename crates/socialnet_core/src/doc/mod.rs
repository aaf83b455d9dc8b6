//! Document-store bootstrap for the redb backend.
//!
//! # Responsibility
//! - Open and prepare redb databases for the document backend.
//! - Declare the table layout shared by the document repositories.
//!
//! # Invariants
//! - Both tables exist before a store is handed to repository code, so read
//!   transactions never observe a missing table.
//! - Documents are stored as serde_json bytes keyed by their record id.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_store, open_store_in_memory};

use redb::TableDefinition;

/// User documents keyed by `user_id`.
pub const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
/// Status documents keyed by `status_id`.
pub const STATUSES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("statuses");

pub type DocResult<T> = Result<T, DocError>;

/// Transport error from the redb document store.
#[derive(Debug)]
pub enum DocError {
    Redb(redb::Error),
}

impl Display for DocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redb(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Redb(err) => Some(err),
        }
    }
}

impl From<redb::Error> for DocError {
    fn from(value: redb::Error) -> Self {
        Self::Redb(value)
    }
}

impl From<redb::DatabaseError> for DocError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::TransactionError> for DocError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::TableError> for DocError {
    fn from(value: redb::TableError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::StorageError> for DocError {
    fn from(value: redb::StorageError) -> Self {
        Self::Redb(value.into())
    }
}

impl From<redb::CommitError> for DocError {
    fn from(value: redb::CommitError) -> Self {
        Self::Redb(value.into())
    }
}
