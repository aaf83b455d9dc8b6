//! Document-backend repositories over redb.
//!
//! # Responsibility
//! - Implement the user/status contracts with keyed JSON documents.
//! - Keep redb transaction and encoding details inside this boundary.
//!
//! # Invariants
//! - Duplicate and owner checks are explicit point lookups inside the write
//!   transaction; the store itself enforces no relationships.
//! - User deletion cascades manually: owned statuses are removed in the same
//!   write transaction as the user document.
//! - Bulk inserts skip and count existing keys, committing the rest.

use crate::doc::{STATUSES_TABLE, USERS_TABLE};
use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::{BatchOutcome, RepoError, RepoResult, StatusRepository, UserRepository};
use log::debug;
use redb::{Database, ReadableTable};

/// redb-backed user repository.
pub struct DocUserRepository<'db> {
    db: &'db Database,
}

impl<'db> DocUserRepository<'db> {
    /// Constructs a repository from a prepared store (see `doc::open_store`).
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        ensure_store_ready(db)?;
        Ok(Self { db })
    }
}

impl UserRepository for DocUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;
        let doc = encode_user(user)?;

        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            if users.get(user.user_id.as_str())?.is_some() {
                return Err(RepoError::DuplicateId {
                    record: "user",
                    id: user.user_id.clone(),
                });
            }
            users.insert(user.user_id.as_str(), doc.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;
        let doc = encode_user(user)?;

        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            if users.get(user.user_id.as_str())?.is_none() {
                return Err(RepoError::NotFound {
                    record: "user",
                    id: user.user_id.clone(),
                });
            }
            users.insert(user.user_id.as_str(), doc.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    fn delete_user(&self, user_id: &str) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        let cascaded;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            if users.remove(user_id)?.is_none() {
                return Err(RepoError::NotFound {
                    record: "user",
                    id: user_id.to_string(),
                });
            }

            let mut statuses = txn.open_table(STATUSES_TABLE)?;
            let mut owned_keys = Vec::new();
            for entry in statuses.iter()? {
                let (key, value) = entry?;
                let status = decode_status(value.value())?;
                if status.user_id == user_id {
                    owned_keys.push(key.value().to_string());
                }
            }
            for key in &owned_keys {
                statuses.remove(key.as_str())?;
            }
            cascaded = owned_keys.len();
        }
        txn.commit()?;

        debug!("event=user_delete module=repo status=ok backend=doc cascaded={cascaded}");
        Ok(())
    }

    fn find_user(&self, user_id: &str) -> RepoResult<Option<User>> {
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS_TABLE)?;
        match users.get(user_id)? {
            Some(guard) => Ok(Some(decode_user(guard.value())?)),
            None => Ok(None),
        }
    }

    fn insert_users(&self, batch: &[User]) -> RepoResult<BatchOutcome> {
        for user in batch {
            user.validate()?;
        }

        let txn = self.db.begin_write()?;
        let mut outcome = BatchOutcome::default();
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            for user in batch {
                if users.get(user.user_id.as_str())?.is_some() {
                    outcome.duplicates += 1;
                    continue;
                }
                let doc = encode_user(user)?;
                users.insert(user.user_id.as_str(), doc.as_slice())?;
                outcome.inserted += 1;
            }
        }
        txn.commit()?;

        Ok(outcome)
    }
}

/// redb-backed status repository.
pub struct DocStatusRepository<'db> {
    db: &'db Database,
}

impl<'db> DocStatusRepository<'db> {
    /// Constructs a repository from a prepared store (see `doc::open_store`).
    pub fn try_new(db: &'db Database) -> RepoResult<Self> {
        ensure_store_ready(db)?;
        Ok(Self { db })
    }
}

impl StatusRepository for DocStatusRepository<'_> {
    fn create_status(&self, status: &Status) -> RepoResult<()> {
        status.validate()?;
        let doc = encode_status(status)?;

        let txn = self.db.begin_write()?;
        {
            let users = txn.open_table(USERS_TABLE)?;
            if users.get(status.user_id.as_str())?.is_none() {
                return Err(RepoError::UnknownOwner {
                    user_id: status.user_id.clone(),
                });
            }

            let mut statuses = txn.open_table(STATUSES_TABLE)?;
            if statuses.get(status.status_id.as_str())?.is_some() {
                return Err(RepoError::DuplicateId {
                    record: "status",
                    id: status.status_id.clone(),
                });
            }
            statuses.insert(status.status_id.as_str(), doc.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    fn update_status(&self, status_id: &str, user_id: &str, text: &str) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut statuses = txn.open_table(STATUSES_TABLE)?;
            let stored = match statuses.get(status_id)? {
                Some(guard) => decode_status(guard.value())?,
                None => {
                    return Err(RepoError::NotFound {
                        record: "status",
                        id: status_id.to_string(),
                    });
                }
            };

            if stored.user_id != user_id {
                return Err(RepoError::OwnerMismatch {
                    status_id: status_id.to_string(),
                    user_id: user_id.to_string(),
                });
            }

            // The stored owner is kept; the supplied user_id is an ownership
            // check only, never a re-ownership.
            let updated = Status::new(status_id, stored.user_id, text);
            updated.validate()?;
            let doc = encode_status(&updated)?;
            statuses.insert(status_id, doc.as_slice())?;
        }
        txn.commit()?;

        Ok(())
    }

    fn delete_status(&self, status_id: &str) -> RepoResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut statuses = txn.open_table(STATUSES_TABLE)?;
            if statuses.remove(status_id)?.is_none() {
                return Err(RepoError::NotFound {
                    record: "status",
                    id: status_id.to_string(),
                });
            }
        }
        txn.commit()?;

        Ok(())
    }

    fn find_status(&self, status_id: &str) -> RepoResult<Option<Status>> {
        let txn = self.db.begin_read()?;
        let statuses = txn.open_table(STATUSES_TABLE)?;
        match statuses.get(status_id)? {
            Some(guard) => Ok(Some(decode_status(guard.value())?)),
            None => Ok(None),
        }
    }

    fn insert_statuses(&self, batch: &[Status]) -> RepoResult<BatchOutcome> {
        for status in batch {
            status.validate()?;
        }

        let txn = self.db.begin_write()?;
        let mut outcome = BatchOutcome::default();
        {
            let mut statuses = txn.open_table(STATUSES_TABLE)?;
            for status in batch {
                if statuses.get(status.status_id.as_str())?.is_some() {
                    outcome.duplicates += 1;
                    continue;
                }
                let doc = encode_status(status)?;
                statuses.insert(status.status_id.as_str(), doc.as_slice())?;
                outcome.inserted += 1;
            }
        }
        txn.commit()?;

        Ok(outcome)
    }
}

fn encode_user(user: &User) -> RepoResult<Vec<u8>> {
    serde_json::to_vec(user)
        .map_err(|err| RepoError::InvalidData(format!("user document encode failed: {err}")))
}

fn decode_user(bytes: &[u8]) -> RepoResult<User> {
    serde_json::from_slice(bytes)
        .map_err(|err| RepoError::InvalidData(format!("invalid user document: {err}")))
}

fn encode_status(status: &Status) -> RepoResult<Vec<u8>> {
    serde_json::to_vec(status)
        .map_err(|err| RepoError::InvalidData(format!("status document encode failed: {err}")))
}

fn decode_status(bytes: &[u8]) -> RepoResult<Status> {
    serde_json::from_slice(bytes)
        .map_err(|err| RepoError::InvalidData(format!("invalid status document: {err}")))
}

fn ensure_store_ready(db: &Database) -> RepoResult<()> {
    let txn = db.begin_read()?;

    match txn.open_table(USERS_TABLE) {
        Ok(_) => {}
        Err(redb::TableError::TableDoesNotExist(_)) => {
            return Err(RepoError::MissingRequiredTable("users"));
        }
        Err(err) => return Err(err.into()),
    }

    match txn.open_table(STATUSES_TABLE) {
        Ok(_) => {}
        Err(redb::TableError::TableDoesNotExist(_)) => {
            return Err(RepoError::MissingRequiredTable("statuses"));
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
