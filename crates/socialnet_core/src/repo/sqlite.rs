//! Relational-backend repositories over SQLite.
//!
//! # Responsibility
//! - Implement the user/status contracts with SQL point operations.
//! - Keep SQL details and constraint-code mapping inside this boundary.
//!
//! # Invariants
//! - Constructors only accept migrated connections (`PRAGMA user_version`
//!   match plus required tables/columns).
//! - User deletion relies on `ON DELETE CASCADE`, so statuses vanish
//!   atomically with their owner.
//! - Bulk inserts run row-at-a-time inside one transaction: primary-key
//!   collisions are counted, any other failure rolls the batch back.

use crate::db::migrations::latest_version;
use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::{BatchOutcome, RepoError, RepoResult, StatusRepository, UserRepository};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    user_id,
    user_email,
    user_name,
    user_last_name
FROM users";

const STATUS_SELECT_SQL: &str = "SELECT
    status_id,
    user_id,
    status_text
FROM statuses";

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let result = self.conn.execute(
            "INSERT INTO users (user_id, user_email, user_name, user_last_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![user.user_id, user.email, user.name, user.last_name],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateId {
                record: "user",
                id: user.user_id.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                user_email = ?2,
                user_name = ?3,
                user_last_name = ?4
             WHERE user_id = ?1;",
            params![user.user_id, user.email, user.name, user.last_name],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                record: "user",
                id: user.user_id.clone(),
            });
        }

        Ok(())
    }

    fn delete_user(&self, user_id: &str) -> RepoResult<()> {
        let owned: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM statuses WHERE user_id = ?1;",
            [user_id],
            |row| row.get(0),
        )?;

        let changed = self
            .conn
            .execute("DELETE FROM users WHERE user_id = ?1;", [user_id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                record: "user",
                id: user_id.to_string(),
            });
        }

        debug!("event=user_delete module=repo status=ok backend=sqlite cascaded={owned}");
        Ok(())
    }

    fn find_user(&self, user_id: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE user_id = ?1;"))?;

        let user = stmt
            .query_row([user_id], parse_user_row)
            .optional()?;

        Ok(user)
    }

    fn insert_users(&self, batch: &[User]) -> RepoResult<BatchOutcome> {
        for user in batch {
            user.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut outcome = BatchOutcome::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO users (user_id, user_email, user_name, user_last_name)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;

            for user in batch {
                let result =
                    stmt.execute(params![user.user_id, user.email, user.name, user.last_name]);
                match result {
                    Ok(_) => outcome.inserted += 1,
                    Err(err) if is_unique_violation(&err) => outcome.duplicates += 1,
                    Err(err) => return Err(err.into()),
                }
            }
        }
        tx.commit()?;

        Ok(outcome)
    }
}

/// SQLite-backed status repository.
pub struct SqliteStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatusRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StatusRepository for SqliteStatusRepository<'_> {
    fn create_status(&self, status: &Status) -> RepoResult<()> {
        status.validate()?;

        let result = self.conn.execute(
            "INSERT INTO statuses (status_id, user_id, status_text)
             VALUES (?1, ?2, ?3);",
            params![status.status_id, status.user_id, status.text],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(RepoError::UnknownOwner {
                user_id: status.user_id.clone(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::DuplicateId {
                record: "status",
                id: status.status_id.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn update_status(&self, status_id: &str, user_id: &str, text: &str) -> RepoResult<()> {
        let stored = match self.find_status(status_id)? {
            Some(stored) => stored,
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

        let updated = Status::new(status_id, stored.user_id, text);
        updated.validate()?;

        self.conn.execute(
            "UPDATE statuses SET status_text = ?2 WHERE status_id = ?1;",
            params![status_id, text],
        )?;

        Ok(())
    }

    fn delete_status(&self, status_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM statuses WHERE status_id = ?1;", [status_id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                record: "status",
                id: status_id.to_string(),
            });
        }

        Ok(())
    }

    fn find_status(&self, status_id: &str) -> RepoResult<Option<Status>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STATUS_SELECT_SQL} WHERE status_id = ?1;"))?;

        let status = stmt
            .query_row([status_id], parse_status_row)
            .optional()?;

        Ok(status)
    }

    fn insert_statuses(&self, batch: &[Status]) -> RepoResult<BatchOutcome> {
        for status in batch {
            status.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut outcome = BatchOutcome::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO statuses (status_id, user_id, status_text)
                 VALUES (?1, ?2, ?3);",
            )?;

            for status in batch {
                let result =
                    stmt.execute(params![status.status_id, status.user_id, status.text]);
                match result {
                    Ok(_) => outcome.inserted += 1,
                    Err(err) if is_unique_violation(&err) => outcome.duplicates += 1,
                    Err(err) if is_foreign_key_violation(&err) => {
                        return Err(RepoError::UnknownOwner {
                            user_id: status.user_id.clone(),
                        });
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        tx.commit()?;

        Ok(outcome)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get("user_id")?,
        email: row.get("user_email")?,
        name: row.get("user_name")?,
        last_name: row.get("user_last_name")?,
    })
}

fn parse_status_row(row: &Row<'_>) -> rusqlite::Result<Status> {
    Ok(Status {
        status_id: row.get("status_id")?,
        user_id: row.get("user_id")?,
        text: row.get("status_text")?,
    })
}

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        constraint_code(err),
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
            | Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["users", "statuses"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["user_id", "user_email", "user_name", "user_last_name"] {
        if !table_has_column(conn, "users", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "users",
                column,
            });
        }
    }

    for column in ["status_id", "user_id", "status_text"] {
        if !table_has_column(conn, "statuses", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "statuses",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
