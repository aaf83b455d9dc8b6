//! Store bootstrap utilities for redb.
//!
//! # Responsibility
//! - Open file or in-memory redb databases.
//! - Create the user/status tables before repository use.

use super::{DocResult, STATUSES_TABLE, USERS_TABLE};
use log::{error, info};
use redb::backends::InMemoryBackend;
use redb::Database;
use std::path::Path;
use std::time::Instant;

/// Opens a redb database file with both document tables prepared.
///
/// # Side effects
/// - Creates the file when absent.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> DocResult<Database> {
    let started_at = Instant::now();
    info!("event=store_open module=doc status=start mode=file");

    let db = match Database::create(path) {
        Ok(db) => db,
        Err(err) => {
            error!(
                "event=store_open module=doc status=error mode=file duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match prepare_tables(&db) {
        Ok(()) => {
            info!(
                "event=store_open module=doc status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(db)
        }
        Err(err) => {
            error!(
                "event=store_open module=doc status=error mode=file duration_ms={} error_code=store_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory redb database with both document tables prepared.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
pub fn open_store_in_memory() -> DocResult<Database> {
    let started_at = Instant::now();
    info!("event=store_open module=doc status=start mode=memory");

    let db = match Database::builder().create_with_backend(InMemoryBackend::new()) {
        Ok(db) => db,
        Err(err) => {
            error!(
                "event=store_open module=doc status=error mode=memory duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match prepare_tables(&db) {
        Ok(()) => {
            info!(
                "event=store_open module=doc status=ok mode=memory duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(db)
        }
        Err(err) => {
            error!(
                "event=store_open module=doc status=error mode=memory duration_ms={} error_code=store_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn prepare_tables(db: &Database) -> DocResult<()> {
    let txn = db.begin_write()?;
    txn.open_table(USERS_TABLE)?;
    txn.open_table(STATUSES_TABLE)?;
    txn.commit()?;
    Ok(())
}
