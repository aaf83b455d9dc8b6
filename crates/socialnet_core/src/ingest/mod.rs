//! Bulk CSV ingestion for users and statuses.
//!
//! # Responsibility
//! - Parse CSV exports into validated records.
//! - Drive non-ordered batch inserts through the repository contracts.
//!
//! # Invariants
//! - Rows with any missing/empty required column are dropped, not errors.
//! - Batches preserve file order and hold at most `batch_size` records.
//! - The load stops at the first failing batch; earlier batches stay
//!   committed (the load is not transactional across the file).

pub mod loader;

pub use loader::{load_statuses, load_users, IngestError, IngestResult, LoadReport};
