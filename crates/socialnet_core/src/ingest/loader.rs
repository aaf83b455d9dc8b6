//! CSV batch loaders.
//!
//! # Responsibility
//! - Map `USER_ID,EMAIL,NAME,LASTNAME` / `STATUS_ID,USER_ID,STATUS_TEXT`
//!   rows to domain records with lenient row filtering.
//! - Partition records into contiguous batches and bulk-insert each one.
//!
//! # Invariants
//! - No owner-existence checks happen here; bulk referential integrity is
//!   whatever the backend enforces.
//! - A uniqueness collision fails the load but keeps every record already
//!   committed, including the failing batch's non-conflicting records.

use crate::model::status::Status;
use crate::model::user::User;
use crate::repo::{BatchOutcome, RepoError, RepoResult, StatusRepository, UserRepository};
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type IngestResult<T> = Result<T, IngestError>;

/// Loader error for input handling and batch outcomes.
#[derive(Debug)]
pub enum IngestError {
    /// Batch size must be positive.
    InvalidBatchSize,
    /// Input file is missing or unreadable as CSV.
    Csv(csv::Error),
    /// A batch hit the uniqueness constraint. Records committed before the
    /// failure (prior batches plus this batch's non-conflicting records)
    /// remain stored.
    BatchConflict {
        batch_index: usize,
        duplicates: usize,
        records_inserted: usize,
    },
    /// Non-uniqueness backend failure escalated from a bulk insert.
    Repo(RepoError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBatchSize => write!(f, "batch size must be positive"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::BatchConflict {
                batch_index,
                duplicates,
                records_inserted,
            } => write!(
                f,
                "batch {batch_index} hit {duplicates} duplicate key(s) after {records_inserted} record(s) were inserted"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RepoError> for IngestError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Summary of one fully successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read from the file, including dropped ones.
    pub rows_read: usize,
    /// Rows dropped for missing/empty required columns.
    pub rows_skipped: usize,
    /// Records written across all batches.
    pub records_inserted: usize,
    /// Batches attempted.
    pub batches: usize,
}

/// One parsed CSV row that may or may not carry every required column.
trait CsvRow: for<'de> Deserialize<'de> {
    type Record;

    /// Converts the row, or `None` when any required column is absent/empty.
    fn into_record(self) -> Option<Self::Record>;
}

#[derive(Debug, Deserialize)]
struct UserRow {
    #[serde(rename = "USER_ID", default)]
    user_id: Option<String>,
    #[serde(rename = "EMAIL", default)]
    email: Option<String>,
    #[serde(rename = "NAME", default)]
    name: Option<String>,
    #[serde(rename = "LASTNAME", default)]
    last_name: Option<String>,
}

impl CsvRow for UserRow {
    type Record = User;

    fn into_record(self) -> Option<User> {
        let user_id = non_empty(self.user_id)?;
        let email = non_empty(self.email)?;
        let name = non_empty(self.name)?;
        let last_name = non_empty(self.last_name)?;
        Some(User::new(user_id, email, name, last_name))
    }
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    #[serde(rename = "STATUS_ID", default)]
    status_id: Option<String>,
    #[serde(rename = "USER_ID", default)]
    user_id: Option<String>,
    #[serde(rename = "STATUS_TEXT", default)]
    text: Option<String>,
}

impl CsvRow for StatusRow {
    type Record = Status;

    fn into_record(self) -> Option<Status> {
        let status_id = non_empty(self.status_id)?;
        let user_id = non_empty(self.user_id)?;
        let text = non_empty(self.text)?;
        Some(Status::new(status_id, user_id, text))
    }
}

/// Loads a `USER_ID,EMAIL,NAME,LASTNAME` CSV file in batches of
/// `batch_size`.
///
/// # Side effects
/// - Emits `load_users` logging events with row/batch counts.
pub fn load_users<R: UserRepository>(
    path: impl AsRef<Path>,
    batch_size: usize,
    repo: &R,
) -> IngestResult<LoadReport> {
    info!("event=load_users module=ingest status=start batch_size={batch_size}");

    let (records, rows_read) = parse_rows::<UserRow>(path.as_ref(), batch_size)?;
    let report = insert_batches(&records, rows_read, batch_size, |batch| {
        repo.insert_users(batch)
    })?;

    info!(
        "event=load_users module=ingest status=ok rows_read={} rows_skipped={} inserted={} batches={}",
        report.rows_read, report.rows_skipped, report.records_inserted, report.batches
    );
    Ok(report)
}

/// Loads a `STATUS_ID,USER_ID,STATUS_TEXT` CSV file in batches of
/// `batch_size`.
///
/// No owner-existence checks are performed here (see module invariants).
///
/// # Side effects
/// - Emits `load_statuses` logging events with row/batch counts.
pub fn load_statuses<R: StatusRepository>(
    path: impl AsRef<Path>,
    batch_size: usize,
    repo: &R,
) -> IngestResult<LoadReport> {
    info!("event=load_statuses module=ingest status=start batch_size={batch_size}");

    let (records, rows_read) = parse_rows::<StatusRow>(path.as_ref(), batch_size)?;
    let report = insert_batches(&records, rows_read, batch_size, |batch| {
        repo.insert_statuses(batch)
    })?;

    info!(
        "event=load_statuses module=ingest status=ok rows_read={} rows_skipped={} inserted={} batches={}",
        report.rows_read, report.rows_skipped, report.records_inserted, report.batches
    );
    Ok(report)
}

fn parse_rows<Row: CsvRow>(
    path: &Path,
    batch_size: usize,
) -> IngestResult<(Vec<Row::Record>, usize)> {
    if batch_size == 0 {
        return Err(IngestError::InvalidBatchSize);
    }

    // flexible: short rows surface as absent optional columns and fall into
    // the lenient drop policy instead of failing the whole file.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut rows_read = 0;
    let mut records = Vec::new();
    for row in reader.deserialize::<Row>() {
        let row = row?;
        rows_read += 1;
        if let Some(record) = row.into_record() {
            records.push(record);
        }
    }

    Ok((records, rows_read))
}

fn insert_batches<Record>(
    records: &[Record],
    rows_read: usize,
    batch_size: usize,
    mut insert: impl FnMut(&[Record]) -> RepoResult<BatchOutcome>,
) -> IngestResult<LoadReport> {
    let mut report = LoadReport {
        rows_read,
        rows_skipped: rows_read - records.len(),
        ..LoadReport::default()
    };

    for (batch_index, batch) in records.chunks(batch_size).enumerate() {
        let outcome = insert(batch)?;
        report.records_inserted += outcome.inserted;
        report.batches += 1;

        if !outcome.is_clean() {
            warn!(
                "event=batch_insert module=ingest status=conflict batch={} duplicates={} inserted={}",
                batch_index, outcome.duplicates, report.records_inserted
            );
            return Err(IngestError::BatchConflict {
                batch_index,
                duplicates: outcome.duplicates,
                records_inserted: report.records_inserted,
            });
        }
    }

    Ok(report)
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
