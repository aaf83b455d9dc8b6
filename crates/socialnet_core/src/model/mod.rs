//! Domain records for the social-network data set.
//!
//! # Responsibility
//! - Define the canonical user and status records shared by both backends.
//! - Own field-presence validation applied before every write.
//!
//! # Invariants
//! - `user_id` / `status_id` are caller-supplied stable keys, never generated.
//! - Write paths must call `validate()` before persistence.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod status;
pub mod user;

/// Field-presence violation raised before any record reaches a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or whitespace-only.
    EmptyField {
        record: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { record, field } => {
                write!(f, "{record}.{field} must not be empty")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_field(
    record: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { record, field });
    }
    Ok(())
}
