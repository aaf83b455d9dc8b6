//! Status-message domain record.
//!
//! # Invariants
//! - `status_id` is the primary key.
//! - `user_id` must reference an existing user at creation time; the
//!   relational backend keeps enforcing it afterwards via foreign key.

use super::{require_field, ValidationError};
use serde::{Deserialize, Serialize};

/// One status message owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Stable status key, e.g. `dave03_00001`.
    pub status_id: String,
    /// Owning account key.
    pub user_id: String,
    #[serde(rename = "status_text")]
    pub text: String,
}

impl Status {
    pub fn new(
        status_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            status_id: status_id.into(),
            user_id: user_id.into(),
            text: text.into(),
        }
    }

    /// Checks that every required field is present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("status", "status_id", &self.status_id)?;
        require_field("status", "user_id", &self.user_id)?;
        require_field("status", "status_text", &self.text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn validate_accepts_complete_record() {
        let status = Status::new("dave03_00001", "dave03", "Sunny day");
        assert!(status.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_owner() {
        let status = Status::new("dave03_00001", "", "Sunny day");
        assert!(status.validate().is_err());
    }

    #[test]
    fn serialization_round_trips() {
        let status = Status::new("dave03_00001", "dave03", "Sunny day");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status_id"], "dave03_00001");
        assert_eq!(json["user_id"], "dave03");
        assert_eq!(json["status_text"], "Sunny day");

        let decoded: Status = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, status);
    }
}
