//! Core domain logic for the socialnet data-access layer.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod doc;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use ingest::{load_statuses, load_users, IngestError, IngestResult, LoadReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::status::Status;
pub use model::user::User;
pub use model::ValidationError;
pub use repo::doc::{DocStatusRepository, DocUserRepository};
pub use repo::sqlite::{SqliteStatusRepository, SqliteUserRepository};
pub use repo::{BatchOutcome, RepoError, RepoResult, StatusRepository, UserRepository};
pub use service::social_service::SocialService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
