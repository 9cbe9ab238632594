//! Request and response models for the syncplane API.
//!
//! Bodies follow the RPC style of the API: every endpoint is a `POST` whose
//! body names the record it acts on.

pub mod connection;
pub mod destination;
pub mod job;
pub mod oauth;
pub mod operation;
pub mod scheduler;
pub mod source;
pub mod workspace;

pub use connection::*;
pub use destination::*;
pub use job::*;
pub use oauth::*;
pub use operation::*;
pub use scheduler::*;
pub use source::*;
pub use workspace::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use syncplane_db::BreakingChange;
use utoipa::ToSchema;
use validator::Validate;

/// Page selection for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Pagination {
    /// Maximum number of records returned.
    #[validate(range(min = 1, max = 1000, message = "Page size must be 1-1000"))]
    pub page_size: i64,

    /// Number of records skipped.
    #[serde(default)]
    #[validate(range(min = 0, message = "Row offset cannot be negative"))]
    pub row_offset: i64,
}

/// A breaking change the actor will hit when upgraded past `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreakingChangeRead {
    pub version: String,
    pub message: String,
    pub upgrade_deadline: NaiveDate,
    pub migration_documentation_url: String,
}

impl From<BreakingChange> for BreakingChangeRead {
    fn from(change: BreakingChange) -> Self {
        Self {
            version: change.version,
            message: change.message,
            upgrade_deadline: change.upgrade_deadline,
            migration_documentation_url: change.migration_documentation_url,
        }
    }
}
