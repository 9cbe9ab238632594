//! Error types for the syncplane-db crate.
//!
//! One error type is shared by every resource. A missing record is reported
//! as [`DbError::NotFound`] carrying the kind of entity and the key that failed
//! to resolve, so callers never have to translate between per-resource
//! "not found" flavours.

use thiserror::Error;

/// Kind of configuration entity, used to describe which lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Workspace,
    SourceDefinition,
    DestinationDefinition,
    Source,
    Destination,
    Connection,
    SyncOperation,
    ActorCatalog,
    Job,
}

impl ConfigKind {
    /// Stable machine-readable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::Workspace => "workspace",
            ConfigKind::SourceDefinition => "source_definition",
            ConfigKind::DestinationDefinition => "destination_definition",
            ConfigKind::Source => "source",
            ConfigKind::Destination => "destination",
            ConfigKind::Connection => "connection",
            ConfigKind::SyncOperation => "sync_operation",
            ConfigKind::ActorCatalog => "actor_catalog",
            ConfigKind::Job => "job",
        }
    }
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database operation errors.
///
/// # Example
///
/// ```rust
/// use syncplane_db::{ConfigKind, DbError};
///
/// fn describe(err: &DbError) -> String {
///     match err {
///         DbError::NotFound { kind, id } => format!("no {kind} with key {id}"),
///         other => other.to_string(),
///     }
/// }
///
/// let err = DbError::not_found(ConfigKind::Source, "abc");
/// assert_eq!(describe(&err), "no source with key abc");
/// ```
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed to execute.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// The requested key does not resolve to a persisted record.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ConfigKind, id: String },

    /// The write was rejected before reaching the database.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The write collides with a unique constraint.
    #[error("Conflict on {constraint}: {message}")]
    Conflict { constraint: String, message: String },
}

impl DbError {
    /// Build a [`DbError::NotFound`] for any displayable key.
    pub fn not_found(kind: ConfigKind, id: impl ToString) -> Self {
        DbError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Check if this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    /// Check if this error indicates a migration problem.
    #[must_use]
    pub fn is_migration_error(&self) -> bool {
        matches!(self, DbError::MigrationFailed(_))
    }

    /// Check if this error indicates a query problem.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, DbError::QueryFailed(_))
    }

    /// Check if this error indicates a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// Check if this error indicates a validation error.
    #[must_use]
    pub fn is_validation_failed(&self) -> bool {
        matches!(self, DbError::ValidationFailed(_))
    }

    /// Check if this error indicates a unique constraint violation.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DbError::ConnectionFailed(err)
            }
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::Conflict {
                    constraint: db_err.constraint().unwrap_or("unique").to_string(),
                    message: db_err.message().to_string(),
                }
            }
            other => DbError::QueryFailed(other),
        }
    }
}

/// Result alias for persistence calls.
pub type DbResult<T> = Result<T, DbError>;
