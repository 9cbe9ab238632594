//! Database models, one module per configuration resource.

pub mod actor;
pub mod actor_catalog;
pub mod actor_definition;
pub mod connection;
pub mod job;
pub mod sync_operation;
pub mod workspace;

pub use actor::{Actor, ActorAndDefinition, CreateActor, UpdateActor};
pub use actor_catalog::{catalog_hash, ActorCatalog, ActorCatalogWithUpdatedAt};
pub use actor_definition::{ActorDefinition, ActorType, BreakingChange, SupportState};
pub use connection::{
    Connection, ConnectionQuery, ConnectionStatus, CreateConnection, UpdateConnection,
};
pub use job::{Job, JobConfigType, JobStatus};
pub use sync_operation::{CreateSyncOperation, OperatorType, SyncOperation, UpdateSyncOperation};
pub use workspace::{CreateWorkspace, UpdateWorkspace, Workspace};

/// Paginated query over resources that live in one or more workspaces.
#[derive(Debug, Clone, Default)]
pub struct ResourcesQuery {
    /// Workspaces to search in.
    pub workspace_ids: Vec<uuid::Uuid>,
    /// Include tombstoned rows.
    pub include_deleted: bool,
    /// Page size (SQL `LIMIT`). `None` returns every row.
    pub page_size: Option<i64>,
    /// Row offset (SQL `OFFSET`).
    pub row_offset: i64,
    /// Case-insensitive substring filter on the resource name.
    pub name_contains: Option<String>,
}
