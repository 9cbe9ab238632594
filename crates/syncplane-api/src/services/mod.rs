//! Collaborators behind the API handlers.
//!
//! Each resource has a handler trait and a Postgres-backed implementation.
//! The scheduler and OAuth traits have no implementation here; they are
//! provided by the deployment when available.

mod actor_service;
pub mod connection_service;
pub mod destination_service;
pub mod job_service;
pub mod oauth;
pub mod operation_service;
pub mod scheduler;
pub mod source_service;
pub mod workspace_service;

pub use connection_service::{ConnectionHandler, ConnectionService};
pub use destination_service::{DestinationHandler, DestinationService};
pub use job_service::{JobHandler, JobService};
pub use oauth::OAuthHandler;
pub use operation_service::{OperationHandler, OperationService};
pub use scheduler::SchedulerHandler;
pub use source_service::{SourceHandler, SourceService};
pub use workspace_service::{slugify, WorkspaceHandler, WorkspaceService};
