//! # syncplane-db
//!
//! Persistence layer for the syncplane configuration store.
//!
//! Each resource (workspaces, connector definitions, sources and destinations,
//! connections, sync operations, catalogs, jobs) owns its model type and the
//! queries that read and write it. Callers go straight to the resource they
//! need; there is no catch-all repository in between.
//!
//! ## Example
//!
//! ```rust,ignore
//! use syncplane_db::{run_migrations, models::Workspace};
//!
//! let pool = sqlx::PgPool::connect(&database_url).await?;
//! run_migrations(&pool).await?;
//! let workspace = Workspace::get(&pool, workspace_id, false).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod models;

pub use error::{ConfigKind, DbError, DbResult};
pub use migrations::run_migrations;
pub use models::*;

pub use sqlx::PgPool;
