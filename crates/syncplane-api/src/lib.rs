//! # syncplane API
//!
//! REST endpoints for the syncplane configuration store.
//!
//! Every endpoint is a `POST` with a JSON body. Missing records answer 404,
//! rejected input 400, void operations 204 and everything else 200.
//!
//! ## Endpoints
//!
//! ### Workspaces
//! - `POST /workspaces/create` - Create a workspace
//! - `POST /workspaces/get` - Get a workspace with resource counts
//! - `POST /workspaces/get_by_slug` - Get a workspace by slug
//! - `POST /workspaces/list` - List workspaces
//! - `POST /workspaces/update` - Update a workspace
//! - `POST /workspaces/tag_feedback_status_as_done` - Record feedback
//! - `POST /workspaces/delete` - Delete a workspace
//!
//! ### Sources and destinations
//! - `POST /sources/{create,get,list,search,update,clone}`
//! - `POST /sources/{delete,upgrade_version}`
//! - `POST /sources/most_recent_source_actor_catalog` - Latest discovered catalog
//! - `POST /sources/write_discover_catalog_result` - Store a discovered catalog
//! - `POST /sources/{check_connection,check_connection_for_update,discover_schema}`
//! - `POST /destinations/{create,get,list,search,update,clone}`
//! - `POST /destinations/{delete,upgrade_version}`
//! - `POST /destinations/{check_connection,check_connection_for_update}`
//!
//! ### Connections, operations and jobs
//! - `POST /connections/{create,get,list,update,delete}`
//! - `POST /operations/{create,get,list,update,delete}`
//! - `POST /jobs/{create,cancel,get_debug_info}`
//!
//! ### External collaborators
//! - `POST /scheduler/{sources,destinations}/check_connection`
//! - `POST /destination_oauths/{get_consent_url,complete_oauth,oauth_params/create}`
//!
//! These answer 501 unless a [`SchedulerHandler`] or [`OAuthHandler`] is
//! attached to the state.
//!
//! ## Example
//!
//! ```ignore
//! use syncplane_api::{api_routes, ApiState};
//!
//! let app = Router::new().nest("/api/v1", api_routes(ApiState::from_pool(pool)));
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod router;
pub mod services;

pub use error::{ApiError, Result};
pub use extract::ApiJson;
pub use matcher::{matches, merge_configuration, DestinationMatcher, Matchable, SourceMatcher};
pub use router::{api_routes, ApiState};
pub use services::{
    ConnectionHandler, DestinationHandler, JobHandler, OAuthHandler, OperationHandler,
    SchedulerHandler, SourceHandler, WorkspaceHandler,
};
