//! HTTP handlers for the syncplane API.

pub mod connections;
pub mod destination_oauth;
pub mod destinations;
pub mod jobs;
pub mod operations;
pub mod scheduler;
pub mod sources;
pub mod workspaces;

pub use connections::*;
pub use destination_oauth::*;
pub use destinations::*;
pub use jobs::*;
pub use operations::*;
pub use scheduler::*;
pub use sources::*;
pub use workspaces::*;
