//! Connector checks and schema discovery.
//!
//! Running a connector means launching its container, which this service
//! does not do. The scheduler that does is plugged in behind this trait; the
//! API answers `501` for these endpoints when none is configured.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CheckConnectionRead, DestinationCoreConfig, DestinationIdRequestBody, DestinationUpdate,
    SourceCoreConfig, SourceDiscoverSchemaRead, SourceDiscoverSchemaRequestBody,
    SourceIdRequestBody, SourceUpdate,
};

/// Runs connector check and discover jobs on demand.
#[async_trait]
pub trait SchedulerHandler: Send + Sync {
    /// Check the stored configuration of a source.
    async fn check_source_connection_from_source_id(
        &self,
        request: SourceIdRequestBody,
    ) -> Result<CheckConnectionRead>;

    /// Check an unsaved source configuration.
    async fn check_source_connection_from_source_create(
        &self,
        request: SourceCoreConfig,
    ) -> Result<CheckConnectionRead>;

    /// Check a source with a pending update applied.
    async fn check_source_connection_for_update(
        &self,
        request: SourceUpdate,
    ) -> Result<CheckConnectionRead>;

    /// Discover the catalog a source exposes.
    async fn discover_schema_for_source(
        &self,
        request: SourceDiscoverSchemaRequestBody,
    ) -> Result<SourceDiscoverSchemaRead>;

    async fn check_destination_connection_from_destination_id(
        &self,
        request: DestinationIdRequestBody,
    ) -> Result<CheckConnectionRead>;

    async fn check_destination_connection_from_destination_create(
        &self,
        request: DestinationCoreConfig,
    ) -> Result<CheckConnectionRead>;

    async fn check_destination_connection_for_update(
        &self,
        request: DestinationUpdate,
    ) -> Result<CheckConnectionRead>;
}
