//! Sync operation request and response models.

use serde::{Deserialize, Serialize};
use syncplane_db::{OperatorType, SyncOperation};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request to create an operation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OperationCreate {
    pub workspace_id: Uuid,
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: String,
    pub operator_type: OperatorType,
    #[serde(default)]
    pub operator_config: serde_json::Value,
}

/// Body naming an operation by ID.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OperationIdRequestBody {
    pub operation_id: Uuid,
}

/// Partial update of an operation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OperationUpdate {
    pub operation_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 256, message = "Name must be 1-256 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_type: Option<OperatorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_config: Option<serde_json::Value>,
}

/// Operation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperationRead {
    pub operation_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub operator_type: OperatorType,
    pub operator_config: serde_json::Value,
}

impl From<SyncOperation> for OperationRead {
    fn from(operation: SyncOperation) -> Self {
        Self {
            operation_id: operation.operation_id,
            workspace_id: operation.workspace_id,
            name: operation.name,
            operator_type: operation.operator_type,
            operator_config: operation.operator_config,
        }
    }
}

/// List of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperationReadList {
    pub operations: Vec<OperationRead>,
}
