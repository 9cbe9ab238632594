//! Destination OAuth models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request for the consent URL of a destination's OAuth provider.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DestinationOauthConsentRequest {
    pub destination_definition_id: Uuid,
    pub workspace_id: Uuid,
    #[validate(url(message = "Redirect URL must be a valid URL"))]
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_auth_input_configuration: Option<serde_json::Value>,
}

/// Consent URL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OAuthConsentRead {
    pub consent_url: String,
}

/// Callback parameters that finish an OAuth flow.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompleteDestinationOAuthRequest {
    pub destination_definition_id: Uuid,
    pub workspace_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub query_params: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o_auth_input_configuration: Option<serde_json::Value>,
}

/// Outcome of an OAuth completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompleteOAuthResponse {
    pub request_succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_error: Option<String>,
    /// Credentials to merge into the destination configuration.
    #[serde(default)]
    pub auth_payload: serde_json::Value,
}

/// Instance-wide OAuth client parameters for a destination definition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SetInstancewideDestinationOauthParamsRequestBody {
    pub destination_definition_id: Uuid,
    pub params: serde_json::Value,
}
