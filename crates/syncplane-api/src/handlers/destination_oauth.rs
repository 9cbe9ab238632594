//! HTTP handlers for destination OAuth.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    CompleteDestinationOAuthRequest, CompleteOAuthResponse, DestinationOauthConsentRequest,
    OAuthConsentRead, SetInstancewideDestinationOauthParamsRequestBody,
};
use crate::router::ApiState;

/// Get the consent URL of a destination's OAuth provider.
#[utoipa::path(
    post,
    path = "/destination_oauths/get_consent_url",
    tag = "Destination OAuth",
    request_body = DestinationOauthConsentRequest,
    responses(
        (status = 200, description = "Consent URL", body = OAuthConsentRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Destination definition not found"),
        (status = 501, description = "OAuth not configured")
    )
)]
pub async fn get_destination_oauth_consent(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationOauthConsentRequest>,
) -> Result<Json<OAuthConsentRead>> {
    let consent = state
        .oauth()?
        .get_destination_oauth_consent(request)
        .await?;
    Ok(Json(consent))
}

/// Finish an OAuth flow with the provider's callback parameters.
#[utoipa::path(
    post,
    path = "/destination_oauths/complete_oauth",
    tag = "Destination OAuth",
    request_body = CompleteDestinationOAuthRequest,
    responses(
        (status = 200, description = "OAuth outcome", body = CompleteOAuthResponse),
        (status = 404, description = "Destination definition not found"),
        (status = 501, description = "OAuth not configured")
    )
)]
pub async fn complete_destination_oauth(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<CompleteDestinationOAuthRequest>,
) -> Result<Json<CompleteOAuthResponse>> {
    let response = state.oauth()?.complete_destination_oauth(request).await?;
    Ok(Json(response))
}

/// Store instance-wide OAuth client parameters for a destination definition.
#[utoipa::path(
    post,
    path = "/destination_oauths/oauth_params/create",
    tag = "Destination OAuth",
    request_body = SetInstancewideDestinationOauthParamsRequestBody,
    responses(
        (status = 200, description = "Parameters stored"),
        (status = 404, description = "Destination definition not found"),
        (status = 501, description = "OAuth not configured")
    )
)]
pub async fn set_instancewide_destination_oauth_params(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SetInstancewideDestinationOauthParamsRequestBody>,
) -> Result<StatusCode> {
    state
        .oauth()?
        .set_destination_instancewide_oauth_params(request)
        .await?;
    Ok(StatusCode::OK)
}
