//! Destination OAuth flows, delegated to an external provider integration.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CompleteDestinationOAuthRequest, CompleteOAuthResponse, DestinationOauthConsentRequest,
    OAuthConsentRead, SetInstancewideDestinationOauthParamsRequestBody,
};

/// Drives the OAuth handshake for destinations that authenticate with it.
#[async_trait]
pub trait OAuthHandler: Send + Sync {
    async fn get_destination_oauth_consent(
        &self,
        request: DestinationOauthConsentRequest,
    ) -> Result<OAuthConsentRead>;

    async fn complete_destination_oauth(
        &self,
        request: CompleteDestinationOAuthRequest,
    ) -> Result<CompleteOAuthResponse>;

    /// Store the client credentials used for every workspace.
    async fn set_destination_instancewide_oauth_params(
        &self,
        request: SetInstancewideDestinationOauthParamsRequestBody,
    ) -> Result<()>;
}
