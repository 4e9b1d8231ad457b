//! OAuth2 token exchange for the cloud disk service
//!
//! The service uses the authorization-code flow for confidential clients:
//! the user opens the authorization URL, confirms access and receives a
//! check code to paste back into the UI. That code - and later the refresh
//! token - is exchanged at the token endpoint for an access/refresh pair.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
    RefreshToken, TokenResponse, TokenUrl,
};
use tracing::info;

use cloudbak_core::config::RemoteConfig;
use cloudbak_core::domain::TokenState;

/// OAuth2 exchange logic using the `oauth2` crate.
pub struct DiskAuth {
    client: BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
}

impl DiskAuth {
    /// Creates a DiskAuth from the remote account configuration.
    pub fn new(remote: &RemoteConfig) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(remote.client_id.clone()))
            .set_client_secret(ClientSecret::new(remote.client_secret.clone()))
            .set_token_uri(
                TokenUrl::new(remote.token_url.clone()).context("Invalid token URL")?,
            );

        Ok(Self { client })
    }

    /// Exchanges a one-time check code for a token pair.
    pub async fn exchange_code(&self, check_code: &str) -> Result<TokenState> {
        info!("Exchanging check code for tokens");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(check_code.to_string()))
            .request_async(&http_client)
            .await
            .context("Failed to exchange check code")?;

        let tokens = token_state(
            token_result.access_token().secret(),
            token_result
                .refresh_token()
                .map(|t| t.secret().to_string()),
            token_result.expires_in(),
            None,
        )?;

        info!(expires_at = %tokens.expires_at, "Obtained OAuth tokens");
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenState> {
        info!("Refreshing access token");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http_client)
            .await
            .context("Failed to refresh token")?;

        let tokens = token_state(
            token_result.access_token().secret(),
            token_result
                .refresh_token()
                .map(|t| t.secret().to_string()),
            token_result.expires_in(),
            Some(refresh_token),
        )?;

        info!(expires_at = %tokens.expires_at, "Refreshed access token");
        Ok(tokens)
    }
}

/// Builds a [`TokenState`] from the raw exchange result.
///
/// The service may omit the refresh token on a refresh response, in which
/// case the previous one stays valid and is carried over.
fn token_state(
    access_token: &str,
    refresh_token: Option<String>,
    expires_in: Option<std::time::Duration>,
    previous_refresh: Option<&str>,
) -> Result<TokenState> {
    let refresh_token = refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .context("Token response carried no refresh token")?;

    let expires_at = expires_in
        .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    Ok(TokenState {
        access_token: access_token.to_string(),
        refresh_token,
        expires_at,
    })
}
