//! Outbound calls to the identity provider: exchange the authorization
//! code for an access token, then fetch the user's profile with it.

use oauth2::{AccessToken, AuthorizationCode};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::error::{AuthError, Stage};
use crate::models::AppConfig;
use crate::models::oauth::TokenResponse;

/// Runs the two-step exchange. In the default mode a token response
/// without `access_token` does not stop the pipeline; the profile fetch
/// is made with an empty bearer credential and its answer is returned.
pub(crate) async fn exchange_code_for_profile(
    config: &AppConfig,
    code: Option<&AuthorizationCode>,
) -> Result<Value, AuthError> {
    let token_data = request_token(config, code).await?;

    let access_token = match token_data.access_token() {
        Some(token) => AccessToken::new(token.to_string()),
        None => {
            tracing::warn!(
                error = token_data.error().unwrap_or("none"),
                description = token_data.error_description().unwrap_or(""),
                "token response carried no access_token"
            );

            if config.require_access_token {
                return Err(AuthError::ProviderRejected {
                    error: token_data.error().unwrap_or("missing access_token").to_string(),
                    description: token_data.error_description().map(str::to_string),
                });
            }
            AccessToken::new(String::new())
        }
    };

    fetch_user_info(config, &access_token).await
}

async fn request_token(
    config: &AppConfig,
    code: Option<&AuthorizationCode>,
) -> Result<TokenResponse, AuthError> {
    let client = reqwest::Client::new();

    let params = [
        ("code", code.map(|c| c.secret().as_str()).unwrap_or_default()),
        ("client_id", config.client_id_str()),
        ("client_secret", config.client_secret_str()),
        ("redirect_uri", config.redirect_url.as_str()),
        ("grant_type", "authorization_code"),
    ];

    tracing::debug!(url = config.endpoints.token_url.as_str(), "exchanging authorization code");
    let response = client
        .post(config.endpoints.token_url.as_str())
        .header(ACCEPT, "application/json")
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(%status, "token endpoint answered");

    serde_json::from_str(&body).map_err(|source| AuthError::MalformedResponse {
        stage: Stage::TokenExchange,
        source,
    })
}

/// Returns the profile body as-is, whatever the status code.
async fn fetch_user_info(
    config: &AppConfig,
    access_token: &AccessToken,
) -> Result<Value, AuthError> {
    let client = reqwest::Client::new();

    let response = client
        .get(config.endpoints.userinfo_url.as_str())
        .header(AUTHORIZATION, format!("Bearer {}", access_token.secret()))
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::warn!(%status, "userinfo endpoint refused the request, forwarding its body");
    }

    serde_json::from_str(&body).map_err(|source| AuthError::MalformedResponse {
        stage: Stage::ProfileFetch,
        source,
    })
}
