use crate::models::{AppConfig, AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use oauth2::url::Url;

/// Builds the consent-screen URL. Parameter order is fixed so the same
/// configuration always yields the same URL.
fn authorization_url(config: &AppConfig) -> Url {
    let mut url = config.endpoints.auth_url.url().clone();

    url.query_pairs_mut()
        .append_pair("client_id", config.client_id_str())
        .append_pair("redirect_uri", config.redirect_url.as_str())
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope_param())
        .append_pair("access_type", "offline");

    url
}

pub async fn login_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    if app_state.config.client_id.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID is not set, provider will reject this login");
    }

    let constructed_url = authorization_url(&app_state.config);

    tracing::debug!(host = ?constructed_url.host_str(), "redirecting to identity provider");
    Redirect::temporary(constructed_url.as_str())
}
