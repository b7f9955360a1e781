use crate::error::AuthError;
use crate::models::AppState;
use crate::models::oauth::{CallbackParams, CallbackResponse};
use axum::{
    extract::{Query, State},
    response::Json,
};
use oauth2::AuthorizationCode;

use super::provider::exchange_code_for_profile;

pub async fn callback_handler(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackResponse>, AuthError> {
    tracing::debug!(
        has_code = params.code.is_some(),
        has_state = params.state.is_some(),
        scope = params.scope.as_deref().unwrap_or(""),
        "OAuth callback received"
    );

    if let Some(error) = &params.error {
        tracing::warn!(%error, "provider redirected back with an error, exchanging anyway");
    }

    let code = params.code.map(AuthorizationCode::new);
    let user_info = exchange_code_for_profile(&app_state.config, code.as_ref()).await?;

    Ok(Json(CallbackResponse { user_info }))
}
