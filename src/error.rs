use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::models::oauth::ErrorResponse;

/// Which outbound call produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TokenExchange,
    ProfileFetch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::TokenExchange => f.write_str("token exchange"),
            Stage::ProfileFetch => f.write_str("profile fetch"),
        }
    }
}

/// Failures of the code → token → profile pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("request to identity provider failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("identity provider returned a malformed {stage} response: {source}")]
    MalformedResponse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("identity provider rejected the authorization code: {}", rejection_reason(.error, .description))]
    ProviderRejected {
        error: String,
        description: Option<String>,
    },
}

fn rejection_reason<'a>(error: &'a str, description: &'a Option<String>) -> &'a str {
    description.as_deref().unwrap_or(error)
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Network(_) | AuthError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
            AuthError::ProviderRejected { .. } => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_code_maps_to_unauthorized() {
        let err = AuthError::ProviderRejected {
            error: "invalid_grant".to_string(),
            description: Some("Bad Request".to_string()),
        };

        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "identity provider rejected the authorization code: Bad Request"
        );
    }

    #[test]
    fn malformed_body_maps_to_bad_gateway() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = AuthError::MalformedResponse {
            stage: Stage::ProfileFetch,
            source,
        };

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("profile fetch"));
    }
}
