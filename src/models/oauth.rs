use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string the provider sends back to `/auth/callback`.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
}

/// Token endpoint payload, kept as raw JSON. Fields are read on demand so
/// that error bodies of any shape still decode.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct TokenResponse(pub Value);

impl TokenResponse {
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(Value::as_str)
    }

    /// OAuth error code, or the `status` of a Google API error object.
    pub fn error(&self) -> Option<&str> {
        match self.0.get("error")? {
            Value::String(error) => Some(error.as_str()),
            other => other.get("status").and_then(Value::as_str),
        }
    }

    pub fn error_description(&self) -> Option<&str> {
        self.0
            .get("error_description")
            .and_then(Value::as_str)
            .or_else(|| self.0.get("error")?.get("message")?.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub user_info: Value,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
