use axum::response::{IntoResponse, Json};

use crate::models::oauth::WelcomeResponse;

pub const WELCOME_MESSAGE: &str = "Welcome to the Sandbox_AI Backend!";

pub async fn root_handler() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}
