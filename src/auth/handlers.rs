use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, PublicUser, SignInRequest, SignUpRequest},
        services::{self, AuthUser},
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = services::sign_up(&state, &payload.name, &payload.email, &payload.password).await?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = services::sign_in(&state, &payload.email, &payload.password).await?;
    Ok(Json(response))
}

/// Sessions are stateless tokens; there is nothing to invalidate server-side.
/// The success result tells the client to discard its copy.
#[instrument]
pub async fn sign_out() -> Json<Value> {
    Json(json!({ "success": true }))
}

#[instrument(skip(user))]
pub async fn get_me(user: AuthUser) -> Json<PublicUser> {
    Json(PublicUser {
        id: user.id,
        email: user.email,
        name: user.name,
    })
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn public_user_serialization_omits_nothing_it_should_carry() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("Test User"));
        assert!(json.contains("id"));
    }
}
