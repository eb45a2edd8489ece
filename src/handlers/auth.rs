// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::{AuthResponse, LoginPayload, TokenInfo},
        user::{UserPayload, UserResponse},
    },
};

// Handler de login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token emitido", body = AuthResponse),
        (status = 401, description = "Usuário ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = app_state.auth.login(payload).await?;
    Ok(Json(response))
}

// Handler de registro
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = UserResponse),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = app_state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// Valida o token Bearer e devolve o dono e seus papéis.
#[utoipa::path(
    get,
    path = "/auth/validate",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido", body = TokenInfo),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn validate(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<TokenInfo>, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;
    let user = app_state.auth.authenticate(bearer.token()).await?;

    Ok(Json(TokenInfo {
        username: user.username,
        roles: user.roles,
    }))
}
