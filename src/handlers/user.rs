// src/handlers/user.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        page::{Page, PageParams},
        user::{UserPayload, UserResponse},
    },
};

#[utoipa::path(
    get,
    path = "/user",
    tag = "User",
    params(PageParams),
    responses(
        (status = 200, description = "Página de usuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let page = app_state.users.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/user/all",
    tag = "User",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<UserResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_users(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = app_state.users.find_all_unpaged().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "User",
    responses(
        (status = 200, description = "Usuário encontrado", body = UserResponse),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = app_state.users.find_by_id(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/user",
    tag = "User",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = UserResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = app_state.users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/user/{id}",
    tag = "User",
    request_body = UserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = UserResponse),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserResponse>, AppError> {
    let user = app_state.users.update(id, payload).await?;
    Ok(Json(user))
}
