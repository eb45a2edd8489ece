// src/handlers/branch.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        branch::{Branch, BranchPayload},
        page::{Page, PageParams},
    },
};

#[utoipa::path(
    get,
    path = "/branch",
    tag = "Branch",
    params(PageParams),
    responses(
        (status = 200, description = "Página de carteiras")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Branch>>, AppError> {
    let page = app_state.branches.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/branch/all",
    tag = "Branch",
    responses(
        (status = 200, description = "Todas as carteiras", body = Vec<Branch>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_branches(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Branch>>, AppError> {
    let branches = app_state.branches.find_all_unpaged().await?;
    Ok(Json(branches))
}

#[utoipa::path(
    get,
    path = "/branch/{id}",
    tag = "Branch",
    responses(
        (status = 200, description = "Carteira encontrada", body = Branch),
        (status = 404, description = "Carteira não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Branch>, AppError> {
    let branch = app_state.branches.find_by_id(id).await?;
    Ok(Json(branch))
}

#[utoipa::path(
    post,
    path = "/branch",
    tag = "Branch",
    request_body = BranchPayload,
    responses(
        (status = 201, description = "Carteira criada", body = Branch),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    Json(payload): Json<BranchPayload>,
) -> Result<(StatusCode, Json<Branch>), AppError> {
    let branch = app_state.branches.create(payload).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

#[utoipa::path(
    put,
    path = "/branch/{id}",
    tag = "Branch",
    request_body = BranchPayload,
    responses(
        (status = 200, description = "Carteira atualizada", body = Branch),
        (status = 404, description = "Carteira não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_branch(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BranchPayload>,
) -> Result<Json<Branch>, AppError> {
    let branch = app_state.branches.update(id, payload).await?;
    Ok(Json(branch))
}
