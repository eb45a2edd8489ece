// src/handlers/asset.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::asset::{
        AssetCategory, AssetPayload, AssetResponse, AssetType, LeasePayload, UnleasePayload,
    },
};

#[utoipa::path(
    get,
    path = "/asset/types",
    tag = "Asset",
    responses(
        (status = 200, description = "Tipos de bem", body = Vec<AssetType>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_asset_types(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AssetType>>, AppError> {
    let types = app_state.assets.asset_types().await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/asset/categories",
    tag = "Asset",
    responses(
        (status = 200, description = "Categorias de bem", body = Vec<AssetCategory>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_asset_categories(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AssetCategory>>, AppError> {
    let categories = app_state.assets.asset_categories().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/asset/{assetId}",
    tag = "Asset",
    responses(
        (status = 200, description = "Bem encontrado", body = AssetResponse),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = app_state.assets.find_by_id(&asset_id).await?;
    Ok(Json(asset))
}

#[utoipa::path(
    get,
    path = "/asset/owner/{registrationNumber}",
    tag = "Asset",
    responses(
        (status = 200, description = "Bens do produtor", body = Vec<AssetResponse>),
        (status = 404, description = "Produtor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_assets_by_owner(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let assets = app_state.assets.find_by_owner(&registration_number).await?;
    Ok(Json(assets))
}

#[utoipa::path(
    get,
    path = "/asset/owner/{registrationNumber}/available",
    tag = "Asset",
    responses(
        (status = 200, description = "Bens não arrendados do produtor", body = Vec<AssetResponse>),
        (status = 404, description = "Produtor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_available_assets_by_owner(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let assets = app_state
        .assets
        .find_available_by_owner(&registration_number)
        .await?;
    Ok(Json(assets))
}

#[utoipa::path(
    get,
    path = "/asset/lessee/{registrationNumber}",
    tag = "Asset",
    responses(
        (status = 200, description = "Bens arrendados ao produtor", body = Vec<AssetResponse>),
        (status = 404, description = "Produtor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_assets_by_lessee(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let assets = app_state.assets.find_by_lessee(&registration_number).await?;
    Ok(Json(assets))
}

#[utoipa::path(
    post,
    path = "/asset",
    tag = "Asset",
    request_body = AssetPayload,
    responses(
        (status = 201, description = "Bem criado", body = AssetResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_asset(
    State(app_state): State<AppState>,
    Json(payload): Json<AssetPayload>,
) -> Result<(StatusCode, Json<AssetResponse>), AppError> {
    let asset = app_state.assets.create(payload).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

#[utoipa::path(
    put,
    path = "/asset/{assetId}",
    tag = "Asset",
    request_body = AssetPayload,
    responses(
        (status = 200, description = "Bem atualizado", body = AssetResponse),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_asset(
    State(app_state): State<AppState>,
    Path(asset_id): Path<String>,
    Json(payload): Json<AssetPayload>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = app_state.assets.update(&asset_id, payload).await?;
    Ok(Json(asset))
}

#[utoipa::path(
    delete,
    path = "/asset/{assetId}",
    tag = "Asset",
    responses(
        (status = 204, description = "Bem removido"),
        (status = 404, description = "Bem não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_asset(
    State(app_state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<StatusCode, AppError> {
    app_state.assets.delete(&asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/asset/lease",
    tag = "Asset",
    request_body = LeasePayload,
    responses(
        (status = 200, description = "Bem arrendado", body = AssetResponse),
        (status = 400, description = "Bem já arrendado ou arrendamento inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn lease_asset(
    State(app_state): State<AppState>,
    Json(payload): Json<LeasePayload>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = app_state.assets.lease(payload).await?;
    Ok(Json(asset))
}

#[utoipa::path(
    post,
    path = "/asset/unlease",
    tag = "Asset",
    request_body = UnleasePayload,
    responses(
        (status = 200, description = "Arrendamento desfeito", body = AssetResponse),
        (status = 400, description = "O bem não está arrendado")
    ),
    security(("api_jwt" = []))
)]
pub async fn unlease_asset(
    State(app_state): State<AppState>,
    Json(payload): Json<UnleasePayload>,
) -> Result<Json<AssetResponse>, AppError> {
    let asset = app_state.assets.unlease(payload).await?;
    Ok(Json(asset))
}
