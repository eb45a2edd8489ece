// src/handlers/farmer.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        farmer::{FarmerPayload, FarmerResponse, FarmerType},
        page::{Page, PageParams},
    },
};

#[utoipa::path(
    get,
    path = "/farmer",
    tag = "Farmer",
    params(PageParams),
    responses(
        (status = 200, description = "Página de produtores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmers(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<FarmerResponse>>, AppError> {
    let page = app_state.farmers.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/farmer/available",
    tag = "Farmer",
    params(PageParams),
    responses(
        (status = 200, description = "Produtores disponíveis para grupo familiar")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_available_farmers(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<FarmerResponse>>, AppError> {
    let page = app_state.farmers.find_available(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/farmer/types",
    tag = "Farmer",
    responses(
        (status = 200, description = "Tipos de produtor", body = Vec<FarmerType>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmer_types(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<FarmerType>>, AppError> {
    let types = app_state.farmers.farmer_types().await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/farmer/{registrationNumber}",
    tag = "Farmer",
    responses(
        (status = 200, description = "Produtor encontrado", body = FarmerResponse),
        (status = 404, description = "Produtor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_farmer(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
) -> Result<Json<FarmerResponse>, AppError> {
    let farmer = app_state.farmers.find_by_id(&registration_number).await?;
    Ok(Json(farmer))
}

#[utoipa::path(
    get,
    path = "/farmer/technician/{technicianId}",
    tag = "Farmer",
    responses(
        (status = 200, description = "Produtores do técnico", body = Vec<FarmerResponse>),
        (status = 404, description = "Técnico não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmers_by_technician(
    State(app_state): State<AppState>,
    Path(technician_id): Path<i64>,
) -> Result<Json<Vec<FarmerResponse>>, AppError> {
    let farmers = app_state.farmers.find_by_technician(technician_id).await?;
    Ok(Json(farmers))
}

#[utoipa::path(
    get,
    path = "/farmer/technician/none",
    tag = "Farmer",
    responses(
        (status = 200, description = "Produtores sem técnico", body = Vec<FarmerResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmers_without_technician(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<FarmerResponse>>, AppError> {
    let farmers = app_state.farmers.find_without_technician().await?;
    Ok(Json(farmers))
}

#[utoipa::path(
    get,
    path = "/farmer/type/{typeId}",
    tag = "Farmer",
    responses(
        (status = 200, description = "Produtores do tipo", body = Vec<FarmerResponse>),
        (status = 404, description = "Tipo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmers_by_type(
    State(app_state): State<AppState>,
    Path(type_id): Path<i32>,
) -> Result<Json<Vec<FarmerResponse>>, AppError> {
    let farmers = app_state.farmers.find_by_type(type_id).await?;
    Ok(Json(farmers))
}

#[utoipa::path(
    get,
    path = "/farmer/branch/{branchId}",
    tag = "Farmer",
    responses(
        (status = 200, description = "Produtores da carteira", body = Vec<FarmerResponse>),
        (status = 404, description = "Carteira não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_farmers_by_branch(
    State(app_state): State<AppState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Vec<FarmerResponse>>, AppError> {
    let farmers = app_state.farmers.find_by_branch(branch_id).await?;
    Ok(Json(farmers))
}

#[utoipa::path(
    post,
    path = "/farmer",
    tag = "Farmer",
    request_body = FarmerPayload,
    responses(
        (status = 201, description = "Produtor criado", body = FarmerResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_farmer(
    State(app_state): State<AppState>,
    Json(payload): Json<FarmerPayload>,
) -> Result<(StatusCode, Json<FarmerResponse>), AppError> {
    let farmer = app_state.farmers.create(payload).await?;
    Ok((StatusCode::CREATED, Json(farmer)))
}

#[utoipa::path(
    put,
    path = "/farmer/{registrationNumber}",
    tag = "Farmer",
    request_body = FarmerPayload,
    responses(
        (status = 200, description = "Produtor atualizado", body = FarmerResponse),
        (status = 404, description = "Produtor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_farmer(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
    Json(payload): Json<FarmerPayload>,
) -> Result<Json<FarmerResponse>, AppError> {
    let farmer = app_state
        .farmers
        .update(&registration_number, payload)
        .await?;
    Ok(Json(farmer))
}
