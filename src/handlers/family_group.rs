// src/handlers/family_group.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        family_group::{
            Cultivation, CultivationWithFreeArea, FamilyGroupMembersResponse, FamilyGroupPayload,
            FamilyGroupResponse, RegistryPayload,
        },
        farmer::FarmerSummary,
        page::{Page, PageParams},
    },
};

#[utoipa::path(
    get,
    path = "/family-group",
    tag = "FamilyGroup",
    params(PageParams),
    responses(
        (status = 200, description = "Página de grupos familiares")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_family_groups(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<FamilyGroupResponse>>, AppError> {
    let page = app_state.family_groups.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Grupo com membros", body = FamilyGroupMembersResponse),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_family_group(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state.family_groups.find_by_id(id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/family-group/member/{registrationNumber}",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Grupo do produtor", body = FamilyGroupMembersResponse),
        (status = 404, description = "Produtor sem grupo ou não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_group_of_member(
    State(app_state): State<AppState>,
    Path(registration_number): Path<String>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state
        .family_groups
        .group_of_member(&registration_number)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}/total-area",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Área total dos membros do grupo", body = f64),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_total_area(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<f64>, AppError> {
    let total_area = app_state.family_groups.total_area(id).await?;
    Ok(Json(total_area))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}/members",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Membros do grupo", body = Vec<FarmerSummary>),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<FarmerSummary>>, AppError> {
    let members = app_state.family_groups.members(id).await?;
    Ok(Json(members))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}/lessors",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Arrendadores do grupo", body = Vec<FarmerSummary>),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_lessors(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<FarmerSummary>>, AppError> {
    let lessors = app_state.family_groups.lessors(id).await?;
    Ok(Json(lessors))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}/cultivation",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Cultivo e área livre do grupo", body = CultivationWithFreeArea),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cultivation(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CultivationWithFreeArea>, AppError> {
    let cultivation = app_state.family_groups.cultivation(id).await?;
    Ok(Json(cultivation))
}

#[utoipa::path(
    get,
    path = "/family-group/{id}/free-area",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Área livre do grupo", body = f64),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_free_area(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<f64>, AppError> {
    let free_area = app_state.family_groups.free_area(id).await?;
    Ok(Json(free_area))
}

#[utoipa::path(
    get,
    path = "/family-group/technician/{technicianId}/cultivations",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Cultivo dos grupos do técnico", body = Vec<CultivationWithFreeArea>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cultivations_by_technician(
    State(app_state): State<AppState>,
    Path(technician_id): Path<i64>,
) -> Result<Json<Vec<CultivationWithFreeArea>>, AppError> {
    let cultivations = app_state
        .family_groups
        .cultivations_by_technician(technician_id)
        .await?;
    Ok(Json(cultivations))
}

#[utoipa::path(
    get,
    path = "/family-group/branch/{branchId}/cultivations",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Cultivo dos grupos da carteira", body = Vec<CultivationWithFreeArea>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cultivations_by_branch(
    State(app_state): State<AppState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Vec<CultivationWithFreeArea>>, AppError> {
    let cultivations = app_state
        .family_groups
        .cultivations_by_branch(branch_id)
        .await?;
    Ok(Json(cultivations))
}

#[utoipa::path(
    post,
    path = "/family-group",
    tag = "FamilyGroup",
    request_body = FamilyGroupPayload,
    responses(
        (status = 201, description = "Grupo criado", body = FamilyGroupMembersResponse),
        (status = 400, description = "Produtor indisponível ou dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_family_group(
    State(app_state): State<AppState>,
    Json(payload): Json<FamilyGroupPayload>,
) -> Result<(StatusCode, Json<FamilyGroupMembersResponse>), AppError> {
    let group = app_state.family_groups.create(payload).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    put,
    path = "/family-group/{id}/registry",
    tag = "FamilyGroup",
    request_body = RegistryPayload,
    responses(
        (status = 200, description = "Registro atualizado", body = FamilyGroupMembersResponse),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_registry(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RegistryPayload>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state
        .family_groups
        .update_registry(id, payload.registry.as_deref())
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/family-group/{id}/member/{registrationNumber}",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Membro adicionado", body = FamilyGroupMembersResponse),
        (status = 400, description = "Produtor indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    Path((id, registration_number)): Path<(i64, String)>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state
        .family_groups
        .add_member(id, &registration_number)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/family-group/{id}/member/{registrationNumber}",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Membro removido", body = FamilyGroupMembersResponse),
        (status = 400, description = "Produtor não pertence ao grupo")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_member(
    State(app_state): State<AppState>,
    Path((id, registration_number)): Path<(i64, String)>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state
        .family_groups
        .remove_member(id, &registration_number)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/family-group/{id}/principal/{registrationNumber}",
    tag = "FamilyGroup",
    responses(
        (status = 200, description = "Principal alterado", body = FamilyGroupMembersResponse),
        (status = 400, description = "Produtor indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_principal(
    State(app_state): State<AppState>,
    Path((id, registration_number)): Path<(i64, String)>,
) -> Result<Json<FamilyGroupMembersResponse>, AppError> {
    let group = app_state
        .family_groups
        .change_principal(id, &registration_number)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/family-group/{id}/cultivation",
    tag = "FamilyGroup",
    request_body = Cultivation,
    responses(
        (status = 200, description = "Cultivo atualizado", body = CultivationWithFreeArea),
        (status = 400, description = "Áreas acima do total do grupo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cultivation(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(cultivation): Json<Cultivation>,
) -> Result<Json<CultivationWithFreeArea>, AppError> {
    let cultivation = app_state
        .family_groups
        .update_cultivation(id, cultivation)
        .await?;
    Ok(Json(cultivation))
}
