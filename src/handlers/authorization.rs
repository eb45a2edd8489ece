// src/handlers/authorization.rs

use axum::{Json, extract::Query};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError, middleware::auth::CurrentUser,
    services::authorization_service::has_permission,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PermissionQuery {
    /// Tela do frontend: "FamilyGroup", "Farmer" ou "User".
    pub item: String,
}

#[utoipa::path(
    get,
    path = "/authorization/has-permission",
    tag = "Authorization",
    params(PermissionQuery),
    responses(
        (status = 200, description = "Se o usuário pode acessar o item", body = bool)
    ),
    security(("api_jwt" = []))
)]
pub async fn check_permission(
    CurrentUser(user): CurrentUser,
    Query(query): Query<PermissionQuery>,
) -> Result<Json<bool>, AppError> {
    Ok(Json(has_permission(&user, &query.item)))
}
