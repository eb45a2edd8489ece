// src/models/branch.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Carteira (unidade organizacional) à qual produtores e técnicos pertencem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BranchPayload {
    #[validate(length(min = 1, message = "O nome da carteira é obrigatório."))]
    pub name: String,
}
