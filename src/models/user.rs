// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{auth::Role, branch::Branch};

// Conta de técnico/administrador vinda do banco.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub roles: Vec<Role>,
    pub branch_id: Option<i64>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// Linha do usuário com a carteira já resolvida (LEFT JOIN).
#[derive(Debug, Clone, FromRow)]
pub struct UserWithBranchRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub branch_id: Option<i64>,
    pub branch_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(min = 1, message = "O campo 'username' é obrigatório."))]
    pub username: String,

    // Na atualização, senha em branco mantém a atual.
    pub password: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    pub roles: Vec<Role>,

    pub branch_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub branch: Option<Branch>,
}

impl From<UserWithBranchRow> for UserResponse {
    fn from(row: UserWithBranchRow) -> Self {
        let branch = match (row.branch_id, row.branch_name) {
            (Some(id), Some(name)) => Some(Branch { id, name }),
            _ => None,
        };

        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            roles: row.roles,
            branch,
        }
    }
}
