// src/services/user_service.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{BranchRepository, UserRepository},
    models::{
        page::{Page, PageParams},
        user::{User, UserPayload, UserResponse, UserWithBranchRow},
    },
};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    users: UserRepository,
    branches: BranchRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            users: UserRepository::new(),
            branches: BranchRepository::new(),
        }
    }

    pub async fn create(&self, payload: UserPayload) -> Result<UserResponse, AppError> {
        payload.validate()?;

        let password = payload
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::bad_request("O campo 'password' é obrigatório."))?;

        self.check_branch(payload.branch_id).await?;

        let password_hash = hash_password(password).await?;
        let name = payload.name.unwrap_or_else(|| payload.username.clone());

        let user = self
            .users
            .create(
                &self.pool,
                &payload.username,
                &name,
                &password_hash,
                &payload.roles,
                payload.branch_id,
            )
            .await?;

        self.to_response(user).await
    }

    pub async fn update(&self, id: i64, payload: UserPayload) -> Result<UserResponse, AppError> {
        payload.validate()?;

        let current = self
            .users
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Usuário '{}' não encontrado.", id)))?;

        self.check_branch(payload.branch_id).await?;

        // Senha em branco mantém o hash atual.
        let password_hash = match payload.password.filter(|p| !p.is_empty()) {
            Some(password) => hash_password(password).await?,
            None => current.password_hash,
        };

        let name = payload.name.unwrap_or(current.name);

        let user = self
            .users
            .update(
                &self.pool,
                id,
                &payload.username,
                &name,
                &password_hash,
                &payload.roles,
                payload.branch_id,
            )
            .await?;

        self.to_response(user).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<UserResponse, AppError> {
        let user = self
            .users
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Usuário '{}' não encontrado.", id)))?;

        self.to_response(user).await
    }

    pub async fn find_all(&self, params: &PageParams) -> Result<Page<UserResponse>, AppError> {
        let rows = self
            .users
            .find_all_with_branch(&self.pool, params.limit(), params.offset())
            .await?;
        let total = self.users.count(&self.pool).await?;

        let content = rows.into_iter().map(UserResponse::from).collect();
        Ok(Page::new(content, params, total))
    }

    pub async fn find_all_unpaged(&self) -> Result<Vec<UserResponse>, AppError> {
        let rows = self.users.find_all_unpaged(&self.pool).await?;
        Ok(rows.into_iter().map(UserResponse::from).collect())
    }

    async fn check_branch(&self, branch_id: Option<i64>) -> Result<(), AppError> {
        if let Some(branch_id) = branch_id {
            self.branches
                .find_by_id(&self.pool, branch_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Carteira '{}' não encontrada.", branch_id))
                })?;
        }
        Ok(())
    }

    async fn to_response(&self, user: User) -> Result<UserResponse, AppError> {
        let branch_name = match user.branch_id {
            Some(branch_id) => self
                .branches
                .find_by_id(&self.pool, branch_id)
                .await?
                .map(|b| b.name),
            None => None,
        };

        Ok(UserResponse::from(UserWithBranchRow {
            id: user.id,
            username: user.username,
            name: user.name,
            roles: user.roles,
            branch_id: user.branch_id,
            branch_name,
        }))
    }
}

pub(crate) async fn hash_password(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))??;

    Ok(hash)
}
