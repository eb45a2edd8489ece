// src/db/user_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        user::{User, UserWithBranchRow},
    },
};

// Repositório de usuários (técnicos e administradores).
#[derive(Clone)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_username<'e, E>(
        &self,
        executor: E,
        username: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, password_hash, roles, branch_id
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, password_hash, roles, branch_id
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        username: &str,
        name: &str,
        password_hash: &str,
        roles: &[Role],
        branch_id: Option<i64>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, name, password_hash, roles, branch_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, name, password_hash, roles, branch_id",
        )
        .bind(username)
        .bind(name)
        .bind(password_hash)
        .bind(roles)
        .bind(branch_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em erro amigável.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(format!(
                        "O username '{}' já está em uso.",
                        username
                    ));
                }
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        username: &str,
        name: &str,
        password_hash: &str,
        roles: &[Role],
        branch_id: Option<i64>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET username = $2, name = $3, password_hash = $4, roles = $5, branch_id = $6
             WHERE id = $1
             RETURNING id, username, name, password_hash, roles, branch_id",
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(password_hash)
        .bind(roles)
        .bind(branch_id)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    pub async fn find_all_with_branch<'e, E>(
        &self,
        executor: E,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserWithBranchRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, UserWithBranchRow>(
            "SELECT u.id, u.username, u.name, u.roles, u.branch_id, b.name AS branch_name
             FROM users u
             LEFT JOIN branches b ON b.id = u.branch_id
             ORDER BY u.username
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    pub async fn find_all_unpaged<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<UserWithBranchRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, UserWithBranchRow>(
            "SELECT u.id, u.username, u.name, u.roles, u.branch_id, b.name AS branch_name
             FROM users u
             LEFT JOIN branches b ON b.id = u.branch_id
             ORDER BY u.username",
        )
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;

        Ok(total)
    }
}
