// src/db/branch_repo.rs

use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, db::like_pattern, models::branch::Branch};

// Repositório das carteiras (unidades organizacionais).
#[derive(Clone)]
pub struct BranchRepository;

impl BranchRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(branch)
    }

    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?;

        Ok(branch)
    }

    pub async fn create<'e, E>(&self, executor: E, name: &str) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Branch>("INSERT INTO branches (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(format!(
                            "Já existe uma carteira chamada '{}'.",
                            name
                        ));
                    }
                }
                e.into()
            })
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, name: &str) -> Result<Branch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branch = sqlx::query_as::<_, Branch>(
            "UPDATE branches SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(branch)
    }

    pub async fn find_by_value<'e, E>(
        &self,
        executor: E,
        search: &str,
    ) -> Result<Vec<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, name FROM branches WHERE name ILIKE $1 ORDER BY name",
        )
        .bind(like_pattern(search))
        .fetch_all(executor)
        .await?;

        Ok(branches)
    }

    pub async fn find_all<'e, E>(
        &self,
        executor: E,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, name FROM branches ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(branches)
    }

    pub async fn find_all_unpaged<'e, E>(&self, executor: E) -> Result<Vec<Branch>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let branches = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches ORDER BY name")
            .fetch_all(executor)
            .await?;

        Ok(branches)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM branches")
            .fetch_one(executor)
            .await?;

        Ok(total)
    }
}
