// src/services/branch_service.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::BranchRepository,
    models::{
        branch::{Branch, BranchPayload},
        page::{Page, PageParams},
    },
};

#[derive(Clone)]
pub struct BranchService {
    pool: PgPool,
    branches: BranchRepository,
}

impl BranchService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            branches: BranchRepository::new(),
        }
    }

    pub async fn create(&self, payload: BranchPayload) -> Result<Branch, AppError> {
        payload.validate()?;
        self.branches.create(&self.pool, payload.name.trim()).await
    }

    pub async fn update(&self, id: i64, payload: BranchPayload) -> Result<Branch, AppError> {
        payload.validate()?;

        self.branches
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Carteira '{}' não encontrada.", id)))?;

        self.branches.update(&self.pool, id, payload.name.trim()).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Branch, AppError> {
        self.branches
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Carteira '{}' não encontrada.", id)))
    }

    pub async fn find_all(&self, params: &PageParams) -> Result<Page<Branch>, AppError> {
        // Com termo de busca a lista é curta; devolve tudo numa página só.
        if let Some(search) = params.search_term() {
            let content = self.branches.find_by_value(&self.pool, search).await?;
            let total = content.len() as i64;
            return Ok(Page::new(content, params, total));
        }

        let content = self
            .branches
            .find_all(&self.pool, params.limit(), params.offset())
            .await?;
        let total = self.branches.count(&self.pool).await?;

        Ok(Page::new(content, params, total))
    }

    pub async fn find_all_unpaged(&self) -> Result<Vec<Branch>, AppError> {
        self.branches.find_all_unpaged(&self.pool).await
    }
}
