// src/db/lookup_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::{
        asset::{AssetCategory, AssetType},
        farmer::FarmerType,
    },
};

// Categoria dos bens arrendados de terceiros.
pub const LEASED_CATEGORY_ID: i64 = 2;

// Tipo genérico usado quando o arquivo não traz o tipo do bem.
pub const DEFAULT_ASSET_TYPE_ID: i64 = 1;

// Tabelas de referência (tipos de produtor, tipos e categorias de bens).
#[derive(Clone)]
pub struct LookupRepository;

impl LookupRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_farmer_type<'e, E>(
        &self,
        executor: E,
        id: i32,
    ) -> Result<Option<FarmerType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let farmer_type = sqlx::query_as::<_, FarmerType>(
            "SELECT id, description FROM farmer_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(farmer_type)
    }

    pub async fn find_asset_type<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<AssetType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset_type =
            sqlx::query_as::<_, AssetType>("SELECT id, description FROM asset_types WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(asset_type)
    }

    pub async fn find_asset_category<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<AssetCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, AssetCategory>(
            "SELECT id, description FROM asset_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(category)
    }

    pub async fn all_farmer_types<'e, E>(&self, executor: E) -> Result<Vec<FarmerType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, FarmerType>(
            "SELECT id, description FROM farmer_types ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(types)
    }

    pub async fn all_asset_types<'e, E>(&self, executor: E) -> Result<Vec<AssetType>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let types = sqlx::query_as::<_, AssetType>(
            "SELECT id, description FROM asset_types ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(types)
    }

    pub async fn all_asset_categories<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<AssetCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, AssetCategory>(
            "SELECT id, description FROM asset_categories ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(categories)
    }
}
