// src/db/asset_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::asset::{Asset, AssetDetailRow},
};

const ASSET_COLUMNS: &str = "owner_registration, id_sap, description, address, amount,
        cultivable_area, asset_type_id, asset_category_id, leased_to";

const DETAIL_SELECT: &str = "SELECT a.owner_registration, a.id_sap, a.description, a.address,
        a.amount, a.cultivable_area,
        t.description AS asset_type, c.description AS asset_category,
        o.name AS owner_name, a.leased_to, l.name AS leased_to_name
 FROM assets a
 JOIN farmers o ON o.registration_number = a.owner_registration
 LEFT JOIN farmers l ON l.registration_number = a.leased_to
 LEFT JOIN asset_types t ON t.id = a.asset_type_id
 LEFT JOIN asset_categories c ON c.id = a.asset_category_id";

// Repositório dos bens. A chave é composta (dono, id_sap).
#[derive(Clone)]
pub struct AssetRepository;

impl AssetRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
        id_sap: i64,
    ) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE owner_registration = $1 AND id_sap = $2"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(owner_registration)
            .bind(id_sap)
            .fetch_optional(executor)
            .await?;

        Ok(asset)
    }

    /// Próximo id_sap livre para o dono: MAX + 1, começando em 1.
    pub async fn next_id_sap<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let next = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(id_sap), 0) + 1 FROM assets WHERE owner_registration = $1",
        )
        .bind(owner_registration)
        .fetch_one(executor)
        .await?;

        Ok(next)
    }

    pub async fn insert<'e, E>(&self, executor: E, asset: &Asset) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO assets (owner_registration, id_sap, description, address, amount,
                                 cultivable_area, asset_type_id, asset_category_id, leased_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&asset.owner_registration)
            .bind(asset.id_sap)
            .bind(&asset.description)
            .bind(&asset.address)
            .bind(asset.amount)
            .bind(asset.cultivable_area)
            .bind(asset.asset_type_id)
            .bind(asset.asset_category_id)
            .bind(&asset.leased_to)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(format!(
                            "Já existe um bem '{}' para o produtor '{}'.",
                            asset.id_sap, asset.owner_registration
                        ));
                    }
                }
                e.into()
            })
    }

    pub async fn update<'e, E>(&self, executor: E, asset: &Asset) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE assets
             SET description = $3, address = $4, amount = $5, cultivable_area = $6,
                 asset_type_id = $7, asset_category_id = $8, leased_to = $9
             WHERE owner_registration = $1 AND id_sap = $2
             RETURNING {ASSET_COLUMNS}"
        );
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(&asset.owner_registration)
            .bind(asset.id_sap)
            .bind(&asset.description)
            .bind(&asset.address)
            .bind(asset.amount)
            .bind(asset.cultivable_area)
            .bind(asset.asset_type_id)
            .bind(asset.asset_category_id)
            .bind(&asset.leased_to)
            .fetch_one(executor)
            .await?;

        Ok(asset)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
        id_sap: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assets WHERE owner_registration = $1 AND id_sap = $2")
            .bind(owner_registration)
            .bind(id_sap)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_leased_to<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
        id_sap: i64,
        leased_to: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE assets SET leased_to = $3 WHERE owner_registration = $1 AND id_sap = $2",
        )
        .bind(owner_registration)
        .bind(id_sap)
        .bind(leased_to)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_detail_by_id<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
        id_sap: i64,
    ) -> Result<Option<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE a.owner_registration = $1 AND a.id_sap = $2");
        let row = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(owner_registration)
            .bind(id_sap)
            .fetch_optional(executor)
            .await?;

        Ok(row)
    }

    pub async fn find_detail_by_owner<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
    ) -> Result<Vec<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE a.owner_registration = $1 ORDER BY a.id_sap");
        let rows = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(owner_registration)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Bens do dono ainda não arrendados.
    pub async fn find_available_by_owner<'e, E>(
        &self,
        executor: E,
        owner_registration: &str,
    ) -> Result<Vec<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "{DETAIL_SELECT} WHERE a.owner_registration = $1 AND a.leased_to IS NULL
             ORDER BY a.id_sap"
        );
        let rows = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(owner_registration)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Bens de vários donos de uma vez, para montar listas sem N+1.
    pub async fn find_detail_by_owners<'e, E>(
        &self,
        executor: E,
        owner_registrations: &[String],
    ) -> Result<Vec<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "{DETAIL_SELECT} WHERE a.owner_registration = ANY($1)
             ORDER BY a.owner_registration, a.id_sap"
        );
        let rows = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(owner_registrations)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn find_detail_by_lessees<'e, E>(
        &self,
        executor: E,
        lessee_registrations: &[String],
    ) -> Result<Vec<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "{DETAIL_SELECT} WHERE a.leased_to = ANY($1)
             ORDER BY a.owner_registration, a.id_sap"
        );
        let rows = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(lessee_registrations)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Bens arrendados a um produtor.
    pub async fn find_detail_by_lessee<'e, E>(
        &self,
        executor: E,
        lessee_registration: &str,
    ) -> Result<Vec<AssetDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query =
            format!("{DETAIL_SELECT} WHERE a.leased_to = $1 ORDER BY a.owner_registration, a.id_sap");
        let rows = sqlx::query_as::<_, AssetDetailRow>(&query)
            .bind(lessee_registration)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }
}
