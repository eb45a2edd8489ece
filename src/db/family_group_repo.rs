// src/db/family_group_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::like_pattern,
    models::{
        family_group::{Cultivation, FamilyGroup, FamilyGroupDetailRow, FreeAreaRow},
        farmer::FarmerSummary,
    },
};

const GROUP_COLUMNS: &str = "id, principal_registration, registry,
        canola_area, wheat_area, corn_silage_area, grain_corn_area, bean_area, soybean_area,
        canola_area_participation, wheat_area_participation, corn_silage_area_participation,
        grain_corn_area_participation, bean_area_participation, soybean_area_participation";

const DETAIL_SELECT: &str = "SELECT fg.id, fg.registry, fg.principal_registration,
        p.name AS principal_name, p.status AS principal_status,
        p.owned_area AS principal_owned_area, p.leased_area AS principal_leased_area
 FROM family_groups fg
 JOIN farmers p ON p.registration_number = fg.principal_registration";

// Busca livre: nome ou matrícula do principal, ou o registro do grupo.
const SEARCH_WHERE: &str =
    "(p.name ILIKE $1 OR p.registration_number ILIKE $1 OR fg.registry ILIKE $1)";

// Área livre de um grupo: soma dos bens arrendados a membros mais os bens
// próprios de membros que não estão arrendados a ninguém.
const FREE_AREA_SELECT: &str = "SELECT COALESCE(SUM(a.amount), 0)
 FROM assets a
 LEFT JOIN farmers l ON l.registration_number = a.leased_to
 LEFT JOIN farmers o ON o.registration_number = a.owner_registration
 WHERE l.family_group_id = $1 OR (a.leased_to IS NULL AND o.family_group_id = $1)";

// Repositório dos grupos familiares.
#[derive(Clone)]
pub struct FamilyGroupRepository;

impl FamilyGroupRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<FamilyGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("SELECT {GROUP_COLUMNS} FROM family_groups WHERE id = $1");
        let group = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(group)
    }

    pub async fn find_by_principal<'e, E>(
        &self,
        executor: E,
        principal_registration: &str,
    ) -> Result<Option<FamilyGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query =
            format!("SELECT {GROUP_COLUMNS} FROM family_groups WHERE principal_registration = $1");
        let group = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(principal_registration)
            .fetch_optional(executor)
            .await?;

        Ok(group)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        principal_registration: &str,
        registry: Option<&str>,
    ) -> Result<FamilyGroup, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "INSERT INTO family_groups (principal_registration, registry)
             VALUES ($1, $2)
             RETURNING {GROUP_COLUMNS}"
        );
        let group = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(principal_registration)
            .bind(registry)
            .fetch_one(executor)
            .await?;

        Ok(group)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM family_groups WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_principal<'e, E>(
        &self,
        executor: E,
        id: i64,
        principal_registration: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE family_groups SET principal_registration = $2 WHERE id = $1")
            .bind(id)
            .bind(principal_registration)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_registry<'e, E>(
        &self,
        executor: E,
        id: i64,
        registry: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE family_groups SET registry = $2 WHERE id = $1")
            .bind(id)
            .bind(registry)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn update_cultivations<'e, E>(
        &self,
        executor: E,
        id: i64,
        cultivation: &Cultivation,
    ) -> Result<FamilyGroup, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "UPDATE family_groups
             SET canola_area = $2, wheat_area = $3, corn_silage_area = $4,
                 grain_corn_area = $5, bean_area = $6, soybean_area = $7,
                 canola_area_participation = $8, wheat_area_participation = $9,
                 corn_silage_area_participation = $10, grain_corn_area_participation = $11,
                 bean_area_participation = $12, soybean_area_participation = $13
             WHERE id = $1
             RETURNING {GROUP_COLUMNS}"
        );
        let group = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(id)
            .bind(cultivation.canola_area)
            .bind(cultivation.wheat_area)
            .bind(cultivation.corn_silage_area)
            .bind(cultivation.grain_corn_area)
            .bind(cultivation.bean_area)
            .bind(cultivation.soybean_area)
            .bind(cultivation.canola_area_participation)
            .bind(cultivation.wheat_area_participation)
            .bind(cultivation.corn_silage_area_participation)
            .bind(cultivation.grain_corn_area_participation)
            .bind(cultivation.bean_area_participation)
            .bind(cultivation.soybean_area_participation)
            .fetch_one(executor)
            .await?;

        Ok(group)
    }

    /// Soma as áreas de cultivo informadas às já registradas. Usado pela
    /// carga, que distribui as áreas linha a linha.
    pub async fn add_cultivations<'e, E>(
        &self,
        executor: E,
        id: i64,
        cultivation: &Cultivation,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE family_groups
             SET canola_area = canola_area + $2,
                 wheat_area = wheat_area + $3,
                 corn_silage_area = corn_silage_area + $4,
                 grain_corn_area = grain_corn_area + $5,
                 bean_area = bean_area + $6,
                 soybean_area = soybean_area + $7
             WHERE id = $1",
        )
        .bind(id)
        .bind(cultivation.canola_area)
        .bind(cultivation.wheat_area)
        .bind(cultivation.corn_silage_area)
        .bind(cultivation.grain_corn_area)
        .bind(cultivation.bean_area)
        .bind(cultivation.soybean_area)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_detail_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<FamilyGroupDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE fg.id = $1");
        let row = sqlx::query_as::<_, FamilyGroupDetailRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row)
    }

    pub async fn find_detail<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FamilyGroupDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = match search {
            Some(search) => {
                let query = format!(
                    "{DETAIL_SELECT} WHERE {SEARCH_WHERE} ORDER BY p.name LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, FamilyGroupDetailRow>(&query)
                    .bind(like_pattern(search))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await?
            }
            None => {
                let query = format!("{DETAIL_SELECT} ORDER BY p.name LIMIT $1 OFFSET $2");
                sqlx::query_as::<_, FamilyGroupDetailRow>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn count<'e, E>(&self, executor: E, search: Option<&str>) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = match search {
            Some(search) => {
                let query = format!(
                    "SELECT COUNT(*) FROM family_groups fg
                     JOIN farmers p ON p.registration_number = fg.principal_registration
                     WHERE {SEARCH_WHERE}"
                );
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(like_pattern(search))
                    .fetch_one(executor)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM family_groups")
                    .fetch_one(executor)
                    .await?
            }
        };

        Ok(total)
    }

    /// Grupos cujo principal é atendido pelo técnico informado.
    pub async fn find_by_technician<'e, E>(
        &self,
        executor: E,
        technician_id: i64,
    ) -> Result<Vec<FamilyGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM family_groups fg2 WHERE fg2.principal_registration IN (
                 SELECT registration_number FROM farmers WHERE technician_id = $1)"
        );
        let groups = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(technician_id)
            .fetch_all(executor)
            .await?;

        Ok(groups)
    }

    /// Grupos cujo principal pertence à carteira informada.
    pub async fn find_by_branch<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
    ) -> Result<Vec<FamilyGroup>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM family_groups fg2 WHERE fg2.principal_registration IN (
                 SELECT registration_number FROM farmers WHERE branch_id = $1)"
        );
        let groups = sqlx::query_as::<_, FamilyGroup>(&query)
            .bind(branch_id)
            .fetch_all(executor)
            .await?;

        Ok(groups)
    }

    /// Produtores que arrendam bens para membros deste grupo.
    pub async fn lessors_of_group<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<Vec<FarmerSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lessors = sqlx::query_as::<_, FarmerSummary>(
            "SELECT DISTINCT o.registration_number, o.name, o.status,
                    o.owned_area, o.leased_area
             FROM assets a
             JOIN farmers o ON o.registration_number = a.owner_registration
             JOIN farmers m ON m.registration_number = a.leased_to
             WHERE m.family_group_id = $1
             ORDER BY o.name",
        )
        .bind(family_group_id)
        .fetch_all(executor)
        .await?;

        Ok(lessors)
    }

    pub async fn free_area_of_group<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<f64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let free_area = sqlx::query_scalar::<_, f64>(FREE_AREA_SELECT)
            .bind(family_group_id)
            .fetch_one(executor)
            .await?;

        Ok(free_area)
    }

    /// Área livre de vários grupos de uma só vez. Grupos sem bens não
    /// aparecem no resultado.
    pub async fn free_area_of_groups<'e, E>(
        &self,
        executor: E,
        family_group_ids: &[i64],
    ) -> Result<Vec<FreeAreaRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, FreeAreaRow>(
            "SELECT x.gid AS family_group_id, COALESCE(SUM(x.amount), 0) AS free_area
             FROM (
                 SELECT l.family_group_id AS gid, a.amount
                 FROM assets a
                 JOIN farmers l ON l.registration_number = a.leased_to
                 UNION ALL
                 SELECT o.family_group_id AS gid, a.amount
                 FROM assets a
                 JOIN farmers o ON o.registration_number = a.owner_registration
                 WHERE a.leased_to IS NULL
             ) x
             WHERE x.gid = ANY($1)
             GROUP BY x.gid",
        )
        .bind(family_group_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
