// src/db/farmer_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::like_pattern,
    models::farmer::{Farmer, FarmerDetailRow, FarmerSummary},
};

// Colunas do produtor com os relacionamentos resolvidos.
const DETAIL_SELECT: &str = "SELECT f.registration_number, f.name, f.status, f.blocked,
        f.owned_area, f.leased_area,
        f.family_group_id, fg.registry AS family_group_registry,
        fg.principal_registration, p.name AS principal_name,
        f.branch_id, b.name AS branch_name,
        f.technician_id, u.username AS technician_username, u.name AS technician_name,
        f.type_id, t.description AS type_description
 FROM farmers f
 LEFT JOIN family_groups fg ON fg.id = f.family_group_id
 LEFT JOIN farmers p ON p.registration_number = fg.principal_registration
 LEFT JOIN branches b ON b.id = f.branch_id
 LEFT JOIN users u ON u.id = f.technician_id
 LEFT JOIN farmer_types t ON t.id = f.type_id";

// Busca livre: nome do produtor, matrícula ou nome do principal do grupo.
const SEARCH_WHERE: &str =
    "(f.name ILIKE $1 OR f.registration_number ILIKE $1 OR p.name ILIKE $1)";

// Disponível: ativo, não bloqueado, sem grupo ou em grupo de um membro só.
const AVAILABLE_WHERE: &str = "f.status = 'ACTIVE' AND NOT f.blocked
     AND (f.family_group_id IS NULL OR f.family_group_id IN (
          SELECT m.family_group_id FROM farmers m
          WHERE m.family_group_id IS NOT NULL
          GROUP BY m.family_group_id
          HAVING COUNT(*) = 1))";

// Repositório dos produtores.
#[derive(Clone)]
pub struct FarmerRepository;

impl FarmerRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        registration_number: &str,
    ) -> Result<Option<Farmer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let farmer = sqlx::query_as::<_, Farmer>(
            "SELECT registration_number, name, status, blocked, owned_area, leased_area,
                    family_group_id, branch_id, technician_id, type_id
             FROM farmers WHERE registration_number = $1",
        )
        .bind(registration_number)
        .fetch_optional(executor)
        .await?;

        Ok(farmer)
    }

    pub async fn insert<'e, E>(&self, executor: E, farmer: &Farmer) -> Result<Farmer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Farmer>(
            "INSERT INTO farmers (registration_number, name, status, blocked, owned_area,
                                  leased_area, family_group_id, branch_id, technician_id, type_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING registration_number, name, status, blocked, owned_area, leased_area,
                       family_group_id, branch_id, technician_id, type_id",
        )
        .bind(&farmer.registration_number)
        .bind(&farmer.name)
        .bind(farmer.status)
        .bind(farmer.blocked)
        .bind(farmer.owned_area)
        .bind(farmer.leased_area)
        .bind(farmer.family_group_id)
        .bind(farmer.branch_id)
        .bind(farmer.technician_id)
        .bind(farmer.type_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(format!(
                        "Já existe um produtor com a matrícula '{}'.",
                        farmer.registration_number
                    ));
                }
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(&self, executor: E, farmer: &Farmer) -> Result<Farmer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let farmer = sqlx::query_as::<_, Farmer>(
            "UPDATE farmers
             SET name = $2, status = $3, blocked = $4, owned_area = $5, leased_area = $6,
                 family_group_id = $7, branch_id = $8, technician_id = $9, type_id = $10
             WHERE registration_number = $1
             RETURNING registration_number, name, status, blocked, owned_area, leased_area,
                       family_group_id, branch_id, technician_id, type_id",
        )
        .bind(&farmer.registration_number)
        .bind(&farmer.name)
        .bind(farmer.status)
        .bind(farmer.blocked)
        .bind(farmer.owned_area)
        .bind(farmer.leased_area)
        .bind(farmer.family_group_id)
        .bind(farmer.branch_id)
        .bind(farmer.technician_id)
        .bind(farmer.type_id)
        .fetch_one(executor)
        .await?;

        Ok(farmer)
    }

    /// Muda apenas o vínculo de grupo familiar do produtor.
    pub async fn set_family_group<'e, E>(
        &self,
        executor: E,
        registration_number: &str,
        family_group_id: Option<i64>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE farmers SET family_group_id = $2 WHERE registration_number = $1")
            .bind(registration_number)
            .bind(family_group_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn members_of_group<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<Vec<Farmer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, Farmer>(
            "SELECT registration_number, name, status, blocked, owned_area, leased_area,
                    family_group_id, branch_id, technician_id, type_id
             FROM farmers WHERE family_group_id = $1 ORDER BY name",
        )
        .bind(family_group_id)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    pub async fn member_summaries_of_group<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<Vec<FarmerSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let members = sqlx::query_as::<_, FarmerSummary>(
            "SELECT registration_number, name, status, owned_area, leased_area
             FROM farmers WHERE family_group_id = $1 ORDER BY name",
        )
        .bind(family_group_id)
        .fetch_all(executor)
        .await?;

        Ok(members)
    }

    pub async fn member_count<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farmers WHERE family_group_id = $1")
                .bind(family_group_id)
                .fetch_one(executor)
                .await?;

        Ok(count)
    }

    /// Área total do grupo: soma de área própria + arrendada dos membros.
    pub async fn total_area_of_group<'e, E>(
        &self,
        executor: E,
        family_group_id: i64,
    ) -> Result<f64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(owned_area + leased_area), 0)
             FROM farmers WHERE family_group_id = $1",
        )
        .bind(family_group_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn find_detail_by_id<'e, E>(
        &self,
        executor: E,
        registration_number: &str,
    ) -> Result<Option<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE f.registration_number = $1");
        let row = sqlx::query_as::<_, FarmerDetailRow>(&query)
            .bind(registration_number)
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
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = match search {
            Some(search) => {
                let query =
                    format!("{DETAIL_SELECT} WHERE {SEARCH_WHERE} ORDER BY f.name LIMIT $2 OFFSET $3");
                sqlx::query_as::<_, FarmerDetailRow>(&query)
                    .bind(like_pattern(search))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await?
            }
            None => {
                let query = format!("{DETAIL_SELECT} ORDER BY f.name LIMIT $1 OFFSET $2");
                sqlx::query_as::<_, FarmerDetailRow>(&query)
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
                    "SELECT COUNT(*) FROM farmers f
                     LEFT JOIN family_groups fg ON fg.id = f.family_group_id
                     LEFT JOIN farmers p ON p.registration_number = fg.principal_registration
                     WHERE {SEARCH_WHERE}"
                );
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(like_pattern(search))
                    .fetch_one(executor)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farmers")
                    .fetch_one(executor)
                    .await?
            }
        };

        Ok(total)
    }

    pub async fn find_available<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = match search {
            Some(search) => {
                let query = format!(
                    "{DETAIL_SELECT} WHERE {AVAILABLE_WHERE} AND {SEARCH_WHERE}
                     ORDER BY f.name LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, FarmerDetailRow>(&query)
                    .bind(like_pattern(search))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await?
            }
            None => {
                let query = format!(
                    "{DETAIL_SELECT} WHERE {AVAILABLE_WHERE} ORDER BY f.name LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, FarmerDetailRow>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await?
            }
        };

        Ok(rows)
    }

    pub async fn count_available<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let base = format!(
            "SELECT COUNT(*) FROM farmers f
             LEFT JOIN family_groups fg ON fg.id = f.family_group_id
             LEFT JOIN farmers p ON p.registration_number = fg.principal_registration
             WHERE {AVAILABLE_WHERE}"
        );

        let total = match search {
            Some(search) => {
                let query = format!("{base} AND {SEARCH_WHERE}");
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(like_pattern(search))
                    .fetch_one(executor)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(&base)
                    .fetch_one(executor)
                    .await?
            }
        };

        Ok(total)
    }

    pub async fn find_detail_by_technician<'e, E>(
        &self,
        executor: E,
        technician_id: i64,
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE f.technician_id = $1 ORDER BY f.name");
        let rows = sqlx::query_as::<_, FarmerDetailRow>(&query)
            .bind(technician_id)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    /// Produtores ainda sem técnico responsável.
    pub async fn find_detail_without_technician<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE f.technician_id IS NULL ORDER BY f.name");
        let rows = sqlx::query_as::<_, FarmerDetailRow>(&query)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn find_detail_by_type<'e, E>(
        &self,
        executor: E,
        type_id: i32,
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE f.type_id = $1 ORDER BY f.name");
        let rows = sqlx::query_as::<_, FarmerDetailRow>(&query)
            .bind(type_id)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    pub async fn find_detail_by_branch<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
    ) -> Result<Vec<FarmerDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = format!("{DETAIL_SELECT} WHERE f.branch_id = $1 ORDER BY f.name");
        let rows = sqlx::query_as::<_, FarmerDetailRow>(&query)
            .bind(branch_id)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }
}
