// src/services/farmer_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{
        AssetRepository, BranchRepository, FamilyGroupRepository, FarmerRepository,
        LookupRepository, UserRepository,
    },
    models::{
        asset::AssetResponse,
        farmer::{Farmer, FarmerDetailRow, FarmerPayload, FarmerResponse},
        page::{Page, PageParams},
    },
};

#[derive(Clone)]
pub struct FarmerService {
    pool: PgPool,
    farmers: FarmerRepository,
    groups: FamilyGroupRepository,
    assets: AssetRepository,
    branches: BranchRepository,
    users: UserRepository,
    lookups: LookupRepository,
}

impl FarmerService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            farmers: FarmerRepository::new(),
            groups: FamilyGroupRepository::new(),
            assets: AssetRepository::new(),
            branches: BranchRepository::new(),
            users: UserRepository::new(),
            lookups: LookupRepository::new(),
        }
    }

    pub async fn create(&self, payload: FarmerPayload) -> Result<FarmerResponse, AppError> {
        payload.validate()?;
        self.check_references(&payload).await?;

        let farmer = Farmer {
            registration_number: payload.registration_number.trim().to_string(),
            name: payload.name.trim().to_string(),
            status: payload.status,
            blocked: payload.blocked,
            owned_area: payload.owned_area,
            leased_area: payload.leased_area,
            family_group_id: payload.family_group_id,
            branch_id: payload.branch_id,
            technician_id: payload.technician_id,
            type_id: payload.type_id,
        };

        let farmer = self.farmers.insert(&self.pool, &farmer).await?;
        self.find_by_id(&farmer.registration_number).await
    }

    pub async fn update(
        &self,
        registration_number: &str,
        payload: FarmerPayload,
    ) -> Result<FarmerResponse, AppError> {
        payload.validate()?;

        let current = self
            .farmers
            .find_by_id(&self.pool, registration_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Produtor '{}' não encontrado.",
                    registration_number
                ))
            })?;

        self.check_references(&payload).await?;

        let farmer = Farmer {
            registration_number: current.registration_number,
            name: payload.name.trim().to_string(),
            status: payload.status,
            blocked: payload.blocked,
            owned_area: payload.owned_area,
            leased_area: payload.leased_area,
            family_group_id: payload.family_group_id.or(current.family_group_id),
            branch_id: payload.branch_id,
            technician_id: payload.technician_id,
            type_id: payload.type_id,
        };

        let farmer = self.farmers.update(&self.pool, &farmer).await?;
        self.find_by_id(&farmer.registration_number).await
    }

    pub async fn find_by_id(&self, registration_number: &str) -> Result<FarmerResponse, AppError> {
        let row = self
            .farmers
            .find_detail_by_id(&self.pool, registration_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Produtor '{}' não encontrado.",
                    registration_number
                ))
            })?;

        let mut responses = self.assemble_responses(vec![row]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("resposta vazia")))
    }

    pub async fn find_all(&self, params: &PageParams) -> Result<Page<FarmerResponse>, AppError> {
        let search = params.search_term();
        let rows = self
            .farmers
            .find_detail(&self.pool, search, params.limit(), params.offset())
            .await?;
        let total = self.farmers.count(&self.pool, search).await?;

        let content = self.assemble_responses(rows).await?;
        Ok(Page::new(content, params, total))
    }

    /// Produtores aptos a entrar em um grupo familiar.
    pub async fn find_available(
        &self,
        params: &PageParams,
    ) -> Result<Page<FarmerResponse>, AppError> {
        let search = params.search_term();
        let rows = self
            .farmers
            .find_available(&self.pool, search, params.limit(), params.offset())
            .await?;
        let total = self.farmers.count_available(&self.pool, search).await?;

        let content = self.assemble_responses(rows).await?;
        Ok(Page::new(content, params, total))
    }

    pub async fn find_by_technician(
        &self,
        technician_id: i64,
    ) -> Result<Vec<FarmerResponse>, AppError> {
        self.users
            .find_by_id(&self.pool, technician_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Técnico '{}' não encontrado.", technician_id))
            })?;

        let rows = self
            .farmers
            .find_detail_by_technician(&self.pool, technician_id)
            .await?;
        self.assemble_responses(rows).await
    }

    pub async fn find_without_technician(&self) -> Result<Vec<FarmerResponse>, AppError> {
        let rows = self
            .farmers
            .find_detail_without_technician(&self.pool)
            .await?;
        self.assemble_responses(rows).await
    }

    pub async fn find_by_type(&self, type_id: i32) -> Result<Vec<FarmerResponse>, AppError> {
        self.lookups
            .find_farmer_type(&self.pool, type_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Tipo de produtor '{}' não encontrado.", type_id))
            })?;

        let rows = self.farmers.find_detail_by_type(&self.pool, type_id).await?;
        self.assemble_responses(rows).await
    }

    pub async fn find_by_branch(&self, branch_id: i64) -> Result<Vec<FarmerResponse>, AppError> {
        self.branches
            .find_by_id(&self.pool, branch_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Carteira '{}' não encontrada.", branch_id))
            })?;

        let rows = self
            .farmers
            .find_detail_by_branch(&self.pool, branch_id)
            .await?;
        self.assemble_responses(rows).await
    }

    /// Monta as respostas completas, buscando os bens de todos os
    /// produtores da página em duas queries.
    async fn assemble_responses(
        &self,
        rows: Vec<FarmerDetailRow>,
    ) -> Result<Vec<FarmerResponse>, AppError> {
        let registrations: Vec<String> = rows
            .iter()
            .map(|r| r.registration_number.clone())
            .collect();

        let mut owned: HashMap<String, Vec<AssetResponse>> = HashMap::new();
        for asset in self
            .assets
            .find_detail_by_owners(&self.pool, &registrations)
            .await?
        {
            owned
                .entry(asset.owner_registration.clone())
                .or_default()
                .push(asset.into());
        }

        let mut leased: HashMap<String, Vec<AssetResponse>> = HashMap::new();
        for asset in self
            .assets
            .find_detail_by_lessees(&self.pool, &registrations)
            .await?
        {
            if let Some(lessee) = asset.leased_to.clone() {
                leased.entry(lessee).or_default().push(asset.into());
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let owned_assets = owned.remove(&row.registration_number).unwrap_or_default();
                let leased_assets = leased.remove(&row.registration_number).unwrap_or_default();
                FarmerResponse::from_row(row, owned_assets, leased_assets)
            })
            .collect())
    }

    pub async fn farmer_types(&self) -> Result<Vec<crate::models::farmer::FarmerType>, AppError> {
        self.lookups.all_farmer_types(&self.pool).await
    }

    async fn check_references(&self, payload: &FarmerPayload) -> Result<(), AppError> {
        if let Some(branch_id) = payload.branch_id {
            self.branches
                .find_by_id(&self.pool, branch_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Carteira '{}' não encontrada.", branch_id))
                })?;
        }

        if let Some(technician_id) = payload.technician_id {
            self.users
                .find_by_id(&self.pool, technician_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Técnico '{}' não encontrado.", technician_id))
                })?;
        }

        if let Some(type_id) = payload.type_id {
            self.lookups
                .find_farmer_type(&self.pool, type_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Tipo de produtor '{}' não encontrado.", type_id))
                })?;
        }

        if let Some(family_group_id) = payload.family_group_id {
            self.groups
                .find_by_id(&self.pool, family_group_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Grupo familiar '{}' não encontrado.",
                        family_group_id
                    ))
                })?;
        }

        Ok(())
    }
}
