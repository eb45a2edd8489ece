// src/services/asset_service.rs

use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{AssetRepository, FarmerRepository, LookupRepository},
    models::asset::{
        Asset, AssetCategory, AssetPayload, AssetResponse, AssetType, LeasePayload, UnleasePayload,
    },
};

#[derive(Clone)]
pub struct AssetService {
    pool: PgPool,
    assets: AssetRepository,
    farmers: FarmerRepository,
    lookups: LookupRepository,
}

impl AssetService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            assets: AssetRepository::new(),
            farmers: FarmerRepository::new(),
            lookups: LookupRepository::new(),
        }
    }

    pub async fn create(&self, payload: AssetPayload) -> Result<AssetResponse, AppError> {
        payload.validate()?;
        check_cultivable_area(&payload)?;

        let mut tx = self.pool.begin().await?;

        let owner = payload.owner_registration_number.trim().to_string();
        self.ensure_farmer_exists(&mut tx, &owner).await?;
        self.check_lookups(&mut tx, &payload).await?;

        let leased_to = self
            .check_lessee(&mut tx, &owner, payload.leased_to_registration_number.as_deref())
            .await?;

        let id_sap = self.assets.next_id_sap(&mut *tx, &owner).await?;
        let asset = Asset {
            owner_registration: owner,
            id_sap,
            description: payload.description.trim().to_string(),
            address: payload.address.trim().to_string(),
            amount: payload.amount,
            cultivable_area: payload.cultivable_area,
            asset_type_id: payload.asset_type_id,
            asset_category_id: payload.asset_category_id,
            leased_to,
        };
        let asset = self.assets.insert(&mut *tx, &asset).await?;

        tx.commit().await?;

        self.find_by_id(&asset.external_id()).await
    }

    /// Atualiza um bem. Troca de dono realoca o bem sob o novo dono, com
    /// um novo id sequencial.
    pub async fn update(
        &self,
        asset_id: &str,
        payload: AssetPayload,
    ) -> Result<AssetResponse, AppError> {
        payload.validate()?;
        check_cultivable_area(&payload)?;

        let (owner, id_sap) = parse_asset_id(asset_id)?;

        let mut tx = self.pool.begin().await?;

        let current = self
            .assets
            .find_by_id(&mut *tx, &owner, id_sap)
            .await?
            .ok_or_else(|| asset_not_found(asset_id))?;

        self.check_lookups(&mut tx, &payload).await?;

        let new_owner = payload.owner_registration_number.trim().to_string();
        let leased_to = self
            .check_lessee(&mut tx, &new_owner, payload.leased_to_registration_number.as_deref())
            .await?;

        let asset = if new_owner != current.owner_registration {
            self.ensure_farmer_exists(&mut tx, &new_owner).await?;

            self.assets
                .delete(&mut *tx, &current.owner_registration, current.id_sap)
                .await?;

            let id_sap = self.assets.next_id_sap(&mut *tx, &new_owner).await?;
            let asset = Asset {
                owner_registration: new_owner,
                id_sap,
                description: payload.description.trim().to_string(),
                address: payload.address.trim().to_string(),
                amount: payload.amount,
                cultivable_area: payload.cultivable_area,
                asset_type_id: payload.asset_type_id,
                asset_category_id: payload.asset_category_id,
                leased_to,
            };
            self.assets.insert(&mut *tx, &asset).await?
        } else {
            let asset = Asset {
                owner_registration: current.owner_registration,
                id_sap: current.id_sap,
                description: payload.description.trim().to_string(),
                address: payload.address.trim().to_string(),
                amount: payload.amount,
                cultivable_area: payload.cultivable_area,
                asset_type_id: payload.asset_type_id,
                asset_category_id: payload.asset_category_id,
                leased_to,
            };
            self.assets.update(&mut *tx, &asset).await?
        };

        tx.commit().await?;

        self.find_by_id(&asset.external_id()).await
    }

    pub async fn delete(&self, asset_id: &str) -> Result<(), AppError> {
        let (owner, id_sap) = parse_asset_id(asset_id)?;

        let deleted = self.assets.delete(&self.pool, &owner, id_sap).await?;
        if !deleted {
            return Err(asset_not_found(asset_id));
        }

        Ok(())
    }

    pub async fn find_by_id(&self, asset_id: &str) -> Result<AssetResponse, AppError> {
        let (owner, id_sap) = parse_asset_id(asset_id)?;

        let row = self
            .assets
            .find_detail_by_id(&self.pool, &owner, id_sap)
            .await?
            .ok_or_else(|| asset_not_found(asset_id))?;

        Ok(row.into())
    }

    pub async fn find_by_owner(
        &self,
        owner_registration: &str,
    ) -> Result<Vec<AssetResponse>, AppError> {
        let mut tx = self.pool.begin().await?;
        self.ensure_farmer_exists(&mut tx, owner_registration).await?;
        let rows = self
            .assets
            .find_detail_by_owner(&mut *tx, owner_registration)
            .await?;
        tx.commit().await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Bens do dono que ainda podem ser arrendados.
    pub async fn find_available_by_owner(
        &self,
        owner_registration: &str,
    ) -> Result<Vec<AssetResponse>, AppError> {
        let mut tx = self.pool.begin().await?;
        self.ensure_farmer_exists(&mut tx, owner_registration).await?;
        let rows = self
            .assets
            .find_available_by_owner(&mut *tx, owner_registration)
            .await?;
        tx.commit().await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_lessee(
        &self,
        lessee_registration: &str,
    ) -> Result<Vec<AssetResponse>, AppError> {
        let mut tx = self.pool.begin().await?;
        self.ensure_farmer_exists(&mut tx, lessee_registration).await?;
        let rows = self
            .assets
            .find_detail_by_lessee(&mut *tx, lessee_registration)
            .await?;
        tx.commit().await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn lease(&self, payload: LeasePayload) -> Result<AssetResponse, AppError> {
        let (owner, id_sap) = parse_asset_id(&payload.asset_id)?;

        let mut tx = self.pool.begin().await?;

        let asset = self
            .assets
            .find_by_id(&mut *tx, &owner, id_sap)
            .await?
            .ok_or_else(|| asset_not_found(&payload.asset_id))?;

        let lessee = payload.lessee.trim();
        check_lease(&asset, lessee)?;
        self.ensure_farmer_exists(&mut tx, lessee).await?;

        self.assets
            .set_leased_to(&mut *tx, &owner, id_sap, Some(lessee))
            .await?;

        tx.commit().await?;

        self.find_by_id(&payload.asset_id).await
    }

    pub async fn unlease(&self, payload: UnleasePayload) -> Result<AssetResponse, AppError> {
        let (owner, id_sap) = parse_asset_id(&payload.asset_id)?;

        let mut tx = self.pool.begin().await?;

        let asset = self
            .assets
            .find_by_id(&mut *tx, &owner, id_sap)
            .await?
            .ok_or_else(|| asset_not_found(&payload.asset_id))?;

        check_unlease(&asset)?;

        self.assets
            .set_leased_to(&mut *tx, &owner, id_sap, None)
            .await?;

        tx.commit().await?;

        self.find_by_id(&payload.asset_id).await
    }

    pub async fn asset_types(&self) -> Result<Vec<AssetType>, AppError> {
        self.lookups.all_asset_types(&self.pool).await
    }

    pub async fn asset_categories(&self) -> Result<Vec<AssetCategory>, AppError> {
        self.lookups.all_asset_categories(&self.pool).await
    }

    async fn ensure_farmer_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        registration_number: &str,
    ) -> Result<(), AppError> {
        self.farmers
            .find_by_id(&mut **tx, registration_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Produtor '{}' não encontrado.",
                    registration_number
                ))
            })?;

        Ok(())
    }

    async fn check_lookups(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payload: &AssetPayload,
    ) -> Result<(), AppError> {
        if let Some(type_id) = payload.asset_type_id {
            self.lookups
                .find_asset_type(&mut **tx, type_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Tipo de bem '{}' não encontrado.", type_id))
                })?;
        }

        if let Some(category_id) = payload.asset_category_id {
            self.lookups
                .find_asset_category(&mut **tx, category_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Categoria de bem '{}' não encontrada.",
                        category_id
                    ))
                })?;
        }

        Ok(())
    }

    async fn check_lessee(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: &str,
        lessee: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        let Some(lessee) = lessee.map(str::trim).filter(|l| !l.is_empty()) else {
            return Ok(None);
        };

        if lessee == owner {
            return Err(AppError::bad_request(
                "Um produtor não pode arrendar um bem para si mesmo.",
            ));
        }

        self.ensure_farmer_exists(tx, lessee).await?;
        Ok(Some(lessee.to_string()))
    }
}

fn check_cultivable_area(payload: &AssetPayload) -> Result<(), AppError> {
    if payload.cultivable_area > payload.amount {
        return Err(AppError::bad_request(
            "A área cultivável não pode exceder a área total do bem.",
        ));
    }
    Ok(())
}

fn asset_not_found(asset_id: &str) -> AppError {
    AppError::not_found(format!("Bem '{}' não encontrado.", asset_id))
}

/// Separa o identificador externo "matrícula-idSap". A matrícula pode
/// conter hífens; o corte é no último.
pub fn parse_asset_id(asset_id: &str) -> Result<(String, i64), AppError> {
    let (owner, id_sap) = asset_id
        .rsplit_once('-')
        .ok_or_else(|| invalid_asset_id(asset_id))?;

    if owner.is_empty() {
        return Err(invalid_asset_id(asset_id));
    }

    let id_sap: i64 = id_sap
        .parse()
        .map_err(|_| invalid_asset_id(asset_id))?;

    Ok((owner.to_string(), id_sap))
}

fn invalid_asset_id(asset_id: &str) -> AppError {
    AppError::bad_request(format!("Identificador de bem inválido: '{}'.", asset_id))
}

/// Pré-condições do arrendamento: bem livre e arrendatário diferente do dono.
fn check_lease(asset: &Asset, lessee: &str) -> Result<(), AppError> {
    if asset.leased_to.is_some() {
        return Err(AppError::bad_request("O bem já está arrendado."));
    }
    if lessee == asset.owner_registration {
        return Err(AppError::bad_request(
            "Um produtor não pode arrendar um bem para si mesmo.",
        ));
    }
    Ok(())
}

fn check_unlease(asset: &Asset) -> Result<(), AppError> {
    if asset.leased_to.is_none() {
        return Err(AppError::bad_request("O bem não está arrendado."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_simples_e_separado() {
        assert_eq!(parse_asset_id("12345-7").unwrap(), ("12345".to_string(), 7));
    }

    #[test]
    fn matricula_com_hifen_corta_no_ultimo() {
        assert_eq!(parse_asset_id("-1-3").unwrap(), ("-1".to_string(), 3));
    }

    #[test]
    fn id_malformado_e_rejeitado() {
        assert!(parse_asset_id("12345").is_err());
        assert!(parse_asset_id("12345-").is_err());
        assert!(parse_asset_id("-7").is_err());
        assert!(parse_asset_id("12345-abc").is_err());
    }

    fn bem(leased_to: Option<&str>) -> Asset {
        Asset {
            owner_registration: "100".to_string(),
            id_sap: 1,
            description: "Terras".to_string(),
            address: String::new(),
            amount: 10.0,
            cultivable_area: 8.0,
            asset_type_id: None,
            asset_category_id: None,
            leased_to: leased_to.map(str::to_string),
        }
    }

    #[test]
    fn arrendamento_duplo_e_rejeitado() {
        assert!(check_lease(&bem(Some("200")), "300").is_err());
        assert!(check_lease(&bem(None), "300").is_ok());
    }

    #[test]
    fn auto_arrendamento_e_rejeitado() {
        assert!(check_lease(&bem(None), "100").is_err());
    }

    #[test]
    fn desarrendar_bem_livre_e_rejeitado() {
        assert!(check_unlease(&bem(None)).is_err());
        assert!(check_unlease(&bem(Some("200"))).is_ok());
    }

    #[test]
    fn area_cultivavel_acima_do_valor_e_rejeitada() {
        let payload = AssetPayload {
            description: "Terras".to_string(),
            address: String::new(),
            amount: 10.0,
            cultivable_area: 12.0,
            owner_registration_number: "100".to_string(),
            leased_to_registration_number: None,
            asset_category_id: None,
            asset_type_id: None,
        };
        assert!(check_cultivable_area(&payload).is_err());

        let payload = AssetPayload {
            cultivable_area: 10.0,
            ..payload
        };
        assert!(check_cultivable_area(&payload).is_ok());
    }
}
