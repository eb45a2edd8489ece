// src/services/family_group_service.rs

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{FamilyGroupRepository, FarmerRepository},
    models::{
        family_group::{
            Cultivation, CultivationWithFreeArea, FamilyGroup, FamilyGroupMembersResponse,
            FamilyGroupPayload, FamilyGroupResponse,
        },
        farmer::{Farmer, FarmerSummary},
        page::{Page, PageParams},
    },
};

#[derive(Clone)]
pub struct FamilyGroupService {
    pool: PgPool,
    groups: FamilyGroupRepository,
    farmers: FarmerRepository,
}

impl FamilyGroupService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            groups: FamilyGroupRepository::new(),
            farmers: FarmerRepository::new(),
        }
    }

    /// Cria um grupo com o principal e os membros informados. Produtores
    /// presos em grupos "solo" são liberados e o grupo antigo é apagado.
    pub async fn create(
        &self,
        payload: FamilyGroupPayload,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        payload.validate()?;

        let mut tx = self.pool.begin().await?;

        let principal = self
            .load_farmer(&mut tx, &payload.principal_id)
            .await?;
        self.ensure_available(&mut tx, &principal).await?;
        self.release_from_current_group(&mut tx, &principal).await?;
        self.delete_stale_lead_group(&mut tx, &principal.registration_number)
            .await?;

        let group = self
            .groups
            .create(&mut *tx, &principal.registration_number, payload.registry.as_deref())
            .await?;
        self.farmers
            .set_family_group(&mut *tx, &principal.registration_number, Some(group.id))
            .await?;

        for member_id in &payload.members_id {
            if member_id == &principal.registration_number {
                continue;
            }
            let member = self.load_farmer(&mut tx, member_id).await?;
            self.ensure_available(&mut tx, &member).await?;
            self.release_from_current_group(&mut tx, &member).await?;
            self.farmers
                .set_family_group(&mut *tx, &member.registration_number, Some(group.id))
                .await?;
        }

        tx.commit().await?;

        self.find_by_id(group.id).await
    }

    pub async fn add_member(
        &self,
        group_id: i64,
        registration_number: &str,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        self.load_group(&mut tx, group_id).await?;
        let farmer = self.load_farmer(&mut tx, registration_number).await?;

        if farmer.family_group_id == Some(group_id) {
            return Err(AppError::bad_request(format!(
                "O produtor '{}' já pertence a este grupo familiar.",
                registration_number
            )));
        }

        self.ensure_available(&mut tx, &farmer).await?;
        self.release_from_current_group(&mut tx, &farmer).await?;
        self.farmers
            .set_family_group(&mut *tx, &farmer.registration_number, Some(group_id))
            .await?;

        tx.commit().await?;

        self.find_by_id(group_id).await
    }

    /// Remove um membro e o devolve a um grupo próprio, reaproveitando o
    /// grupo do qual ele já era principal quando existir.
    pub async fn remove_member(
        &self,
        group_id: i64,
        registration_number: &str,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let group = self.load_group(&mut tx, group_id).await?;
        let farmer = self.load_farmer(&mut tx, registration_number).await?;

        check_removal(&group, &farmer)?;

        let own_group = self
            .groups
            .find_by_principal(&mut *tx, &farmer.registration_number)
            .await?;

        let destination = match own_group {
            Some(own) => own.id,
            None => {
                self.groups
                    .create(&mut *tx, &farmer.registration_number, None)
                    .await?
                    .id
            }
        };

        self.farmers
            .set_family_group(&mut *tx, &farmer.registration_number, Some(destination))
            .await?;

        tx.commit().await?;

        self.find_by_id(group_id).await
    }

    /// Promove um membro do grupo a principal. O principal anterior
    /// continua como membro.
    pub async fn change_principal(
        &self,
        group_id: i64,
        registration_number: &str,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let group = self.load_group(&mut tx, group_id).await?;
        let candidate = self.load_farmer(&mut tx, registration_number).await?;

        if group.principal_registration == candidate.registration_number {
            return Err(AppError::bad_request(format!(
                "O produtor '{}' já é o principal do grupo.",
                registration_number
            )));
        }

        if candidate.family_group_id != Some(group_id) {
            return Err(AppError::bad_request(format!(
                "O produtor '{}' não pertence a este grupo familiar.",
                registration_number
            )));
        }

        // O candidato pode ainda liderar outro grupo (do qual não é
        // membro); esse grupo é desfeito antes da promoção.
        self.delete_stale_lead_group(&mut tx, &candidate.registration_number)
            .await?;

        self.groups
            .set_principal(&mut *tx, group_id, &candidate.registration_number)
            .await?;

        tx.commit().await?;

        self.find_by_id(group_id).await
    }

    pub async fn update_registry(
        &self,
        group_id: i64,
        registry: Option<&str>,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        let mut tx = self.pool.begin().await?;
        self.load_group(&mut tx, group_id).await?;
        self.groups.set_registry(&mut *tx, group_id, registry).await?;
        tx.commit().await?;

        self.find_by_id(group_id).await
    }

    pub async fn update_cultivation(
        &self,
        group_id: i64,
        cultivation: Cultivation,
    ) -> Result<CultivationWithFreeArea, AppError> {
        let mut tx = self.pool.begin().await?;

        self.load_group(&mut tx, group_id).await?;
        let total_area = self.farmers.total_area_of_group(&mut *tx, group_id).await?;
        validate_cultivation(&cultivation, total_area)?;

        let group = self
            .groups
            .update_cultivations(&mut *tx, group_id, &cultivation)
            .await?;

        tx.commit().await?;

        let free_area = self.groups.free_area_of_group(&self.pool, group_id).await?;
        Ok(CultivationWithFreeArea {
            family_group_id: group.id,
            free_area,
            cultivation: (&group).into(),
        })
    }

    pub async fn cultivation(&self, group_id: i64) -> Result<CultivationWithFreeArea, AppError> {
        let group = self
            .groups
            .find_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;
        let free_area = self.groups.free_area_of_group(&self.pool, group_id).await?;

        Ok(CultivationWithFreeArea {
            family_group_id: group.id,
            free_area,
            cultivation: (&group).into(),
        })
    }

    pub async fn find_by_id(&self, group_id: i64) -> Result<FamilyGroupMembersResponse, AppError> {
        let row = self
            .groups
            .find_detail_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        let members = self
            .farmers
            .member_summaries_of_group(&self.pool, group_id)
            .await?;

        let response = FamilyGroupResponse::from(row);
        Ok(FamilyGroupMembersResponse {
            id: response.id,
            principal: response.principal,
            members,
            registry: response.registry,
        })
    }

    pub async fn find_all(
        &self,
        params: &PageParams,
    ) -> Result<Page<FamilyGroupResponse>, AppError> {
        let search = params.search_term();
        let rows = self
            .groups
            .find_detail(&self.pool, search, params.limit(), params.offset())
            .await?;
        let total = self.groups.count(&self.pool, search).await?;

        let content = rows.into_iter().map(FamilyGroupResponse::from).collect();
        Ok(Page::new(content, params, total))
    }

    /// Grupo ao qual um produtor pertence.
    pub async fn group_of_member(
        &self,
        registration_number: &str,
    ) -> Result<FamilyGroupMembersResponse, AppError> {
        let farmer = self
            .farmers
            .find_by_id(&self.pool, registration_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Produtor '{}' não encontrado.",
                    registration_number
                ))
            })?;

        let group_id = farmer.family_group_id.ok_or_else(|| {
            AppError::not_found(format!(
                "O produtor '{}' não pertence a nenhum grupo familiar.",
                registration_number
            ))
        })?;

        self.find_by_id(group_id).await
    }

    /// Área total do grupo: soma de área própria + arrendada dos membros.
    pub async fn total_area(&self, group_id: i64) -> Result<f64, AppError> {
        self.groups
            .find_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        self.farmers.total_area_of_group(&self.pool, group_id).await
    }

    pub async fn members(&self, group_id: i64) -> Result<Vec<FarmerSummary>, AppError> {
        self.groups
            .find_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        self.farmers
            .member_summaries_of_group(&self.pool, group_id)
            .await
    }

    pub async fn lessors(&self, group_id: i64) -> Result<Vec<FarmerSummary>, AppError> {
        self.groups
            .find_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        self.groups.lessors_of_group(&self.pool, group_id).await
    }

    pub async fn free_area(&self, group_id: i64) -> Result<f64, AppError> {
        self.groups
            .find_by_id(&self.pool, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))?;

        self.groups.free_area_of_group(&self.pool, group_id).await
    }

    /// Relatório de cultivo + área livre dos grupos atendidos pelo técnico.
    pub async fn cultivations_by_technician(
        &self,
        technician_id: i64,
    ) -> Result<Vec<CultivationWithFreeArea>, AppError> {
        let groups = self
            .groups
            .find_by_technician(&self.pool, technician_id)
            .await?;
        self.with_free_areas(groups).await
    }

    pub async fn cultivations_by_branch(
        &self,
        branch_id: i64,
    ) -> Result<Vec<CultivationWithFreeArea>, AppError> {
        let groups = self.groups.find_by_branch(&self.pool, branch_id).await?;
        self.with_free_areas(groups).await
    }

    async fn with_free_areas(
        &self,
        groups: Vec<FamilyGroup>,
    ) -> Result<Vec<CultivationWithFreeArea>, AppError> {
        let ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
        let free_areas: HashMap<i64, f64> = self
            .groups
            .free_area_of_groups(&self.pool, &ids)
            .await?
            .into_iter()
            .map(|row| (row.family_group_id, row.free_area))
            .collect();

        Ok(groups
            .into_iter()
            .map(|group| CultivationWithFreeArea {
                family_group_id: group.id,
                free_area: free_areas.get(&group.id).copied().unwrap_or(0.0),
                cultivation: (&group).into(),
            })
            .collect())
    }

    async fn load_group(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        group_id: i64,
    ) -> Result<FamilyGroup, AppError> {
        self.groups
            .find_by_id(&mut **tx, group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))
    }

    async fn load_farmer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        registration_number: &str,
    ) -> Result<Farmer, AppError> {
        self.farmers
            .find_by_id(&mut **tx, registration_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Produtor '{}' não encontrado.",
                    registration_number
                ))
            })
    }

    async fn ensure_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        farmer: &Farmer,
    ) -> Result<(), AppError> {
        let member_count = match farmer.family_group_id {
            Some(group_id) => Some(self.farmers.member_count(&mut **tx, group_id).await?),
            None => None,
        };

        if !farmer.is_available(member_count) {
            return Err(AppError::bad_request(format!(
                "O produtor '{}' não está disponível para compor um grupo familiar.",
                farmer.registration_number
            )));
        }

        Ok(())
    }

    /// Desfaz o grupo "solo" que o produtor ainda lidera sem habitar:
    /// membros soltos e o grupo apagado. Grupos com dois ou mais membros
    /// ficam como estão.
    async fn delete_stale_lead_group(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        registration_number: &str,
    ) -> Result<(), AppError> {
        let Some(stale) = self
            .groups
            .find_by_principal(&mut **tx, registration_number)
            .await?
        else {
            return Ok(());
        };

        let count = self.farmers.member_count(&mut **tx, stale.id).await?;
        if count >= 2 {
            return Ok(());
        }

        for member in self.farmers.members_of_group(&mut **tx, stale.id).await? {
            self.farmers
                .set_family_group(&mut **tx, &member.registration_number, None)
                .await?;
        }
        self.groups.delete(&mut **tx, stale.id).await?;

        Ok(())
    }

    /// Tira o produtor do grupo atual. Se o grupo ficar vazio (era um
    /// grupo solo), o grupo é apagado.
    async fn release_from_current_group(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        farmer: &Farmer,
    ) -> Result<(), AppError> {
        let Some(group_id) = farmer.family_group_id else {
            return Ok(());
        };

        self.farmers
            .set_family_group(&mut **tx, &farmer.registration_number, None)
            .await?;

        let remaining = self.farmers.member_count(&mut **tx, group_id).await?;
        if remaining == 0 {
            self.groups.delete(&mut **tx, group_id).await?;
        }

        Ok(())
    }
}

/// Pré-condições da remoção de membro: o produtor precisa pertencer ao grupo
/// e não pode ser o principal.
fn check_removal(group: &FamilyGroup, farmer: &Farmer) -> Result<(), AppError> {
    if farmer.family_group_id != Some(group.id) {
        return Err(AppError::bad_request(format!(
            "O produtor '{}' não pertence a este grupo familiar.",
            farmer.registration_number
        )));
    }
    if group.principal_registration == farmer.registration_number {
        return Err(AppError::bad_request(
            "O produtor principal não pode ser removido do grupo.",
        ));
    }
    Ok(())
}

fn group_not_found(group_id: i64) -> AppError {
    AppError::not_found(format!("Grupo familiar '{}' não encontrado.", group_id))
}

/// Nenhuma cultura pode passar da área total do grupo, e a soma de todas
/// também não.
pub fn validate_cultivation(cultivation: &Cultivation, total_area: f64) -> Result<(), AppError> {
    for (crop, area) in cultivation.crops() {
        if area < 0.0 {
            return Err(AppError::bad_request(format!(
                "A área de {} não pode ser negativa.",
                crop
            )));
        }
        if area > total_area {
            return Err(AppError::bad_request(format!(
                "A área de {} ({:.2}) excede a área total do grupo ({:.2}).",
                crop, area, total_area
            )));
        }
    }

    let sum = cultivation.total_area();
    if sum > total_area {
        return Err(AppError::bad_request(format!(
            "A soma das áreas de cultivo ({:.2}) excede a área total do grupo ({:.2}).",
            sum, total_area
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cultivation(areas: [f64; 6]) -> Cultivation {
        Cultivation {
            canola_area: areas[0],
            wheat_area: areas[1],
            corn_silage_area: areas[2],
            grain_corn_area: areas[3],
            bean_area: areas[4],
            soybean_area: areas[5],
            canola_area_participation: 0.0,
            wheat_area_participation: 0.0,
            corn_silage_area_participation: 0.0,
            grain_corn_area_participation: 0.0,
            bean_area_participation: 0.0,
            soybean_area_participation: 0.0,
        }
    }

    #[test]
    fn soma_igual_ao_total_passa() {
        // Grupo com 10 ha próprios + 5 ha arrendados.
        let c = cultivation([5.0, 5.0, 5.0, 0.0, 0.0, 0.0]);
        assert!(validate_cultivation(&c, 15.0).is_ok());
    }

    #[test]
    fn soma_acima_do_total_e_rejeitada() {
        let c = cultivation([5.0, 5.0, 6.0, 0.0, 0.0, 0.0]);
        assert!(validate_cultivation(&c, 15.0).is_err());
    }

    #[test]
    fn uma_cultura_acima_do_total_e_rejeitada() {
        let c = cultivation([16.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let err = validate_cultivation(&c, 15.0).unwrap_err();
        assert!(err.to_string().contains("canola") || matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn area_negativa_e_rejeitada() {
        let c = cultivation([-1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(validate_cultivation(&c, 15.0).is_err());
    }

    fn grupo(id: i64, principal: &str) -> FamilyGroup {
        FamilyGroup {
            id,
            principal_registration: principal.to_string(),
            registry: None,
            canola_area: 0.0,
            wheat_area: 0.0,
            corn_silage_area: 0.0,
            grain_corn_area: 0.0,
            bean_area: 0.0,
            soybean_area: 0.0,
            canola_area_participation: 0.0,
            wheat_area_participation: 0.0,
            corn_silage_area_participation: 0.0,
            grain_corn_area_participation: 0.0,
            bean_area_participation: 0.0,
            soybean_area_participation: 0.0,
        }
    }

    fn produtor(registration: &str, family_group_id: Option<i64>) -> Farmer {
        Farmer {
            registration_number: registration.to_string(),
            name: "Fulano".to_string(),
            status: crate::models::farmer::FarmerStatus::Active,
            blocked: false,
            owned_area: 10.0,
            leased_area: 5.0,
            family_group_id,
            branch_id: None,
            technician_id: None,
            type_id: None,
        }
    }

    #[test]
    fn remocao_do_principal_e_rejeitada() {
        let err = check_removal(&grupo(1, "123"), &produtor("123", Some(1))).unwrap_err();
        assert!(err.to_string().contains("principal"));
    }

    #[test]
    fn remocao_de_quem_nao_e_membro_e_rejeitada() {
        assert!(check_removal(&grupo(1, "123"), &produtor("456", Some(2))).is_err());
        assert!(check_removal(&grupo(1, "123"), &produtor("456", None)).is_err());
    }

    #[test]
    fn remocao_de_membro_comum_passa() {
        assert!(check_removal(&grupo(1, "123"), &produtor("456", Some(1))).is_ok());
    }
}
