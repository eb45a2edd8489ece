// src/models/family_group.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::farmer::FarmerSummary;

// Grupo familiar como está na tabela family_groups. Os membros ficam na
// coluna farmers.family_group_id; toda mutação passa pelo serviço.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroup {
    pub id: i64,
    pub principal_registration: String,
    pub registry: Option<String>,
    pub canola_area: f64,
    pub wheat_area: f64,
    pub corn_silage_area: f64,
    pub grain_corn_area: f64,
    pub bean_area: f64,
    pub soybean_area: f64,
    pub canola_area_participation: f64,
    pub wheat_area_participation: f64,
    pub corn_silage_area_participation: f64,
    pub grain_corn_area_participation: f64,
    pub bean_area_participation: f64,
    pub soybean_area_participation: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroupPayload {
    #[validate(length(min = 1, message = "A matrícula do produtor principal é obrigatória."))]
    pub principal_id: String,

    #[serde(default)]
    pub members_id: Vec<String>,

    pub registry: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistryPayload {
    pub registry: Option<String>,
}

// Áreas de cultivo e percentuais de participação do grupo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cultivation {
    pub canola_area: f64,
    pub wheat_area: f64,
    pub corn_silage_area: f64,
    pub grain_corn_area: f64,
    pub bean_area: f64,
    pub soybean_area: f64,

    #[serde(default)]
    pub canola_area_participation: f64,
    #[serde(default)]
    pub wheat_area_participation: f64,
    #[serde(default)]
    pub corn_silage_area_participation: f64,
    #[serde(default)]
    pub grain_corn_area_participation: f64,
    #[serde(default)]
    pub bean_area_participation: f64,
    #[serde(default)]
    pub soybean_area_participation: f64,
}

impl Cultivation {
    /// Pares (nome da cultura, área solicitada), na grafia usada nas
    /// mensagens de erro.
    pub fn crops(&self) -> [(&'static str, f64); 6] {
        [
            ("canola", self.canola_area),
            ("trigo", self.wheat_area),
            ("milho para silagem", self.corn_silage_area),
            ("milho grão", self.grain_corn_area),
            ("feijão", self.bean_area),
            ("soja", self.soybean_area),
        ]
    }

    pub fn total_area(&self) -> f64 {
        self.crops().iter().map(|(_, area)| area).sum()
    }
}

impl From<&FamilyGroup> for Cultivation {
    fn from(group: &FamilyGroup) -> Self {
        Self {
            canola_area: group.canola_area,
            wheat_area: group.wheat_area,
            corn_silage_area: group.corn_silage_area,
            grain_corn_area: group.grain_corn_area,
            bean_area: group.bean_area,
            soybean_area: group.soybean_area,
            canola_area_participation: group.canola_area_participation,
            wheat_area_participation: group.wheat_area_participation,
            corn_silage_area_participation: group.corn_silage_area_participation,
            grain_corn_area_participation: group.grain_corn_area_participation,
            bean_area_participation: group.bean_area_participation,
            soybean_area_participation: group.soybean_area_participation,
        }
    }
}

// Linha do grupo com o principal resolvido por JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct FamilyGroupDetailRow {
    pub id: i64,
    pub registry: Option<String>,
    pub principal_registration: String,
    pub principal_name: String,
    pub principal_status: crate::models::farmer::FarmerStatus,
    pub principal_owned_area: f64,
    pub principal_leased_area: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroupResponse {
    pub id: i64,
    pub principal: FarmerSummary,
    pub registry: Option<String>,
}

impl From<FamilyGroupDetailRow> for FamilyGroupResponse {
    fn from(row: FamilyGroupDetailRow) -> Self {
        Self {
            id: row.id,
            principal: FarmerSummary {
                registration_number: row.principal_registration,
                name: row.principal_name,
                status: row.principal_status,
                owned_area: row.principal_owned_area,
                leased_area: row.principal_leased_area,
            },
            registry: row.registry,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroupMembersResponse {
    pub id: i64,
    pub principal: FarmerSummary,
    pub members: Vec<FarmerSummary>,
    pub registry: Option<String>,
}

// Cultivo + área livre usados nos relatórios por carteira/técnico.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CultivationWithFreeArea {
    pub family_group_id: i64,
    pub free_area: f64,
    pub cultivation: Cultivation,
}

// Agregado (grupo, área) devolvido pelas queries de área livre.
#[derive(Debug, Clone, FromRow)]
pub struct FreeAreaRow {
    pub family_group_id: i64,
    pub free_area: f64,
}
