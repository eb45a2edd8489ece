// src/models/farmer.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{asset::AssetResponse, branch::Branch};

// Mapeia o CREATE TYPE farmer_status do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "farmer_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FarmerStatus {
    Active,
    Deceased,
}

// Classificação do produtor (Pessoa Física Associado etc.).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerType {
    pub id: i32,
    pub description: String,
}

// Produtor como está na tabela farmers. A matrícula é a chave natural.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub registration_number: String,
    pub name: String,
    pub status: FarmerStatus,
    pub blocked: bool,
    pub owned_area: f64,
    pub leased_area: f64,
    pub family_group_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub technician_id: Option<i64>,
    pub type_id: Option<i32>,
}

impl Farmer {
    /// Disponível para entrar em um grupo familiar: ativo, não bloqueado e
    /// sem grupo (ou preso em um grupo que ainda só tem ele).
    pub fn is_available(&self, group_member_count: Option<i64>) -> bool {
        self.status == FarmerStatus::Active
            && !self.blocked
            && match (self.family_group_id, group_member_count) {
                (None, _) => true,
                (Some(_), Some(count)) => count < 2,
                (Some(_), None) => false,
            }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerPayload {
    #[validate(length(min = 1, message = "A matrícula do produtor é obrigatória."))]
    pub registration_number: String,

    #[validate(length(min = 1, message = "O nome do produtor é obrigatório."))]
    pub name: String,

    pub status: FarmerStatus,

    #[serde(default)]
    pub blocked: bool,

    #[validate(range(min = 0.0, message = "A área própria não pode ser negativa."))]
    #[serde(default)]
    pub owned_area: f64,

    #[validate(range(min = 0.0, message = "A área arrendada não pode ser negativa."))]
    #[serde(default)]
    pub leased_area: f64,

    pub family_group_id: Option<i64>,
    pub technician_id: Option<i64>,
    pub type_id: Option<i32>,
    pub branch_id: Option<i64>,
}

// Versão enxuta usada dentro de grupos familiares e bens.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerSummary {
    pub registration_number: String,
    pub name: String,
    pub status: FarmerStatus,
    pub owned_area: f64,
    pub leased_area: f64,
}

// Linha "achatada" do produtor com os relacionamentos resolvidos por JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct FarmerDetailRow {
    pub registration_number: String,
    pub name: String,
    pub status: FarmerStatus,
    pub blocked: bool,
    pub owned_area: f64,
    pub leased_area: f64,
    pub family_group_id: Option<i64>,
    pub family_group_registry: Option<String>,
    pub principal_registration: Option<String>,
    pub principal_name: Option<String>,
    pub branch_id: Option<i64>,
    pub branch_name: Option<String>,
    pub technician_id: Option<i64>,
    pub technician_username: Option<String>,
    pub technician_name: Option<String>,
    pub type_id: Option<i32>,
    pub type_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroupRef {
    pub id: i64,
    pub registry: Option<String>,
    pub principal_registration: Option<String>,
    pub principal_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianRef {
    pub id: i64,
    pub username: String,
    pub name: String,
}

// Resposta completa do produtor, com grupo, técnico, carteira, tipo e bens.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmerResponse {
    pub registration_number: String,
    pub name: String,
    pub status: FarmerStatus,
    pub blocked: bool,
    pub owned_area: f64,
    pub leased_area: f64,
    pub family_group: Option<FamilyGroupRef>,
    pub technician: Option<TechnicianRef>,
    pub branch: Option<Branch>,
    #[serde(rename = "type")]
    pub farmer_type: Option<FarmerType>,
    pub owned_assets: Vec<AssetResponse>,
    pub leased_assets: Vec<AssetResponse>,
}

impl FarmerResponse {
    pub fn from_row(
        row: FarmerDetailRow,
        owned_assets: Vec<AssetResponse>,
        leased_assets: Vec<AssetResponse>,
    ) -> Self {
        let family_group = row.family_group_id.map(|id| FamilyGroupRef {
            id,
            registry: row.family_group_registry,
            principal_registration: row.principal_registration,
            principal_name: row.principal_name,
        });

        let technician = match (row.technician_id, row.technician_username) {
            (Some(id), Some(username)) => Some(TechnicianRef {
                id,
                username,
                name: row.technician_name.unwrap_or_default(),
            }),
            _ => None,
        };

        let branch = match (row.branch_id, row.branch_name) {
            (Some(id), Some(name)) => Some(Branch { id, name }),
            _ => None,
        };

        let farmer_type = match (row.type_id, row.type_description) {
            (Some(id), Some(description)) => Some(FarmerType { id, description }),
            _ => None,
        };

        Self {
            registration_number: row.registration_number,
            name: row.name,
            status: row.status,
            blocked: row.blocked,
            owned_area: row.owned_area,
            leased_area: row.leased_area,
            family_group,
            technician,
            branch,
            farmer_type,
            owned_assets,
            leased_assets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer(status: FarmerStatus, blocked: bool, group: Option<i64>) -> Farmer {
        Farmer {
            registration_number: "100".to_string(),
            name: "Produtor Teste".to_string(),
            status,
            blocked,
            owned_area: 10.0,
            leased_area: 5.0,
            family_group_id: group,
            branch_id: None,
            technician_id: None,
            type_id: None,
        }
    }

    #[test]
    fn ativo_sem_grupo_esta_disponivel() {
        assert!(farmer(FarmerStatus::Active, false, None).is_available(None));
    }

    #[test]
    fn falecido_nunca_esta_disponivel() {
        assert!(!farmer(FarmerStatus::Deceased, false, None).is_available(None));
    }

    #[test]
    fn bloqueado_nunca_esta_disponivel() {
        assert!(!farmer(FarmerStatus::Active, true, None).is_available(None));
    }

    #[test]
    fn em_grupo_solo_esta_disponivel() {
        assert!(farmer(FarmerStatus::Active, false, Some(1)).is_available(Some(1)));
    }

    #[test]
    fn em_grupo_com_dois_membros_nao_esta_disponivel() {
        assert!(!farmer(FarmerStatus::Active, false, Some(1)).is_available(Some(2)));
    }
}
