// src/models/asset.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Bem patrimonial. Chave composta (matrícula do dono, id sequencial do SAP).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub owner_registration: String,
    pub id_sap: i64,
    pub description: String,
    pub address: String,
    pub amount: f64,
    pub cultivable_area: f64,
    pub asset_type_id: Option<i64>,
    pub asset_category_id: Option<i64>,
    pub leased_to: Option<String>,
}

impl Asset {
    /// Identificador externo no formato "matrícula-idSap".
    pub fn external_id(&self) -> String {
        format!("{}-{}", self.owner_registration, self.id_sap)
    }
}

// Tabelas de referência de bens.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetType {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetCategory {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetPayload {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub address: String,

    #[validate(range(min = 0.0, message = "O valor do bem não pode ser negativo."))]
    pub amount: f64,

    #[validate(range(min = 0.0, message = "A área cultivável não pode ser negativa."))]
    #[serde(default)]
    pub cultivable_area: f64,

    #[validate(length(min = 1, message = "A matrícula do proprietário é obrigatória."))]
    pub owner_registration_number: String,

    pub leased_to_registration_number: Option<String>,
    pub asset_category_id: Option<i64>,
    pub asset_type_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeasePayload {
    pub asset_id: String,
    pub lessee: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnleasePayload {
    pub asset_id: String,
}

// Linha do bem com descrições e nomes resolvidos por JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct AssetDetailRow {
    pub owner_registration: String,
    pub id_sap: i64,
    pub description: String,
    pub address: String,
    pub amount: f64,
    pub cultivable_area: f64,
    pub asset_type: Option<String>,
    pub asset_category: Option<String>,
    pub owner_name: String,
    pub leased_to: Option<String>,
    pub leased_to_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetOwnerRef {
    pub registration_number: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    pub id_sap: i64,
    pub description: String,
    pub address: String,
    pub amount: f64,
    pub cultivable_area: f64,
    pub asset_type: Option<String>,
    pub asset_category: Option<String>,
    pub owner: AssetOwnerRef,
    pub leased_to: Option<AssetOwnerRef>,
}

impl From<AssetDetailRow> for AssetResponse {
    fn from(row: AssetDetailRow) -> Self {
        let leased_to = match (row.leased_to, row.leased_to_name) {
            (Some(registration_number), Some(name)) => Some(AssetOwnerRef {
                registration_number,
                name,
            }),
            _ => None,
        };

        Self {
            id: format!("{}-{}", row.owner_registration, row.id_sap),
            id_sap: row.id_sap,
            description: row.description,
            address: row.address,
            amount: row.amount,
            cultivable_area: row.cultivable_area,
            asset_type: row.asset_type,
            asset_category: row.asset_category,
            owner: AssetOwnerRef {
                registration_number: row.owner_registration,
                name: row.owner_name,
            },
            leased_to,
        }
    }
}
