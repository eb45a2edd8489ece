// src/models/import.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Rotina de importação, escolhida pelo nome do arquivo enviado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// data.csv: produtores + grupos familiares em duas passadas.
    FarmerData,
    /// farmer_update.csv: tipo, falecimento e bloqueio de produtores.
    FarmerUpdate,
    /// assets.csv: bens patrimoniais.
    Assets,
}

impl ImportKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        match filename.to_ascii_lowercase().as_str() {
            "data.csv" => Some(Self::FarmerData),
            "farmer_update.csv" => Some(Self::FarmerUpdate),
            "assets.csv" => Some(Self::Assets),
            _ => None,
        }
    }
}

// Erro de uma linha individual: registrado e a linha é pulada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

// Situação de um job de importação, consultável em /upload/status/{id}.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImportJobStatus {
    Pending,
    Running,
    #[serde(rename_all = "camelCase")]
    Completed {
        processed: u64,
        skipped: u64,
        row_errors: Vec<RowError>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportJobResponse {
    pub job_id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_de_arquivo_escolhe_a_rotina() {
        assert_eq!(
            ImportKind::from_filename("data.csv"),
            Some(ImportKind::FarmerData)
        );
        assert_eq!(
            ImportKind::from_filename("FARMER_UPDATE.CSV"),
            Some(ImportKind::FarmerUpdate)
        );
        assert_eq!(
            ImportKind::from_filename("Assets.csv"),
            Some(ImportKind::Assets)
        );
        assert_eq!(ImportKind::from_filename("outro.csv"), None);
    }
}
