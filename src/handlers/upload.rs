// src/handlers/upload.rs

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::import::{ImportJobResponse, ImportJobStatus},
};

/// Recebe um CSV de carga e dispara a importação em background. A rotina
/// é escolhida pelo nome do arquivo: data.csv, farmer_update.csv ou
/// assets.csv.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 202, description = "Importação agendada", body = ImportJobResponse),
        (status = 400, description = "Arquivo ausente ou não reconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_file(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportJobResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;

        let job_id = app_state.imports.start(&filename, bytes.to_vec()).await?;

        return Ok((
            StatusCode::ACCEPTED,
            Json(ImportJobResponse {
                job_id,
                message: format!("Importação de '{}' agendada.", filename),
            }),
        ));
    }

    Err(AppError::bad_request("Nenhum arquivo foi enviado."))
}

#[utoipa::path(
    get,
    path = "/upload/status/{jobId}",
    tag = "Upload",
    responses(
        (status = 200, description = "Situação do job", body = ImportJobStatus),
        (status = 404, description = "Job não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn job_status(
    State(app_state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ImportJobStatus>, AppError> {
    let status = app_state
        .imports
        .job_status(job_id)
        .await
        .ok_or_else(|| AppError::not_found(format!("Job '{}' não encontrado.", job_id)))?;

    Ok(Json(status))
}
