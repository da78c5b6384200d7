// src/handlers/uploads.rs

use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::storage::{DeleteParams, PresignParams, PresignResponse, UploadResponse, UploadedFile},
};

const FILE_FIELD: &str = "file";

// Nomes que colidem com rotas fixas de /api/uploads
const RESERVED_FOLDERS: &[&str] = &["presign"];

// Um único segmento: letras, números, '-' e '_'
fn validate_folder(folder: &str) -> Result<(), ValidationError> {
    let chars_ok = folder
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    let reserved = RESERVED_FOLDERS
        .iter()
        .any(|name| folder.eq_ignore_ascii_case(name));

    if !chars_ok || reserved {
        let mut err = ValidationError::new("folder");
        err.message = Some("Pasta inválida.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct UploadFolder {
    /// Pasta de destino no bucket
    #[validate(
        length(min = 1, max = 64, message = "A pasta deve ter entre 1 e 64 caracteres."),
        custom(function = "validate_folder")
    )]
    pub folder: String,
}

// Só para a documentação do corpo multipart
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

async fn read_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidUpload(e.body_text()))?;

        return Ok(UploadedFile {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::InvalidUpload(format!("Campo '{FILE_FIELD}' ausente")))
}

async fn store_upload(
    app_state: &AppState,
    folder: Option<&str>,
    multipart: Multipart,
) -> Result<UploadResponse, AppError> {
    let file = read_file(multipart).await?;
    let key = app_state.storage_service.upload(file, folder).await?;
    Ok(UploadResponse { key })
}

// POST /api/uploads
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "Uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Arquivo salvo na pasta padrão (purchase)", body = UploadResponse),
        (status = 400, description = "Tipo ou tamanho não permitido"),
        (status = 502, description = "Falha no S3")
    )
)]
pub async fn upload_file(
    State(app_state): State<AppState>,
    locale: Locale,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let uploaded = store_upload(&app_state, None, multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(uploaded)))
}

// POST /api/uploads/{folder}
#[utoipa::path(
    post,
    path = "/api/uploads/{folder}",
    tag = "Uploads",
    params(UploadFolder),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Arquivo salvo", body = UploadResponse),
        (status = 400, description = "Pasta, tipo ou tamanho inválido"),
        (status = 502, description = "Falha no S3")
    )
)]
pub async fn upload_file_to_folder(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(path): Path<UploadFolder>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let uploaded = store_upload(&app_state, Some(&path.folder), multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(uploaded)))
}

// GET /api/uploads/presign
#[utoipa::path(
    get,
    path = "/api/uploads/presign",
    tag = "Uploads",
    params(PresignParams),
    responses(
        (status = 200, description = "URL temporária (null se a chave estiver vazia ou o S3 falhar)", body = PresignResponse)
    )
)]
pub async fn presign(
    State(app_state): State<AppState>,
    Query(params): Query<PresignParams>,
) -> impl IntoResponse {
    let url = app_state
        .storage_service
        .presigned_url(&params.key, params.expires_in.map(Duration::from_secs))
        .await;

    (StatusCode::OK, Json(PresignResponse { url }))
}

// DELETE /api/uploads
#[utoipa::path(
    delete,
    path = "/api/uploads",
    tag = "Uploads",
    params(DeleteParams),
    responses(
        (status = 204, description = "Removido (ou ignorado se não for do nosso bucket)")
    )
)]
pub async fn delete_file(
    State(app_state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> StatusCode {
    app_state.storage_service.delete(&params.key).await;
    StatusCode::NO_CONTENT
}
