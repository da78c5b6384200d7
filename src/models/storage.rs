// src/models/storage.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Arquivo recebido via multipart, já em memória.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "purchase/1760875200000-nota.pdf")]
    pub key: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PresignParams {
    /// Chave do objeto ou URL completa do S3
    pub key: String,
    /// Validade em segundos (padrão: 3600)
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresignResponse {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    pub key: String,
}
