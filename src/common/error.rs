use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Falhas de um serviço upstream NÃO aparecem aqui: elas são absorvidas
// dentro de cada fetcher do dashboard (ver `SourceHealth`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida no campo '{field}': {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Intervalo de datas invertido")]
    InvalidDateRange,

    #[error("Arquivo recusado: {0}")]
    InvalidUpload(String),

    #[error("Falha no armazenamento: {0}")]
    Storage(String),

    #[error("Erro de template: {0}")]
    Template(#[from] tera::Error),

    // O fan-out do dashboard não conseguiu terminar (panic em alguma tarefa)
    #[error("Falha na orquestração do relatório: {0}")]
    Orchestration(String),

    #[error("Relatório cancelado")]
    Cancelled,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDate { .. }
            | AppError::InvalidDateRange
            | AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Template(_) | AppError::Orchestration(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::InvalidDate { .. } => "error.invalid_date",
            AppError::InvalidDateRange => "error.date_range",
            AppError::InvalidUpload(_) => "error.invalid_upload",
            AppError::Storage(_) => "error.storage",
            AppError::Orchestration(_) => "error.report_unavailable",
            AppError::Cancelled => "error.cancelled",
            AppError::Template(_) | AppError::InternalServerError(_) => "error.internal",
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    /// Erros 5xx são logados com o detalhe e devolvidos com mensagem genérica.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => Some(json!(field_messages(errors))),
            AppError::InvalidDate { field, value } => Some(json!({ (*field): value })),
            _ => None,
        };

        ApiError {
            status,
            message: store.translate(&locale.0, self.message_key()),
            details,
        }
    }
}

fn field_messages(errors: &validator::ValidationErrors) -> std::collections::HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

// O erro que efetivamente vai para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Sem locale disponível (ex: fora de um handler), responde em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::new()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orchestration_failure_is_generic_500() {
        let err = AppError::Orchestration("panic in fetcher".into());
        let api = err.to_api_error(&Locale("pt".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Não foi possível gerar o dashboard.");
        assert!(!api.message.contains("panic"));
    }

    #[test]
    fn invalid_date_carries_field_detail() {
        let err = AppError::InvalidDate { field: "startDate", value: "2026-13-40".into() };
        let api = err.to_api_error(&Locale("en".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details, Some(json!({ "startDate": "2026-13-40" })));
    }

    #[test]
    fn cancelled_maps_to_503() {
        assert_eq!(AppError::Cancelled.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
