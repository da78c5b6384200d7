// src/models/email.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectionEmailPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Ana Souza")]
    pub name: String,

    #[validate(email(message = "E-mail inválido."))]
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    #[schema(example = "Documentação incompleta")]
    pub reason: String,

    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}
