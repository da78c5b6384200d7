// src/handlers/emails.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::email::{RejectionEmailPayload, RenderedEmail},
};

// POST /api/emails/delivery-partner/rejected
#[utoipa::path(
    post,
    path = "/api/emails/delivery-partner/rejected",
    tag = "Emails",
    request_body = RejectionEmailPayload,
    responses(
        (status = 200, description = "E-mail de recusa renderizado (assunto + HTML)", body = RenderedEmail),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn render_partner_rejection(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RejectionEmailPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let email = app_state
        .email_service
        .render_rejection(&payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(email)))
}
