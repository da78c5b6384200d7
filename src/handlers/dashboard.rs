// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::DashboardReport,
    services::dashboard_service::ReportQuery,
};

// As datas chegam como texto para que um formato inválido vire o nosso 400,
// e não a rejeição padrão do extrator.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// Início do período (YYYY-MM-DD)
    #[param(example = "2026-10-01")]
    pub start_date: Option<String>,
    /// Fim do período (YYYY-MM-DD)
    #[param(example = "2026-10-19")]
    pub end_date: Option<String>,
}

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::InvalidDate { field, value: value.to_string() }),
    }
}

impl DashboardParams {
    pub fn to_report_query(&self) -> Result<ReportQuery, AppError> {
        let start = parse_date("startDate", self.start_date.as_deref())?;
        let end = parse_date("endDate", self.end_date.as_deref())?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::InvalidDateRange);
            }
        }
        Ok(ReportQuery { start, end })
    }
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Relatório completo do dashboard (fontes com falha vêm zeradas e marcadas em `sources`)", body = DashboardReport),
        (status = 400, description = "Data inválida ou intervalo invertido"),
        (status = 500, description = "Falha na orquestração do relatório"),
        (status = 503, description = "Servidor desligando")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params
        .to_report_query()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let cancel = app_state.shutdown.child_token();
    let report = app_state
        .dashboard_service
        .get_report(query, &cancel)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}
