// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Back-office API",
        description = "Dashboard de operações do e-commerce e utilitários de arquivos/e-mail"
    ),
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,

        // --- Uploads ---
        handlers::uploads::upload_file,
        handlers::uploads::upload_file_to_folder,
        handlers::uploads::presign,
        handlers::uploads::delete_file,

        // --- Emails ---
        handlers::emails::render_partner_rejection,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::DashboardReport,
            models::dashboard::KpiCards,
            models::dashboard::WarehouseStatus,
            models::dashboard::OrderOperations,
            models::dashboard::DailyInsights,
            models::dashboard::CategoryInsight,
            models::dashboard::ItemInsight,
            models::dashboard::PeakHour,
            models::dashboard::DeliveryPerformance,
            models::dashboard::PaymentFinance,
            models::dashboard::PaymentSplit,
            models::dashboard::MonthlyBucket,
            models::dashboard::PaymentMethodBucket,
            models::dashboard::WarehouseAlerts,
            models::dashboard::EodClosing,
            models::dashboard::SourceStatus,
            models::dashboard::SourceHealth,

            // --- Uploads ---
            models::storage::UploadResponse,
            models::storage::PresignResponse,
            handlers::uploads::UploadForm,

            // --- Emails ---
            models::email::RejectionEmailPayload,
            models::email::RenderedEmail,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores do dia, financeiro e estoque"),
        (name = "Uploads", description = "Arquivos no S3 (upload, URL assinada, remoção)"),
        (name = "Emails", description = "Templates de e-mail transacional")
    )
)]
pub struct ApiDoc;
