// src/config.rs

use std::{env, fmt::Display, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::{
    common::i18n::I18nStore,
    models::dashboard::DeliveryPerformance,
    services::{
        dashboard_service::DashboardService, email_service::EmailService,
        storage_service::StorageService,
    },
    upstream::{S3Storage, StaticDeliveryMetrics, UpstreamClient},
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub aws_region: String,
    pub s3_bucket: String,
    pub frontend_url: String,
    pub support_email: String,
    pub company_logo_key: Option<String>,
    // Ainda sem delivery-service: números fixos vindos do ambiente
    pub delivery_on_time_rate: Decimal,
    pub delivery_performance: DeliveryPerformance,
}

// Variável vazia conta como ausente
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    optional_var(name).unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = var_or(name, default);
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{name} inválida ('{raw}'): {e}"))
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let upstream_base_url =
            optional_var("UPSTREAM_BASE_URL").context("UPSTREAM_BASE_URL deve ser definida")?;

        Ok(Self {
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            upstream_base_url,
            upstream_timeout: Duration::from_secs(parse_var("UPSTREAM_TIMEOUT_SECS", "10")?),
            aws_region: var_or("AWS_REGION", "eu-north-1"),
            s3_bucket: var_or("AWS_S3_BUCKET_NAME", "mnt-ecommerce-2025"),
            frontend_url: var_or("FRONTEND_URL", "http://localhost:3000"),
            support_email: var_or("SUPPORT_EMAIL", "support@example.com"),
            company_logo_key: optional_var("COMPANY_LOGO_KEY"),
            delivery_on_time_rate: parse_var("DELIVERY_ON_TIME_RATE", "98.5")?,
            delivery_performance: DeliveryPerformance {
                avg_delivery_time: parse_var("DELIVERY_AVG_MINUTES", "28")?,
                active_riders: parse_var("DELIVERY_ACTIVE_RIDERS", "73")?,
                total_deliveries: parse_var("DELIVERY_TOTAL", "156")?,
                failed_attempts: parse_var("DELIVERY_FAILED_ATTEMPTS", "3.8")?,
            },
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dashboard_service: DashboardService,
    pub storage_service: StorageService,
    pub email_service: EmailService,
    pub i18n_store: Arc<I18nStore>,
    // Cancelado no ctrl+c; cada relatório usa um token filho
    pub shutdown: CancellationToken,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Settings::from_env()?;

        // --- Monta o gráfico de dependências ---
        let upstream = Arc::new(
            UpstreamClient::new(&settings.upstream_base_url, settings.upstream_timeout)
                .context("Falha ao criar o cliente HTTP dos serviços internos")?,
        );
        let delivery = Arc::new(StaticDeliveryMetrics {
            on_time_rate: settings.delivery_on_time_rate,
            performance: settings.delivery_performance.clone(),
        });
        let dashboard_service =
            DashboardService::new(upstream.clone(), upstream.clone(), upstream, delivery);

        let store = Arc::new(S3Storage::new(&settings.s3_bucket, &settings.aws_region).await);
        let storage_service = StorageService::new(store, &settings.s3_bucket, &settings.aws_region)?;

        let email_service = EmailService::new(
            storage_service.clone(),
            settings.frontend_url.clone(),
            settings.support_email.clone(),
            settings.company_logo_key.clone(),
        )?;

        tracing::info!(
            upstream = %settings.upstream_base_url,
            bucket = %settings.s3_bucket,
            "✅ Estado da aplicação montado"
        );

        Ok(Self::from_parts(settings, dashboard_service, storage_service, email_service))
    }

    pub fn from_parts(
        settings: Settings,
        dashboard_service: DashboardService,
        storage_service: StorageService,
        email_service: EmailService,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            dashboard_service,
            storage_service,
            email_service,
            i18n_store: Arc::new(I18nStore::new()),
            shutdown: CancellationToken::new(),
        }
    }
}
