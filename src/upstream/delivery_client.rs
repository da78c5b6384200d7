// src/upstream/delivery_client.rs

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::UpstreamError;
use crate::models::dashboard::DeliveryPerformance;

#[async_trait]
pub trait DeliveryApi: Send + Sync {
    /// Percentual de entregas no prazo (0-100).
    async fn on_time_rate(&self) -> Result<Decimal, UpstreamError>;
    async fn performance(&self) -> Result<DeliveryPerformance, UpstreamError>;
}

/// Ainda não existe um delivery-service; os números vêm da configuração.
#[derive(Debug, Clone)]
pub struct StaticDeliveryMetrics {
    pub on_time_rate: Decimal,
    pub performance: DeliveryPerformance,
}

#[async_trait]
impl DeliveryApi for StaticDeliveryMetrics {
    async fn on_time_rate(&self) -> Result<Decimal, UpstreamError> {
        Ok(self.on_time_rate)
    }

    async fn performance(&self) -> Result<DeliveryPerformance, UpstreamError> {
        Ok(self.performance.clone())
    }
}
