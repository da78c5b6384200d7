// src/upstream/finance_client.rs

use async_trait::async_trait;

use super::{UpstreamClient, UpstreamError};
use crate::common::date_range::TimeWindow;
use crate::models::finance::SaleRecord;

#[async_trait]
pub trait FinanceApi: Send + Sync {
    async fn list_sales(&self, window: TimeWindow, limit: u32) -> Result<Vec<SaleRecord>, UpstreamError>;
}

#[async_trait]
impl FinanceApi for UpstreamClient {
    async fn list_sales(&self, window: TimeWindow, limit: u32) -> Result<Vec<SaleRecord>, UpstreamError> {
        let params = [
            ("startDate", window.start_param()),
            ("endDate", window.end_param()),
            ("limit", limit.to_string()),
        ];
        self.get_data("/api/finance/sales", &params).await
    }
}
