// src/upstream/inventory_client.rs

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{UpstreamClient, UpstreamError};
use crate::common::date_range::TimeWindow;
use crate::models::inventory::{
    Category, EodClosingStock, ExpiryWastageReport, StockAvailabilityReport, TopSellingReport,
    Warehouse,
};

#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, UpstreamError>;
    async fn list_active_categories(&self) -> Result<Vec<Category>, UpstreamError>;
    async fn top_selling(&self, window: TimeWindow, limit: u32) -> Result<TopSellingReport, UpstreamError>;
    async fn stock_availability(&self) -> Result<StockAvailabilityReport, UpstreamError>;
    async fn expiry_wastage(&self, days_ahead: u32) -> Result<ExpiryWastageReport, UpstreamError>;
    async fn eod_closing_stock(&self, date: NaiveDate) -> Result<EodClosingStock, UpstreamError>;
}

#[async_trait]
impl InventoryApi for UpstreamClient {
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, UpstreamError> {
        self.get_data("/api/inventory/warehouses", &[]).await
    }

    async fn list_active_categories(&self) -> Result<Vec<Category>, UpstreamError> {
        self.get_data("/api/inventory/categories", &[("isActive", "true".to_string())])
            .await
    }

    // Relatório diário: as datas vão puras (YYYY-MM-DD), sem horário
    async fn top_selling(&self, window: TimeWindow, limit: u32) -> Result<TopSellingReport, UpstreamError> {
        let params = [
            ("startDate", window.start_param()),
            ("endDate", window.end_param()),
            ("limit", limit.to_string()),
        ];
        self.get_data("/api/inventory/reports/top-selling", &params).await
    }

    async fn stock_availability(&self) -> Result<StockAvailabilityReport, UpstreamError> {
        self.get_data("/api/inventory/reports/stock-availability", &[]).await
    }

    async fn expiry_wastage(&self, days_ahead: u32) -> Result<ExpiryWastageReport, UpstreamError> {
        self.get_data(
            "/api/inventory/reports/expiry-wastage",
            &[("daysAhead", days_ahead.to_string())],
        )
        .await
    }

    async fn eod_closing_stock(&self, date: NaiveDate) -> Result<EodClosingStock, UpstreamError> {
        self.get_data(
            "/api/inventory/reports/eod-closing-stock",
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }
}
