// src/upstream/orders_client.rs

use async_trait::async_trait;

use super::{UpstreamClient, UpstreamError};
use crate::common::date_range::TimeWindow;
use crate::models::orders::{OrderRecord, OrderStatus};

// O order-service devolve no máximo isso por página; o dashboard só olha a primeira.
pub const ORDER_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct OrderQuery {
    pub window: TimeWindow,
    pub status: Option<OrderStatus>,
    pub limit: u32,
}

impl OrderQuery {
    pub fn new(window: TimeWindow, status: Option<OrderStatus>) -> Self {
        Self { window, status, limit: ORDER_PAGE_LIMIT }
    }

    // O fim vai como ISO com 23:59:59.999 para incluir os pedidos do último dia
    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", self.window.start_param()),
            ("endDate", self.window.end_of_day_param()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn list_pos_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError>;
    async fn list_online_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError>;
}

#[async_trait]
impl OrdersApi for UpstreamClient {
    async fn list_pos_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError> {
        let mut params = query.base_params();
        // POS filtra por `orderStatus`
        if let Some(status) = query.status {
            params.push(("orderStatus", status.as_str().to_string()));
        }
        self.get_data("/api/pos/orders", &params).await
    }

    async fn list_online_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError> {
        let mut params = query.base_params();
        // Online filtra por `status`
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        self.get_data("/api/online/admin/orders", &params).await
    }
}
