// src/upstream/fakes.rs
// Implementações em memória dos clientes upstream, só para testes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    DeliveryApi, FinanceApi, InventoryApi, ObjectStorage, OrderQuery, OrdersApi, StorageError,
    UpstreamError,
};
use crate::common::date_range::TimeWindow;
use crate::models::dashboard::DeliveryPerformance;
use crate::models::finance::SaleRecord;
use crate::models::inventory::{
    Category, EodClosingStock, ExpiryWastageReport, StockAvailabilityReport, TopSellingReport,
    Warehouse,
};
use crate::models::orders::OrderRecord;

#[derive(Default, Clone)]
pub struct FakeUpstream {
    pub pos_orders: Vec<OrderRecord>,
    pub online_orders: Vec<OrderRecord>,
    pub warehouses: Vec<Warehouse>,
    pub categories: Vec<Category>,
    pub top_selling: TopSellingReport,
    pub stock: StockAvailabilityReport,
    pub expiry: ExpiryWastageReport,
    pub eod: EodClosingStock,
    pub sales: Vec<SaleRecord>,
    pub delivery: DeliveryPerformance,
    pub on_time_rate: Decimal,
    // Endpoints que devolvem erro / que entram em panic
    pub failing: HashSet<&'static str>,
    pub panicking: HashSet<&'static str>,
    // Log de chamadas: (endpoint, parâmetros relevantes)
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeUpstream {
    pub fn failing(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn panicking(mut self, endpoint: &'static str) -> Self {
        self.panicking.insert(endpoint);
        self
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn hit(&self, endpoint: &'static str, params: String) -> Result<(), UpstreamError> {
        self.calls.lock().unwrap().push((endpoint.to_string(), params));
        if self.panicking.contains(endpoint) {
            panic!("fake upstream {endpoint} exploded");
        }
        if self.failing.contains(endpoint) {
            return Err(UpstreamError::Unavailable(format!("{endpoint} indisponível")));
        }
        Ok(())
    }

    fn filter_orders(orders: &[OrderRecord], query: &OrderQuery) -> Vec<OrderRecord> {
        orders
            .iter()
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect()
    }
}

fn window_params(window: TimeWindow) -> String {
    format!("{}..{}", window.start_param(), window.end_param())
}

#[async_trait]
impl OrdersApi for FakeUpstream {
    async fn list_pos_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError> {
        self.hit("pos", window_params(query.window))?;
        Ok(Self::filter_orders(&self.pos_orders, query))
    }

    async fn list_online_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, UpstreamError> {
        self.hit("online", window_params(query.window))?;
        Ok(Self::filter_orders(&self.online_orders, query))
    }
}

#[async_trait]
impl InventoryApi for FakeUpstream {
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, UpstreamError> {
        self.hit("warehouses", String::new())?;
        Ok(self.warehouses.clone())
    }

    async fn list_active_categories(&self) -> Result<Vec<Category>, UpstreamError> {
        self.hit("categories", String::new())?;
        Ok(self.categories.clone())
    }

    async fn top_selling(&self, window: TimeWindow, limit: u32) -> Result<TopSellingReport, UpstreamError> {
        self.hit("top-selling", format!("{} limit={limit}", window_params(window)))?;
        Ok(self.top_selling.clone())
    }

    async fn stock_availability(&self) -> Result<StockAvailabilityReport, UpstreamError> {
        self.hit("stock-availability", String::new())?;
        Ok(self.stock.clone())
    }

    async fn expiry_wastage(&self, days_ahead: u32) -> Result<ExpiryWastageReport, UpstreamError> {
        self.hit("expiry-wastage", format!("daysAhead={days_ahead}"))?;
        Ok(self.expiry.clone())
    }

    async fn eod_closing_stock(&self, date: NaiveDate) -> Result<EodClosingStock, UpstreamError> {
        self.hit("eod-closing-stock", date.to_string())?;
        Ok(self.eod.clone())
    }
}

#[async_trait]
impl FinanceApi for FakeUpstream {
    async fn list_sales(&self, window: TimeWindow, limit: u32) -> Result<Vec<SaleRecord>, UpstreamError> {
        self.hit("sales", format!("{} limit={limit}", window_params(window)))?;
        Ok(self.sales.clone())
    }
}

#[async_trait]
impl DeliveryApi for FakeUpstream {
    async fn on_time_rate(&self) -> Result<Decimal, UpstreamError> {
        self.hit("on-time", String::new())?;
        Ok(self.on_time_rate)
    }

    async fn performance(&self) -> Result<DeliveryPerformance, UpstreamError> {
        self.hit("delivery", String::new())?;
        Ok(self.delivery.clone())
    }
}

/// Bucket em memória.
#[derive(Default, Clone)]
pub struct InMemoryStorage {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub fail_all: bool,
}

impl InMemoryStorage {
    pub fn broken() -> Self {
        Self { fail_all: true, ..Default::default() }
    }

    pub fn with_object(self, key: &str) -> Self {
        self.objects.lock().unwrap().insert(key.to_string(), b"x".to_vec());
        self
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_all {
            return Err(StorageError::Backend("bucket fora do ar".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        self.check()?;
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, StorageError> {
        self.check()?;
        Ok(format!(
            "https://signed.example/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
