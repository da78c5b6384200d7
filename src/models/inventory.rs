// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{count_or_zero, decimal_or_zero};

// Tudo aqui é a resposta crua do inventory-service, só para leitura.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Warehouse {
    // "active" ou "inactive"
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    #[serde(default)]
    pub item_name: String,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_quantity_sold: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingReport {
    #[serde(default)]
    pub top_products: Vec<TopSellingItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub out_of_stock: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub low_stock: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockAvailabilityReport {
    #[serde(default)]
    pub summary: Option<StockSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirySummary {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub expiring_items: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpiryWastageReport {
    #[serde(default)]
    pub summary: Option<ExpirySummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EodSummary {
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_units: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_value: Decimal,
}

/// Fechamento de estoque do dia (eod-closing-stock).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EodClosingStock {
    #[serde(default)]
    pub summary: Option<EodSummary>,
    #[serde(default)]
    pub no_data_for_date: bool,
    #[serde(default)]
    pub is_future_date: bool,
}
