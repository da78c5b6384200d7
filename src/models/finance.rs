// src/models/finance.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal_or_zero;

/// Uma venda do finance-service. Somente leitura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    // Competência contábil (YYYY-MM). Quando ausente, deriva de `sale_date`.
    #[serde(default)]
    pub accounting_period: Option<String>,

    #[serde(default)]
    pub sale_date: String,

    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub tax: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub discount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub coupon_discount: Decimal,

    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}
