// src/models/orders.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::decimal_or_zero;

// --- Enums ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Packing,
    Shipped,
    Delivered,
    Cancelled,
    // Qualquer status que o serviço de pedidos invente no futuro
    #[default]
    #[serde(other)]
    Other,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Packing => "packing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pos,
    Online,
    #[serde(other)]
    Other,
}

// --- Structs ---

/// Um pedido como vem do order-service (POS ou online). Somente leitura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total: Decimal,

    // Só `orderStatus` conta; um `status` solto no registro é outra coisa
    #[serde(default, rename = "orderStatus")]
    pub status: OrderStatus,

    #[serde(default)]
    pub order_type: Option<OrderType>,

    #[serde(default)]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub payment_status: Option<String>,
}
