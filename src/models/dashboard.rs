// src/models/dashboard.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Cards do Topo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiCards {
    pub todays_orders: u64,
    pub todays_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub on_time_delivery: Decimal, // Percentual (0-100)
    pub cancelled_orders: u64,
    pub warehouse_status: WarehouseStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStatus {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
}

// 2. Operação de Pedidos (histograma por status)
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderOperations {
    pub pending: u64,
    pub confirmed: u64,
    pub packing: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
    // Status que não conhecemos
    pub other: u64,
}

impl OrderOperations {
    pub fn total(&self) -> u64 {
        self.pending + self.confirmed + self.packing + self.shipped + self.delivered + self.cancelled + self.other
    }
}

// 3. Insights do Dia
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyInsights {
    pub top_categories: Vec<CategoryInsight>,
    pub top_items: Vec<ItemInsight>,
    pub peak_hours: Vec<PeakHour>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInsight {
    pub name: String,
    // O inventory-service ainda não agrega vendas por categoria
    pub sales: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemInsight {
    pub name: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeakHour {
    pub hour: u32,
    pub orders: u64,
}

// 4. Entregas
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPerformance {
    pub avg_delivery_time: Decimal, // minutos
    pub active_riders: u64,
    pub total_deliveries: u64,
    pub failed_attempts: Decimal,
}

// 5. Pagamentos & Financeiro
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFinance {
    pub payment_split: PaymentSplit,
    /// Estimativa: média do ticket de cada método COD x pedidos pendentes.
    /// Não é um valor de razão contábil.
    #[serde(rename = "pendingCOD")]
    pub pending_cod: Decimal,
    pub failed_payments: u64,
    pub refunds_pending: u64,
    pub monthly_data: Vec<MonthlyBucket>,
    pub payment_methods: Vec<PaymentMethodBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSplit {
    pub cod: Decimal,
    pub prepaid: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub period: String, // YYYY-MM
    pub month: String,
    pub year: i32,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub orders: u64,
    pub tax: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodBucket {
    pub method: String,
    pub total_amount: Decimal,
    pub total_orders: u64,
    pub paid: u64,
    pub pending: u64,
    pub failed: u64,
}

// 6. Alertas de Estoque
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseAlerts {
    pub out_of_stock: u64,
    pub low_stock_alerts: u64,
    pub expiring_items: u64,
    pub inventory_mismatch: u64,
}

// 7. Fechamento do Dia
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EodClosing {
    pub daily_throughput: Decimal,
    pub total_cash: Decimal,
    pub ready_to_close: bool,
}

// --- Saúde de cada fonte ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    #[default]
    Ok,
    Degraded,
}

/// Diz se um bloco do relatório veio completo ou se alguma chamada
/// upstream falhou e foi substituída por zero/vazio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceHealth {
    pub status: SourceStatus,
    pub errors: Vec<String>,
}

impl SourceHealth {
    pub fn is_degraded(&self) -> bool {
        self.status == SourceStatus::Degraded
    }

    pub(crate) fn record_failure(&mut self, error: String) {
        self.status = SourceStatus::Degraded;
        self.errors.push(error);
    }
}

// O relatório completo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub kpi_cards: KpiCards,
    pub order_operations: OrderOperations,
    pub daily_insights: DailyInsights,
    pub delivery_performance: DeliveryPerformance,
    pub payment_finance: PaymentFinance,
    pub warehouse_alerts: WarehouseAlerts,
    pub eod_closing: EodClosing,
    // Chave = nome do fetcher (ex: "paymentFinance")
    pub sources: BTreeMap<String, SourceHealth>,
}
