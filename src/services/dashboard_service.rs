// src/services/dashboard_service.rs

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use futures::FutureExt;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::{
    common::{
        date_range::{DefaultRange, RangeRequest},
        error::AppError,
    },
    models::{
        dashboard::{
            CategoryInsight, DailyInsights, DashboardReport, DeliveryPerformance, EodClosing,
            ItemInsight, KpiCards, OrderOperations, PaymentFinance, SourceHealth, WarehouseAlerts,
            WarehouseStatus,
        },
        orders::{OrderRecord, OrderStatus},
    },
    services::aggregation,
    upstream::{DeliveryApi, FinanceApi, InventoryApi, OrderQuery, OrdersApi, UpstreamError},
};

const TOP_CATEGORIES: usize = 5;
const TOP_ITEMS: u32 = 5;
const TOP_ITEMS_LOOKBACK_DAYS: u64 = 7;
const SALES_PAGE_LIMIT: u32 = 10_000;
const EXPIRY_DAYS_AHEAD: u32 = 30;

// Nome de cada fetcher no mapa `sources` do relatório
pub const TODAYS_ORDERS: &str = "todaysOrders";
pub const TODAYS_REVENUE: &str = "todaysRevenue";
pub const AVG_ORDER_VALUE: &str = "avgOrderValue";
pub const ON_TIME_DELIVERY: &str = "onTimeDelivery";
pub const CANCELLED_ORDERS: &str = "cancelledOrders";
pub const WAREHOUSE_STATUS: &str = "warehouseStatus";
pub const ORDER_OPERATIONS: &str = "orderOperations";
pub const DAILY_INSIGHTS: &str = "dailyInsights";
pub const DELIVERY_PERFORMANCE: &str = "deliveryPerformance";
pub const PAYMENT_FINANCE: &str = "paymentFinance";
pub const WAREHOUSE_ALERTS: &str = "warehouseAlerts";
pub const EOD_CLOSING: &str = "eodClosing";

/// O período pedido pelo cliente. `None` = padrão de cada métrica.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Resultado de um fetcher: o valor (zerado se a fonte falhou) + a saúde da fonte.
#[derive(Debug)]
struct Fetched<T> {
    source: &'static str,
    value: T,
    health: SourceHealth,
}

impl<T> Fetched<T> {
    fn new(source: &'static str, value: T, health: SourceHealth) -> Self {
        Self { source, value, health }
    }

    fn into_value(self, sources: &mut BTreeMap<String, SourceHealth>) -> T {
        sources.insert(self.source.to_string(), self.health);
        self.value
    }
}

impl SourceHealth {
    /// Engole a falha de uma chamada: loga, marca a fonte como degradada
    /// e devolve o valor vazio no lugar.
    fn absorb<T: Default>(&mut self, call: &str, result: Result<T, UpstreamError>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(call = %call, error = %e, "⚠️ Fonte upstream indisponível, usando valor vazio");
                self.record_failure(format!("{call}: {e}"));
                T::default()
            }
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    orders: Arc<dyn OrdersApi>,
    inventory: Arc<dyn InventoryApi>,
    finance: Arc<dyn FinanceApi>,
    delivery: Arc<dyn DeliveryApi>,
}

impl DashboardService {
    pub fn new(
        orders: Arc<dyn OrdersApi>,
        inventory: Arc<dyn InventoryApi>,
        finance: Arc<dyn FinanceApi>,
        delivery: Arc<dyn DeliveryApi>,
    ) -> Self {
        Self { orders, inventory, finance, delivery }
    }

    /// Único ponto de entrada do dashboard.
    /// "Hoje" é capturado uma vez aqui e vale para todas as métricas.
    pub async fn get_report(
        &self,
        query: ReportQuery,
        cancel: &CancellationToken,
    ) -> Result<DashboardReport, AppError> {
        let range = RangeRequest::new(query.start, query.end, Local::now().date_naive());
        self.report_for(range, cancel).await
    }

    pub(crate) async fn report_for(
        &self,
        range: RangeRequest,
        cancel: &CancellationToken,
    ) -> Result<DashboardReport, AppError> {
        // Todas as métricas em paralelo na mesma task; nenhuma depende da outra.
        let fan_out = async {
            tokio::join!(
                isolated(TODAYS_ORDERS, self.todays_orders(range)),
                isolated(TODAYS_REVENUE, self.todays_revenue(range)),
                isolated(AVG_ORDER_VALUE, self.avg_order_value(range)),
                isolated(ON_TIME_DELIVERY, self.on_time_delivery()),
                isolated(CANCELLED_ORDERS, self.cancelled_orders(range)),
                isolated(WAREHOUSE_STATUS, self.warehouse_status()),
                isolated(ORDER_OPERATIONS, self.order_operations(range)),
                isolated(DAILY_INSIGHTS, self.daily_insights(range)),
                isolated(DELIVERY_PERFORMANCE, self.delivery_performance()),
                isolated(PAYMENT_FINANCE, self.payment_finance(range)),
                isolated(WAREHOUSE_ALERTS, self.warehouse_alerts()),
                isolated(EOD_CLOSING, self.eod_closing(range)),
            )
        };

        // Panics de fetcher já foram absorvidos em `isolated`; aqui só sobra falha do próprio join
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("Relatório do dashboard cancelado antes de terminar");
                return Err(AppError::Cancelled);
            }
            result = AssertUnwindSafe(fan_out).catch_unwind() => {
                result.map_err(|panic| AppError::Orchestration(panic_message(panic)))?
            }
        };

        let (
            todays_orders,
            todays_revenue,
            avg_order_value,
            on_time_delivery,
            cancelled_orders,
            warehouse_status,
            order_operations,
            daily_insights,
            delivery_performance,
            payment_finance,
            warehouse_alerts,
            eod_closing,
        ) = joined;

        let mut sources = BTreeMap::new();
        let report = DashboardReport {
            kpi_cards: KpiCards {
                todays_orders: todays_orders.into_value(&mut sources),
                todays_revenue: todays_revenue.into_value(&mut sources),
                avg_order_value: avg_order_value.into_value(&mut sources),
                on_time_delivery: on_time_delivery.into_value(&mut sources),
                cancelled_orders: cancelled_orders.into_value(&mut sources),
                warehouse_status: warehouse_status.into_value(&mut sources),
            },
            order_operations: order_operations.into_value(&mut sources),
            daily_insights: daily_insights.into_value(&mut sources),
            delivery_performance: delivery_performance.into_value(&mut sources),
            payment_finance: payment_finance.into_value(&mut sources),
            warehouse_alerts: warehouse_alerts.into_value(&mut sources),
            eod_closing: eod_closing.into_value(&mut sources),
            sources,
        };

        let degraded = report.sources.values().filter(|h| h.is_degraded()).count();
        tracing::info!(
            start = ?range.start,
            end = ?range.end,
            degraded_sources = degraded,
            "📊 Dashboard montado"
        );

        Ok(report)
    }

    // =========================================================================
    //  Fetchers
    // =========================================================================

    // POS + online, cada chamada falhando de forma independente
    async fn fetch_orders(
        &self,
        range: RangeRequest,
        status: Option<OrderStatus>,
        health: &mut SourceHealth,
    ) -> Vec<OrderRecord> {
        let query = OrderQuery::new(range.resolve(DefaultRange::Today), status);
        let (pos, online) = tokio::join!(
            self.orders.list_pos_orders(&query),
            self.orders.list_online_orders(&query),
        );

        let mut orders = health.absorb("pos orders", pos);
        orders.extend(health.absorb("online orders", online));
        orders
    }

    async fn todays_orders(&self, range: RangeRequest) -> Fetched<u64> {
        let mut health = SourceHealth::default();
        let orders = self.fetch_orders(range, None, &mut health).await;
        Fetched::new(TODAYS_ORDERS, orders.len() as u64, health)
    }

    async fn todays_revenue(&self, range: RangeRequest) -> Fetched<Decimal> {
        let mut health = SourceHealth::default();
        let orders = self.fetch_orders(range, None, &mut health).await;
        Fetched::new(TODAYS_REVENUE, aggregation::total_revenue(&orders), health)
    }

    async fn avg_order_value(&self, range: RangeRequest) -> Fetched<Decimal> {
        let mut health = SourceHealth::default();
        let orders = self.fetch_orders(range, None, &mut health).await;
        Fetched::new(AVG_ORDER_VALUE, aggregation::average_order_value(&orders), health)
    }

    async fn on_time_delivery(&self) -> Fetched<Decimal> {
        let mut health = SourceHealth::default();
        let rate = health.absorb("on-time delivery", self.delivery.on_time_rate().await);
        Fetched::new(ON_TIME_DELIVERY, rate, health)
    }

    // O filtro por status é feito no próprio upstream
    async fn cancelled_orders(&self, range: RangeRequest) -> Fetched<u64> {
        let mut health = SourceHealth::default();
        let orders = self
            .fetch_orders(range, Some(OrderStatus::Cancelled), &mut health)
            .await;
        Fetched::new(CANCELLED_ORDERS, orders.len() as u64, health)
    }

    async fn warehouse_status(&self) -> Fetched<WarehouseStatus> {
        let mut health = SourceHealth::default();
        let warehouses = health.absorb("warehouses", self.inventory.list_warehouses().await);
        Fetched::new(WAREHOUSE_STATUS, aggregation::warehouse_status(&warehouses), health)
    }

    async fn order_operations(&self, range: RangeRequest) -> Fetched<OrderOperations> {
        let mut health = SourceHealth::default();
        let orders = self.fetch_orders(range, None, &mut health).await;
        Fetched::new(ORDER_OPERATIONS, aggregation::count_by_status(&orders), health)
    }

    async fn daily_insights(&self, range: RangeRequest) -> Fetched<DailyInsights> {
        let mut health = SourceHealth::default();
        let window = range.resolve(DefaultRange::TrailingDays(TOP_ITEMS_LOOKBACK_DAYS));

        let (categories, top_selling) = tokio::join!(
            self.inventory.list_active_categories(),
            self.inventory.top_selling(window, TOP_ITEMS),
        );
        let categories = health.absorb("categories", categories);
        let top_selling = health.absorb("top-selling", top_selling);

        // Vendas/receita por categoria e por item ainda não existem nos relatórios do estoque
        let insights = DailyInsights {
            top_categories: categories
                .into_iter()
                .take(TOP_CATEGORIES)
                .map(|c| CategoryInsight { name: c.name, sales: 0, revenue: Decimal::ZERO })
                .collect(),
            top_items: top_selling
                .top_products
                .into_iter()
                .map(|i| ItemInsight {
                    name: i.item_name,
                    quantity: i.total_quantity_sold,
                    revenue: Decimal::ZERO,
                })
                .collect(),
            peak_hours: Vec::new(),
        };
        Fetched::new(DAILY_INSIGHTS, insights, health)
    }

    async fn delivery_performance(&self) -> Fetched<DeliveryPerformance> {
        let mut health = SourceHealth::default();
        let performance = health.absorb("delivery performance", self.delivery.performance().await);
        Fetched::new(DELIVERY_PERFORMANCE, performance, health)
    }

    async fn payment_finance(&self, range: RangeRequest) -> Fetched<PaymentFinance> {
        let mut health = SourceHealth::default();
        let window = range.resolve(DefaultRange::MonthToDate);
        let sales = health.absorb("sales", self.finance.list_sales(window, SALES_PAGE_LIMIT).await);

        if sales.is_empty() {
            tracing::warn!(
                start = %window.start(),
                end = %window.end(),
                "Nenhuma venda no período para o bloco financeiro"
            );
        }

        let finance = aggregation::summarize_payments(&sales);
        tracing::debug!(
            sales = sales.len(),
            months = finance.monthly_data.len(),
            methods = finance.payment_methods.len(),
            pending_cod = %finance.pending_cod,
            failed_payments = finance.failed_payments,
            "Financeiro agregado"
        );
        Fetched::new(PAYMENT_FINANCE, finance, health)
    }

    async fn warehouse_alerts(&self) -> Fetched<WarehouseAlerts> {
        let mut health = SourceHealth::default();
        let (stock, expiry) = tokio::join!(
            self.inventory.stock_availability(),
            self.inventory.expiry_wastage(EXPIRY_DAYS_AHEAD),
        );
        let stock = health.absorb("stock availability", stock).summary.unwrap_or_default();
        let expiry = health.absorb("expiry wastage", expiry).summary.unwrap_or_default();

        let alerts = WarehouseAlerts {
            out_of_stock: stock.out_of_stock,
            low_stock_alerts: stock.low_stock,
            expiring_items: expiry.expiring_items,
            // Depende de dados de auditoria que ainda não existem
            inventory_mismatch: 0,
        };
        Fetched::new(WAREHOUSE_ALERTS, alerts, health)
    }

    async fn eod_closing(&self, range: RangeRequest) -> Fetched<EodClosing> {
        let mut health = SourceHealth::default();
        let result = self.inventory.eod_closing_stock(range.closing_date()).await;

        // Sem resposta do estoque não dá para fechar o dia
        let closing = match result {
            Ok(eod) => {
                let summary = eod.summary.unwrap_or_default();
                EodClosing {
                    daily_throughput: summary.total_units,
                    total_cash: summary.total_value,
                    ready_to_close: !eod.no_data_for_date && !eod.is_future_date,
                }
            }
            Err(e) => health.absorb::<EodClosing>("eod closing stock", Err(e)),
        };
        Fetched::new(EOD_CLOSING, closing, health)
    }
}

/// Roda um fetcher e transforma um panic dentro dele (ex.: overflow de `Decimal`
/// num redutor) em valor vazio + fonte degradada. As outras fontes seguem intactas.
async fn isolated<T: Default>(
    source: &'static str,
    fetch: impl Future<Output = Fetched<T>>,
) -> Fetched<T> {
    match AssertUnwindSafe(fetch).catch_unwind().await {
        Ok(fetched) => fetched,
        Err(panic) => {
            let message = panic_message(panic);
            tracing::error!(source = %source, panic = %message, "💥 Fetcher entrou em panic, usando valor vazio");

            let mut health = SourceHealth::default();
            health.record_failure(format!("panic: {message}"));
            Fetched::new(source, T::default(), health)
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic sem mensagem".to_string())
}
