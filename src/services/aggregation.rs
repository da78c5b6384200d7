// src/services/aggregation.rs
//
// Redutores puros do dashboard: recebem os registros crus e devolvem
// os formatos agregados. Nenhum I/O aqui.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;

use crate::models::dashboard::{
    MonthlyBucket, OrderOperations, PaymentFinance, PaymentMethodBucket, PaymentSplit,
    WarehouseStatus,
};
use crate::models::finance::SaleRecord;
use crate::models::inventory::Warehouse;
use crate::models::orders::{OrderRecord, OrderStatus};

const UNKNOWN: &str = "unknown";
const COD_METHODS: [&str; 2] = ["cash", "cod"];

/// Soma `value` de todos os registros que passam em `predicate`.
pub fn sum_by<T>(
    records: &[T],
    value: impl Fn(&T) -> Decimal,
    predicate: impl Fn(&T) -> bool,
) -> Decimal {
    records.iter().filter(|r| predicate(*r)).map(value).sum()
}

pub fn total_revenue(orders: &[OrderRecord]) -> Decimal {
    sum_by(orders, |o| o.total, |_| true)
}

/// Ticket médio. Zero quando não há pedidos.
pub fn average_order_value(orders: &[OrderRecord]) -> Decimal {
    if orders.is_empty() {
        return Decimal::ZERO;
    }
    total_revenue(orders) / Decimal::from(orders.len())
}

pub fn count_by_status(orders: &[OrderRecord]) -> OrderOperations {
    orders.iter().fold(OrderOperations::default(), |mut ops, order| {
        match order.status {
            OrderStatus::Pending => ops.pending += 1,
            OrderStatus::Confirmed => ops.confirmed += 1,
            OrderStatus::Packing => ops.packing += 1,
            OrderStatus::Shipped => ops.shipped += 1,
            OrderStatus::Delivered => ops.delivered += 1,
            OrderStatus::Cancelled => ops.cancelled += 1,
            OrderStatus::Other => ops.other += 1,
        }
        ops
    })
}

pub fn warehouse_status(warehouses: &[Warehouse]) -> WarehouseStatus {
    WarehouseStatus {
        total: warehouses.len() as u64,
        online: warehouses.iter().filter(|w| w.status == "active").count() as u64,
        offline: warehouses.iter().filter(|w| w.status == "inactive").count() as u64,
    }
}

// ---
// Financeiro
// ---

/// Competência da venda: `accounting_period` se vier preenchido,
/// senão o ano-mês de `sale_date`. Datas ilegíveis caem em "unknown".
fn period_of(sale: &SaleRecord) -> String {
    if let Some(period) = sale.accounting_period.as_deref().filter(|p| !p.is_empty()) {
        return period.to_string();
    }
    parse_sale_date(&sale.sale_date)
        .map(|date| date.format("%Y-%m").to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn empty_month(period: &str) -> MonthlyBucket {
    let mut parts = period.splitn(2, '-');
    let year = parts.next().and_then(|y| y.parse().ok()).unwrap_or(0);
    let month = parts.next().unwrap_or_default().to_string();
    MonthlyBucket {
        period: period.to_string(),
        month,
        year,
        ..Default::default()
    }
}

/// Agrupa as vendas por competência, em ordem crescente de período.
pub fn group_by_period(sales: &[SaleRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

    for sale in sales {
        let period = period_of(sale);
        let bucket = buckets
            .entry(period)
            .or_insert_with_key(|p| empty_month(p));

        bucket.revenue += sale.total;
        bucket.orders += 1;
        bucket.tax += sale.tax;
        bucket.discount += sale.discount + sale.coupon_discount;
    }

    buckets.into_values().collect()
}

/// Agrupa as vendas por método de pagamento (ordenado pelo nome do método).
pub fn group_by_payment_method(sales: &[SaleRecord]) -> Vec<PaymentMethodBucket> {
    let mut buckets: BTreeMap<&str, PaymentMethodBucket> = BTreeMap::new();

    for sale in sales {
        let method = sale.payment_method.as_deref().unwrap_or(UNKNOWN);
        let status = sale.payment_status.as_deref().unwrap_or(UNKNOWN);

        let bucket = buckets.entry(method).or_insert_with(|| PaymentMethodBucket {
            method: method.to_string(),
            ..Default::default()
        });

        bucket.total_amount += sale.total;
        bucket.total_orders += 1;

        // Outros status (incluindo "unknown") só contam no total
        match status {
            "paid" | "completed" => bucket.paid += 1,
            "pending" => bucket.pending += 1,
            "failed" => bucket.failed += 1,
            _ => {}
        }
    }

    buckets.into_values().collect()
}

pub fn is_cod(method: &str) -> bool {
    COD_METHODS.iter().any(|cod| method.eq_ignore_ascii_case(cod))
}

fn percentage(part: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)
}

/// Percentual de pedidos COD x pré-pagos. Ambos zero sem pedidos.
pub fn payment_split(methods: &[PaymentMethodBucket]) -> PaymentSplit {
    let total: u64 = methods.iter().map(|m| m.total_orders).sum();
    let cod: u64 = methods
        .iter()
        .filter(|m| is_cod(&m.method))
        .map(|m| m.total_orders)
        .sum();

    PaymentSplit {
        cod: percentage(cod, total),
        prepaid: percentage(total - cod, total),
    }
}

/// Estimativa do valor COD ainda não recebido: para cada método COD,
/// ticket médio do método x quantidade de pendentes.
/// É uma aproximação, não o saldo real de cada pedido.
pub fn pending_cod_estimate(methods: &[PaymentMethodBucket]) -> Decimal {
    methods
        .iter()
        .filter(|m| is_cod(&m.method) && m.pending > 0 && m.total_orders > 0)
        .map(|m| m.total_amount / Decimal::from(m.total_orders) * Decimal::from(m.pending))
        .sum()
}

pub fn failed_payments(methods: &[PaymentMethodBucket]) -> u64 {
    methods.iter().map(|m| m.failed).sum()
}

/// Monta o bloco de Pagamentos & Financeiro a partir das vendas do período.
pub fn summarize_payments(sales: &[SaleRecord]) -> PaymentFinance {
    if sales.is_empty() {
        return PaymentFinance::default();
    }

    let monthly_data = group_by_period(sales);
    let payment_methods = group_by_payment_method(sales);

    PaymentFinance {
        payment_split: payment_split(&payment_methods),
        pending_cod: pending_cod_estimate(&payment_methods),
        failed_payments: failed_payments(&payment_methods),
        // Ainda não há rastreio de estornos no finance-service
        refunds_pending: 0,
        monthly_data,
        payment_methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(total: i64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            total: Decimal::from(total),
            status,
            ..Default::default()
        }
    }

    fn sale(total: i64, method: Option<&str>, status: Option<&str>) -> SaleRecord {
        SaleRecord {
            sale_date: "2026-10-05T14:30:00Z".to_string(),
            total: Decimal::from(total),
            payment_method: method.map(str::to_string),
            payment_status: status.map(str::to_string),
            ..Default::default()
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn revenue_and_average() {
        let orders = vec![
            order(100, OrderStatus::Delivered),
            order(50, OrderStatus::Pending),
            order(30, OrderStatus::Cancelled),
        ];
        assert_eq!(total_revenue(&orders), Decimal::from(180));
        assert_eq!(average_order_value(&orders), Decimal::from(60));
        assert_eq!(
            sum_by(&orders, |o| o.total, |o| o.status == OrderStatus::Cancelled),
            Decimal::from(30)
        );
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_order_value(&[]), Decimal::ZERO);
    }

    #[test]
    fn status_histogram_accounts_for_every_order() {
        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Packing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Other,
            OrderStatus::Other,
        ];
        let orders: Vec<_> = statuses.iter().map(|s| order(10, *s)).collect();
        let ops = count_by_status(&orders);

        assert_eq!(ops.pending, 2);
        assert_eq!(ops.other, 2);
        assert_eq!(ops.total(), orders.len() as u64);
    }

    #[test]
    fn warehouses_split_by_status() {
        let warehouses: Vec<Warehouse> = ["active", "active", "inactive", "maintenance"]
            .iter()
            .map(|s| Warehouse { status: s.to_string() })
            .collect();
        let status = warehouse_status(&warehouses);
        assert_eq!(status, WarehouseStatus { total: 4, online: 2, offline: 1 });
    }

    #[test]
    fn period_prefers_accounting_period() {
        let mut with_period = sale(10, None, None);
        with_period.accounting_period = Some("2026-09".into());
        let mut blank_period = sale(10, None, None);
        blank_period.accounting_period = Some(String::new());
        let mut plain_date = sale(10, None, None);
        plain_date.sale_date = "2025-12-31".into();
        let mut garbage = sale(10, None, None);
        garbage.sale_date = "ontem".into();

        assert_eq!(period_of(&with_period), "2026-09");
        assert_eq!(period_of(&blank_period), "2026-10");
        assert_eq!(period_of(&plain_date), "2025-12");
        assert_eq!(period_of(&garbage), "unknown");
    }

    #[test]
    fn monthly_buckets_accumulate_and_sort() {
        let mut sep = sale(200, None, None);
        sep.accounting_period = Some("2026-09".into());
        sep.tax = dec("20.5");
        sep.discount = dec("5");
        sep.coupon_discount = dec("2.5");
        let oct_a = sale(100, None, None);
        let oct_b = sale(50, None, None);

        let buckets = group_by_period(&[oct_a, sep, oct_b]);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, "2026-09");
        assert_eq!(buckets[0].year, 2026);
        assert_eq!(buckets[0].month, "09");
        assert_eq!(buckets[0].tax, dec("20.5"));
        assert_eq!(buckets[0].discount, dec("7.5"));
        assert_eq!(buckets[1].period, "2026-10");
        assert_eq!(buckets[1].revenue, Decimal::from(150));
        assert_eq!(buckets[1].orders, 2);
        assert_eq!(buckets[1].expenses, Decimal::ZERO);
    }

    #[test]
    fn period_grouping_ignores_record_order() {
        let mut sales = Vec::new();
        for (i, period) in ["2026-08", "2026-09", "2026-10", "2026-09", "2026-08"].iter().enumerate() {
            let mut s = sale(10 * (i as i64 + 1), None, None);
            s.accounting_period = Some(period.to_string());
            s.tax = dec("1.1") * Decimal::from(i);
            s.coupon_discount = dec("0.3");
            sales.push(s);
        }

        let expected = group_by_period(&sales);
        let mut reversed = sales.clone();
        reversed.reverse();
        let mut rotated = sales.clone();
        rotated.rotate_left(2);

        assert_eq!(group_by_period(&reversed), expected);
        assert_eq!(group_by_period(&rotated), expected);
    }

    #[test]
    fn payment_methods_default_to_unknown() {
        let sales = vec![
            sale(10, None, None),
            sale(20, Some("card"), Some("completed")),
            sale(30, Some("card"), Some("failed")),
            sale(40, Some("card"), Some("refunded")),
        ];
        let buckets = group_by_payment_method(&sales);

        assert_eq!(buckets.len(), 2);
        let card = &buckets[0];
        assert_eq!(card.method, "card");
        assert_eq!(card.total_orders, 3);
        assert_eq!(card.paid, 1);
        assert_eq!(card.failed, 1);
        assert_eq!(card.pending, 0);
        assert_eq!(card.total_amount, Decimal::from(90));
        assert_eq!(buckets[1].method, "unknown");
        assert_eq!(buckets[1].total_orders, 1);
    }

    #[test]
    fn cod_matching_is_case_insensitive() {
        assert!(is_cod("Cash"));
        assert!(is_cod("COD"));
        assert!(!is_cod("cash-card"));
        assert!(!is_cod("pix"));
    }

    #[test]
    fn split_sums_to_one_hundred() {
        let sales = vec![
            sale(10, Some("cash"), Some("paid")),
            sale(10, Some("card"), Some("paid")),
            sale(10, Some("pix"), Some("paid")),
        ];
        let split = payment_split(&group_by_payment_method(&sales));
        let diff = (split.cod + split.prepaid - Decimal::ONE_HUNDRED).abs();
        assert!(diff < dec("0.000001"), "{split:?}");
        assert!(split.cod > dec("33.33") && split.cod < dec("33.34"));
    }

    #[test]
    fn split_without_orders_is_zero() {
        let split = payment_split(&[]);
        assert_eq!(split, PaymentSplit::default());
    }

    #[test]
    fn cash_and_card_scenario() {
        let sales = vec![
            sale(100, Some("cash"), Some("pending")),
            sale(50, Some("card"), Some("paid")),
        ];
        let finance = summarize_payments(&sales);

        assert_eq!(finance.payment_split.cod, Decimal::from(50));
        assert_eq!(finance.payment_split.prepaid, Decimal::from(50));
        assert_eq!(finance.pending_cod, Decimal::from(100));
        assert_eq!(finance.failed_payments, 0);
        assert_eq!(finance.refunds_pending, 0);
        assert_eq!(finance.monthly_data.len(), 1);
        assert_eq!(finance.monthly_data[0].revenue, Decimal::from(150));
    }

    #[test]
    fn pending_cod_uses_bucket_average() {
        let sales = vec![
            sale(100, Some("cod"), Some("pending")),
            sale(300, Some("cod"), Some("paid")),
            sale(80, Some("card"), Some("pending")),
        ];
        let methods = group_by_payment_method(&sales);
        // média 200 x 1 pendente; o cartão pendente não entra
        assert_eq!(pending_cod_estimate(&methods), Decimal::from(200));
    }

    #[test]
    fn no_sales_means_zeroed_finance() {
        assert_eq!(summarize_payments(&[]), PaymentFinance::default());
    }
}
