//! Dashboard figures: headline metrics, the sales trend, recent orders and
//! progress towards the monthly target.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::money::{self, Money};
use crate::orders::Order;
use crate::serde_helpers::{lenient_f64_vec, lenient_i64, null_as_default};
use crate::{DEFAULT_MONTHLY_TARGET, WALK_IN_CUSTOMER};

/// Number of points kept from the backend's sales series.
pub const TREND_POINTS: usize = 7;

/// Number of recent orders shown.
pub const RECENT_ORDERS: usize = 5;

/// `metrics` block of `GET /sales-data`. Missing or null values read as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMetrics {
    #[serde(default, with = "money::major_units")]
    pub total_sales: Money,
    #[serde(default, with = "money::major_units")]
    pub current_month_sales: Money,
    #[serde(default, with = "money::major_units")]
    pub monthly_target: Money,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub products_count: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub orders_count: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub customers_count: i64,
}

/// `GET /sales-data` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesData {
    #[serde(default)]
    pub metrics: Option<RawMetrics>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_f64_vec")]
    pub sales: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_sales: Money,
    pub current_month_sales: Money,
    pub monthly_target: Money,
    pub products_count: i64,
    pub orders_count: i64,
    pub customers_count: i64,
}

impl Metrics {
    /// Applies defaults; a zero target falls back to `fallback_target`.
    pub fn from_raw(raw: Option<RawMetrics>, fallback_target: Money) -> Self {
        let raw = raw.unwrap_or_default();
        Metrics {
            total_sales: raw.total_sales,
            current_month_sales: raw.current_month_sales,
            monthly_target: if raw.monthly_target.is_zero() {
                fallback_target
            } else {
                raw.monthly_target
            },
            products_count: raw.products_count,
            orders_count: raw.orders_count,
            customers_count: raw.customers_count,
        }
    }

    /// Percent of the monthly target reached, capped at 100.
    pub fn target_progress(&self) -> f64 {
        if self.monthly_target.is_zero() {
            return 0.0;
        }
        let pct = self.current_month_sales.cents() as f64 / self.monthly_target.cents() as f64
            * 100.0;
        pct.min(100.0)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics::from_raw(None, Money::from_major(DEFAULT_MONTHLY_TARGET))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// The last `points` label/value pairs of the sales series.
///
/// Both series are trimmed independently, then paired.
pub fn sales_trend(labels: &[String], sales: &[f64], points: usize) -> Vec<TrendPoint> {
    let labels = &labels[labels.len().saturating_sub(points)..];
    let sales = &sales[sales.len().saturating_sub(points)..];
    labels
        .iter()
        .zip(sales)
        .map(|(label, value)| TrendPoint {
            label: label.clone(),
            value: *value,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentOrder {
    pub sale_id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub total_price: Money,
    pub payment_type: String,
    pub sale_date: Option<DateTime<Utc>>,
}

/// First occurrence per `sale_id`, newest first, top `limit`.
pub fn recent_orders(orders: &[Order], limit: usize) -> Vec<RecentOrder> {
    let mut seen = HashSet::new();
    let mut recent: Vec<RecentOrder> = orders
        .iter()
        .filter(|o| seen.insert(o.sale_id))
        .map(|o| RecentOrder {
            sale_id: o.sale_id,
            order_number: o.order_number.clone(),
            customer_name: match o.customer_name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => WALK_IN_CUSTOMER.to_string(),
            },
            total_price: o.total_price,
            payment_type: o.payment_label().to_string(),
            sale_date: o.sale_date,
        })
        .collect();

    recent.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    recent.truncate(limit);
    recent
}

/// Everything the dashboard shows, built from one `sales-data` and one
/// `get-orders` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub metrics: Metrics,
    pub trend: Vec<TrendPoint>,
    pub recent: Vec<RecentOrder>,
}

impl Dashboard {
    pub fn build(
        data: SalesData,
        orders: &[Order],
        fallback_target: Money,
        trend_points: usize,
        recent_limit: usize,
    ) -> Self {
        Dashboard {
            trend: sales_trend(&data.labels, &data.sales, trend_points),
            metrics: Metrics::from_raw(data.metrics, fallback_target),
            recent: recent_orders(orders, recent_limit),
        }
    }
}

/// `Ksh.12,345`: whole units with thousands separators.
pub fn format_currency(amount: Money) -> String {
    format!("{}.{}", crate::CURRENCY_LABEL, amount.format_whole_grouped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serde_helpers::parse_datetime;
    use crate::types::{OrderStatus, PaymentType};

    fn order(id: i64, customer: Option<&str>, date: &str) -> Order {
        Order {
            sale_id: id,
            order_number: format!("ORD-{id}"),
            customer_name: customer.map(str::to_string),
            customer_id: None,
            total_price: Money::from_major(id * 10),
            payment_type: None,
            sale_date: parse_datetime(date),
            profit: None,
            status: OrderStatus::Completed,
            vat: Money::zero(),
            discount: Money::zero(),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_metrics_defaults() {
        let raw: SalesData = serde_json::from_str(
            r#"{"metrics": {"total_sales": "5000.5", "monthly_target": 0, "orders_count": null}}"#,
        )
        .unwrap();
        let m = Metrics::from_raw(raw.metrics, Money::from_major(125_000));

        assert_eq!(m.total_sales, Money::from_cents(500_050));
        assert_eq!(m.monthly_target, Money::from_major(125_000));
        assert_eq!(m.orders_count, 0);
        assert_eq!(Metrics::default().monthly_target, Money::from_major(125_000));
    }

    #[test]
    fn test_sales_series_with_string_amounts() {
        let data: SalesData = serde_json::from_str(
            r#"{"metrics": {"total_sales": "1500.00"}, "labels": ["Mon", "Tue"], "sales": ["1500.00", 20]}"#,
        )
        .unwrap();
        assert_eq!(data.sales, vec![1500.0, 20.0]);

        let trend = sales_trend(&data.labels, &data.sales, TREND_POINTS);
        assert_eq!(trend[0].label, "Mon");
        assert_eq!(trend[0].value, 1500.0);
    }

    #[test]
    fn test_target_progress_is_capped() {
        let mut m = Metrics::default();
        m.current_month_sales = Money::from_major(62_500);
        assert!((m.target_progress() - 50.0).abs() < f64::EPSILON);

        m.current_month_sales = Money::from_major(500_000);
        assert_eq!(m.target_progress(), 100.0);
    }

    #[test]
    fn test_trend_keeps_last_points() {
        let labels: Vec<String> = (1..=10).map(|d| format!("Oct {d}")).collect();
        let sales: Vec<f64> = (1..=10).map(f64::from).collect();
        let trend = sales_trend(&labels, &sales, 7);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].label, "Oct 4");
        assert_eq!(trend[6].value, 10.0);
        assert!(sales_trend(&[], &[], 7).is_empty());
    }

    #[test]
    fn test_recent_orders_dedup_and_defaults() {
        let mut orders = vec![
            order(1, Some("Amina"), "2024-10-01 09:00:00"),
            order(2, None, "2024-10-03 09:00:00"),
            order(1, Some("Duplicate"), "2024-10-09 09:00:00"),
        ];
        orders[0].payment_type = Some(PaymentType::Cash);

        let recent = recent_orders(&orders, 5);

        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].sale_id, 2);
        assert_eq!(recent[0].customer_name, "Walk-in");
        assert_eq!(recent[0].payment_type, "Unknown");
        assert_eq!(recent[1].customer_name, "Amina");
        assert_eq!(recent[1].payment_type, "Cash");
    }

    #[test]
    fn test_recent_orders_limit() {
        let orders: Vec<Order> = (1..=8)
            .map(|i| order(i, None, &format!("2024-10-0{i} 09:00:00")))
            .collect();
        let ids: Vec<i64> = recent_orders(&orders, 5).iter().map(|o| o.sale_id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_cents(1_234_550)), "Ksh.12,346");
        assert_eq!(format_currency(Money::zero()), "Ksh.0");
    }
}
