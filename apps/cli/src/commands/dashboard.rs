//! `dashboard`.

use peakers_core::dashboard::{format_currency, Dashboard};
use peakers_core::Money;
use std::fmt::Write as _;
use tracing::debug;

use crate::error::{CliResult, Notice};
use crate::state::AppState;

pub async fn show(state: &AppState) -> CliResult<()> {
    debug!("dashboard");
    let dashboard = state
        .api
        .dashboard(&state.config)
        .await
        .map_err(|e| Notice::from_client(e, "Failed to load dashboard data"))?;
    println!("{}", render(&dashboard));
    Ok(())
}

pub fn render(dashboard: &Dashboard) -> String {
    let m = &dashboard.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Total sales:     {}", format_currency(m.total_sales));
    let _ = writeln!(
        out,
        "This month:      {} of {} ({:.0}%)",
        format_currency(m.current_month_sales),
        format_currency(m.monthly_target),
        m.target_progress()
    );
    let _ = writeln!(
        out,
        "Products {}  Orders {}  Customers {}",
        m.products_count, m.orders_count, m.customers_count
    );

    let _ = writeln!(out, "\nSales trend:");
    for point in &dashboard.trend {
        let value = Money::from_major_f64(point.value).unwrap_or_default();
        let _ = writeln!(out, "  {:<12} {}", point.label, format_currency(value));
    }

    let _ = write!(out, "\nRecent orders:");
    for order in &dashboard.recent {
        let date = order
            .sale_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        let _ = write!(
            out,
            "\n  {:<12} {:<20} {:>12}  {:<10} {}",
            order.order_number,
            order.customer_name,
            format_currency(order.total_price),
            order.payment_type,
            date
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakers_core::dashboard::{Metrics, RecentOrder, TrendPoint};

    #[test]
    fn test_render_dashboard() {
        let dashboard = Dashboard {
            metrics: Metrics {
                current_month_sales: Money::from_major(62_500),
                ..Metrics::default()
            },
            trend: vec![TrendPoint {
                label: "Mon".to_string(),
                value: 12_345.6,
            }],
            recent: vec![RecentOrder {
                sale_id: 1,
                order_number: "ORD-1".to_string(),
                customer_name: "Walk-in".to_string(),
                total_price: Money::from_major(350),
                payment_type: "Unknown".to_string(),
                sale_date: None,
            }],
        };
        let text = render(&dashboard);
        assert!(text.contains("Ksh.62,500 of Ksh.125,000 (50%)"));
        assert!(text.contains("Ksh.12,346"));
        assert!(text.contains("Walk-in"));
    }
}
