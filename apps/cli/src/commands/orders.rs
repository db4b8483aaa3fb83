//! `orders` and `order-status`.

use chrono::{FixedOffset, Local};
use peakers_core::orders::{DateWindow, Order, OrderBook, OrderFilter};
use peakers_core::{OrderStatus, CURRENCY_LABEL};
use std::fmt::Write as _;
use tracing::debug;

use crate::error::{CliResult, Notice};
use crate::state::AppState;
use crate::OrdersArgs;

pub async fn list(state: &AppState, args: &OrdersArgs) -> CliResult<()> {
    debug!(?args, "orders");
    let orders = state
        .api
        .orders()
        .await
        .map_err(|e| Notice::from_client(e, "Failed to load orders"))?;

    let book = build_book(orders, args, *Local::now().offset())?;

    if let Some(sale_id) = args.show {
        let order = book
            .find(sale_id)
            .ok_or_else(|| Notice::error(format!("Order {sale_id} not found")))?;
        println!("{}", render_detail(order));
        return Ok(());
    }

    println!("{}", render_page(&book));
    Ok(())
}

/// Applies the command-line filter and paging to a fresh order book.
pub fn build_book(orders: Vec<Order>, args: &OrdersArgs, offset: FixedOffset) -> CliResult<OrderBook> {
    let window = match (args.from, args.to) {
        (Some(from), Some(to)) => Some(DateWindow::from_days(from, to, offset)?),
        _ => None,
    };

    let mut book = OrderBook::new(orders);
    book.set_rows_per_page(args.rows)?;
    book.apply_filter(OrderFilter {
        window,
        top_customers: args.top,
        payment_type: args.payment.clone(),
        status: args.status,
        search: args.search.clone(),
    });
    book.go_to(args.page);
    Ok(book)
}

pub fn render_page(book: &OrderBook) -> String {
    let mut out = String::new();
    for order in book.current_page() {
        let date = order
            .sale_date
            .map(|d| d.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>6}  {:<12} {:<20} {:>12}  {:<11} {:<9} {}",
            order.sale_id,
            order.order_number,
            order.customer_label(),
            order.total_price,
            order.payment_label(),
            order.status,
            date
        );
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} orders)",
        book.page(),
        book.total_pages().max(1),
        book.filtered().len()
    );
    let _ = write!(
        out,
        "Total sales: {CURRENCY_LABEL} {}  Total profit: {CURRENCY_LABEL} {}",
        book.total_sales(),
        book.total_profit()
    );
    out
}

pub fn render_detail(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {} ({})", order.order_number, order.status);
    let _ = writeln!(out, "Customer: {}", order.customer_label());
    let _ = writeln!(out, "Payment: {}", order.payment_label());
    for item in &order.items {
        let _ = writeln!(
            out,
            "  {} x {} @ {} = {}",
            item.quantity, item.product_name, item.product_price, item.subtotal
        );
    }
    let _ = writeln!(out, "Subtotal: {CURRENCY_LABEL} {}", order.subtotal());
    let _ = writeln!(out, "VAT: {CURRENCY_LABEL} {}", order.vat);
    let _ = writeln!(out, "Discount: {CURRENCY_LABEL} {}", order.discount);
    let _ = write!(out, "Total: {CURRENCY_LABEL} {}", order.total_price);
    out
}

pub async fn set_status(state: &AppState, sale_id: i64, status: OrderStatus) -> CliResult<()> {
    debug!(sale_id, %status, "order-status");
    state
        .api
        .update_order_status(sale_id, status)
        .await
        .map_err(|e| Notice::from_client(e, "Failed to update order status"))?;
    println!("Order {sale_id} marked {status}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use peakers_core::PaymentType;

    fn orders() -> Vec<Order> {
        serde_json::from_str(
            r#"[
            {"sale_id": 1, "order_number": "ORD-1", "customer_name": "Wanjiru", "total_price": 500,
             "payment_type": "Cash", "sale_date": "2024-10-14T09:00:00Z", "profit": 100,
             "status": "completed", "vat": 69, "discount": 0, "items": []},
            {"sale_id": 2, "order_number": "ORD-2", "customer_name": null, "total_price": "1160.00",
             "payment_type": "Mpesa", "sale_date": "2024-10-15T09:00:00Z", "profit": null,
             "status": "voided", "vat": "160", "discount": "0", "items": []},
            {"sale_id": 3, "order_number": "ORD-3", "customer_name": "Wanjiru", "total_price": 220,
             "payment_type": "Mpesa", "sale_date": "2024-10-20T09:00:00Z", "profit": 20,
             "status": "completed", "vat": 30, "discount": 10, "items": []}
            ]"#,
        )
        .unwrap()
    }

    fn args(extra: &[&str]) -> OrdersArgs {
        let mut argv = vec!["peakers", "orders"];
        argv.extend_from_slice(extra);
        match crate::Cli::parse_from(argv).command {
            crate::Command::Orders(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_filter_by_dates_and_payment() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let book = build_book(
            orders(),
            &args(&["--from", "2024-10-14", "--to", "2024-10-15", "--payment", "Mpesa"]),
            utc,
        )
        .unwrap();
        assert_eq!(book.filtered().len(), 1);
        assert_eq!(book.filtered()[0].sale_id, 2);
        assert_eq!(book.filter().payment_type, Some(PaymentType::Mpesa));
    }

    #[test]
    fn test_page_render_totals() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let book = build_book(orders(), &args(&[]), utc).unwrap();
        let text = render_page(&book);
        assert!(text.starts_with("     3  ORD-3"));
        assert!(text.contains("Page 1 of 1 (3 orders)"));
        assert!(text.contains("Total sales: Ksh 1880.00  Total profit: Ksh 120.00"));
    }

    #[test]
    fn test_invalid_rows_per_page() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(build_book(orders(), &args(&["--rows", "0"]), utc).is_err());
    }

    #[test]
    fn test_detail_subtotal() {
        let order = &orders()[2];
        let text = render_detail(order);
        assert!(text.contains("Subtotal: Ksh 200.00"));
    }
}
