//! # Order History
//!
//! Normalisation, filtering, customer statistics and pagination for the
//! orders screen. All list work is in memory over what `GET /get-orders`
//! returned.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  all orders                                                             │
//! │      │                                                                  │
//! │      ├─► date window      (strictly after start-of-day,                 │
//! │      │                     strictly before end-of-day)                  │
//! │      ├─► top-N customers  (by order count over ALL orders)              │
//! │      ├─► payment type                                                   │
//! │      ├─► status                                                         │
//! │      ├─► search           (order number or customer, case-insensitive)  │
//! │      └─► sort newest first, page → 1                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::serde_helpers::{flexible_datetime_opt, lenient_i64, lenient_i64_opt, null_as_default};
use crate::types::{OrderStatus, PaymentType};
use crate::GUEST_CUSTOMER;

/// Rows-per-page choices offered by the orders screen.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [15, 50, 100, 250];

/// Top-customer counts offered by the filter.
pub const TOP_CUSTOMER_OPTIONS: [usize; 4] = [3, 5, 10, 15];

pub const DEFAULT_ROWS_PER_PAGE: usize = 15;
pub const DEFAULT_TOP_CUSTOMERS: usize = 5;

// =============================================================================
// Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: i64,
    #[serde(default, with = "money::major_units")]
    pub product_price: Money,
    #[serde(default, with = "money::major_units")]
    pub subtotal: Money,
    #[serde(default, with = "money::major_units_opt")]
    pub buying_price: Option<Money>,
}

/// One row of `GET /get-orders`, amounts already normalised to [`Money`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "lenient_i64")]
    pub sale_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub customer_id: Option<i64>,
    #[serde(default, with = "money::major_units")]
    pub total_price: Money,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default, with = "money::major_units_opt")]
    pub profit: Option<Money>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default, with = "money::major_units")]
    pub vat: Money,
    #[serde(default, with = "money::major_units")]
    pub discount: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Customer label, `Guest` when the sale had no named customer.
    pub fn customer_label(&self) -> &str {
        match self.customer_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => GUEST_CUSTOMER,
        }
    }

    /// Payment label, `Unknown` when the backend sent none.
    pub fn payment_label(&self) -> &str {
        match &self.payment_type {
            Some(p) if !p.as_str().is_empty() => p.as_str(),
            _ => "Unknown",
        }
    }

    /// Pre-tax, pre-discount amount shown in the order detail.
    pub fn subtotal(&self) -> Money {
        self.total_price - self.vat + self.discount
    }

    pub fn profit_or_zero(&self) -> Money {
        self.profit.unwrap_or_default()
    }

    fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.order_number.to_lowercase().contains(&q)
            || self
                .customer_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&q)
    }
}

/// Body of `POST /update-order-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub sale_id: i64,
    pub status: OrderStatus,
}

// =============================================================================
// Customer Statistics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerStat {
    pub name: String,
    pub count: usize,
}

/// Orders per customer label, most orders first.
///
/// Ties keep the order in which customers first appear.
pub fn customer_stats(orders: &[Order]) -> Vec<CustomerStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<CustomerStat> = Vec::new();

    for order in orders {
        let name = order.customer_label();
        match index.get(name) {
            Some(&i) => stats[i].count += 1,
            None => {
                index.insert(name, stats.len());
                stats.push(CustomerStat {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

// =============================================================================
// Filter
// =============================================================================

/// Exclusive date window built from two calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Start of `from` to the last millisecond of `to`, in the given offset.
    pub fn from_days(
        from: NaiveDate,
        to: NaiveDate,
        offset: FixedOffset,
    ) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "date range".to_string(),
            reason: format!("cannot build a window from {from} to {to}"),
        };
        let start = from
            .and_hms_opt(0, 0, 0)
            .and_then(|d| offset.from_local_datetime(&d).single())
            .ok_or_else(invalid)?;
        let end = to
            .and_hms_milli_opt(23, 59, 59, 999)
            .and_then(|d| offset.from_local_datetime(&d).single())
            .ok_or_else(invalid)?;
        Ok(DateWindow {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }

    /// Strict on both ends.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at > self.start && at < self.end
    }
}

/// Everything the filter sheet can set. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub window: Option<DateWindow>,
    pub top_customers: Option<usize>,
    pub payment_type: Option<PaymentType>,
    pub status: Option<OrderStatus>,
    pub search: String,
}

impl OrderFilter {
    /// Filters and sorts `orders` (newest first; undated rows last).
    ///
    /// `stats` must be computed over the unfiltered list.
    pub fn apply(&self, orders: &[Order], stats: &[CustomerStat]) -> Vec<Order> {
        let top: Option<Vec<&str>> = self
            .top_customers
            .map(|n| stats.iter().take(n).map(|s| s.name.as_str()).collect());
        let search = self.search.trim();

        let mut result: Vec<Order> = orders
            .iter()
            .filter(|o| match (&self.window, o.sale_date) {
                (Some(w), Some(at)) => w.contains(at),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .filter(|o| {
                top.as_ref()
                    .map_or(true, |names| names.contains(&o.customer_label()))
            })
            .filter(|o| {
                self.payment_type
                    .as_ref()
                    .map_or(true, |p| o.payment_type.as_ref() == Some(p))
            })
            .filter(|o| self.status.map_or(true, |s| o.status == s))
            .filter(|o| search.is_empty() || o.matches_search(search))
            .cloned()
            .collect();

        sort_newest_first(&mut result);
        result
    }
}

/// Stable sort by `sale_date` descending, undated rows at the end.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
}

// =============================================================================
// Pagination
// =============================================================================

/// `ceil(total / rows)`; zero rows per page yields zero pages.
pub fn total_pages(total: usize, rows_per_page: usize) -> usize {
    if rows_per_page == 0 {
        0
    } else {
        total.div_ceil(rows_per_page)
    }
}

/// The 1-based `page` of `items`.
pub fn page_slice<T>(items: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let first = page.saturating_sub(1).saturating_mul(rows_per_page);
    if first >= items.len() {
        return &[];
    }
    let last = first.saturating_add(rows_per_page).min(items.len());
    &items[first..last]
}

// =============================================================================
// Order Book
// =============================================================================

/// The orders screen state: full list, filtered view, stats and paging.
#[derive(Debug, Clone)]
pub struct OrderBook {
    orders: Vec<Order>,
    filtered: Vec<Order>,
    stats: Vec<CustomerStat>,
    filter: OrderFilter,
    page: usize,
    rows_per_page: usize,
}

impl OrderBook {
    pub fn new(orders: Vec<Order>) -> Self {
        let stats = customer_stats(&orders);
        let mut book = OrderBook {
            orders,
            filtered: Vec::new(),
            stats,
            filter: OrderFilter::default(),
            page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        };
        book.refilter();
        book
    }

    /// Replaces the filter, recomputes the view and jumps to page 1.
    pub fn apply_filter(&mut self, filter: OrderFilter) {
        self.filter = filter;
        self.refilter();
    }

    pub fn reset_filter(&mut self) {
        self.apply_filter(OrderFilter::default());
    }

    fn refilter(&mut self) {
        self.filtered = self.filter.apply(&self.orders, &self.stats);
        self.page = 1;
    }

    /// Applies a status change locally to both the full and filtered lists.
    ///
    /// Returns `false` if no order has that `sale_id`.
    pub fn set_status(&mut self, sale_id: i64, status: OrderStatus) -> bool {
        let mut found = false;
        for order in self.orders.iter_mut().filter(|o| o.sale_id == sale_id) {
            order.status = status;
            found = true;
        }
        for order in self.filtered.iter_mut().filter(|o| o.sale_id == sale_id) {
            order.status = status;
        }
        found
    }

    pub fn find(&self, sale_id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.sale_id == sale_id)
    }

    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    pub fn filtered(&self) -> &[Order] {
        &self.filtered
    }

    pub fn customer_stats(&self) -> &[CustomerStat] {
        &self.stats
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<(), ValidationError> {
        if rows == 0 {
            return Err(ValidationError::MustBePositive {
                field: "rows per page".to_string(),
            });
        }
        self.rows_per_page = rows;
        self.page = 1;
        Ok(())
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.rows_per_page)
    }

    /// Jumps to `page`, clamped to `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_page(&self) -> &[Order] {
        page_slice(&self.filtered, self.page, self.rows_per_page)
    }

    /// Σ total_price over the filtered view.
    pub fn total_sales(&self) -> Money {
        self.filtered.iter().map(|o| o.total_price).sum()
    }

    /// Σ profit over the filtered view (missing profit counts as zero).
    pub fn total_profit(&self) -> Money {
        self.filtered.iter().map(Order::profit_or_zero).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: i64, customer: Option<&str>, date: &str, total: i64) -> Order {
        Order {
            sale_id: id,
            order_number: format!("ORD-{id:04}"),
            customer_name: customer.map(str::to_string),
            customer_id: None,
            total_price: Money::from_major(total),
            payment_type: Some(PaymentType::Mpesa),
            sale_date: crate::serde_helpers::parse_datetime(date),
            profit: Some(Money::from_major(total / 10)),
            status: OrderStatus::Completed,
            vat: Money::zero(),
            discount: Money::zero(),
            items: Vec::new(),
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order(1, Some("Amina"), "2024-10-01 09:00:00", 100),
            order(2, None, "2024-10-03 12:00:00", 200),
            order(3, Some("Brian"), "2024-10-02 08:00:00", 300),
            order(4, Some("Amina"), "2024-10-05 18:00:00", 400),
            order(5, Some(""), "2024-10-04 10:00:00", 500),
        ]
    }

    #[test]
    fn test_decode_normalises_numeric_strings() {
        let json = r#"{
            "sale_id": "17", "order_number": "ORD-17", "customer_name": null,
            "total_price": "1160.00", "payment_type": "Cash",
            "sale_date": "Tue, 15 Oct 2024 10:00:00 GMT", "profit": null,
            "status": "voided", "vat": "160.00", "discount": "0",
            "items": [{"product_id": 1, "product_name": "Soda", "quantity": 2,
                       "product_price": "500.00", "subtotal": "1000.00"}]
        }"#;
        let o: Order = serde_json::from_str(json).unwrap();

        assert_eq!(o.sale_id, 17);
        assert_eq!(o.total_price, Money::from_major(1160));
        assert_eq!(o.subtotal(), Money::from_major(1000));
        assert_eq!(o.customer_label(), "Guest");
        assert_eq!(o.status, OrderStatus::Voided);
        assert_eq!(o.payment_label(), "Cash");
        assert_eq!(o.items[0].subtotal, Money::from_major(1000));
        assert!(o.sale_date.is_some());
    }

    #[test]
    fn test_customer_stats_counts_guests_together() {
        let stats = customer_stats(&sample());
        assert_eq!(stats[0], CustomerStat { name: "Amina".to_string(), count: 2 });
        assert_eq!(stats[1], CustomerStat { name: "Guest".to_string(), count: 2 });
        assert_eq!(stats[2].name, "Brian");
    }

    #[test]
    fn test_default_filter_sorts_newest_first() {
        let book = OrderBook::new(sample());
        let ids: Vec<i64> = book.filtered().iter().map(|o| o.sale_id).collect();
        assert_eq!(ids, vec![4, 5, 2, 3, 1]);
    }

    #[test]
    fn test_date_window_is_strict_and_inclusive_of_whole_days() {
        let window = DateWindow::from_days(
            NaiveDate::from_ymd_opt(2024, 10, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 4).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
        .unwrap();
        let filter = OrderFilter {
            window: Some(window),
            ..Default::default()
        };
        let orders = sample();
        let ids: Vec<i64> = filter
            .apply(&orders, &customer_stats(&orders))
            .iter()
            .map(|o| o.sale_id)
            .collect();
        assert_eq!(ids, vec![5, 2, 3]);

        // exactly midnight at the start is outside
        let midnight = crate::serde_helpers::parse_datetime("2024-10-02 00:00:00").unwrap();
        assert!(!window.contains(midnight));
    }

    #[test]
    fn test_top_customers_search_and_status() {
        let mut book = OrderBook::new(sample());
        book.apply_filter(OrderFilter {
            top_customers: Some(1),
            ..Default::default()
        });
        assert!(book.filtered().iter().all(|o| o.customer_label() == "Amina"));

        book.apply_filter(OrderFilter {
            search: "ord-0003".to_string(),
            ..Default::default()
        });
        assert_eq!(book.filtered().len(), 1);

        book.apply_filter(OrderFilter {
            status: Some(OrderStatus::Refunded),
            ..Default::default()
        });
        assert!(book.filtered().is_empty());
    }

    #[test]
    fn test_set_status_updates_both_views() {
        let mut book = OrderBook::new(sample());
        assert!(book.set_status(3, OrderStatus::Refunded));
        assert_eq!(book.find(3).unwrap().status, OrderStatus::Refunded);
        assert!(book
            .filtered()
            .iter()
            .any(|o| o.sale_id == 3 && o.status == OrderStatus::Refunded));
        assert!(!book.set_status(99, OrderStatus::Voided));
    }

    #[test]
    fn test_pagination() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(31, 15), 3);
        let items: Vec<i32> = (1..=31).collect();
        assert_eq!(page_slice(&items, 3, 15), &[31]);
        assert!(page_slice(&items, 4, 15).is_empty());

        let mut book = OrderBook::new(sample());
        book.set_rows_per_page(2).unwrap();
        assert_eq!(book.total_pages(), 3);
        assert!(!book.prev_page());
        assert!(book.next_page());
        assert!(book.next_page());
        assert!(!book.next_page());
        assert_eq!(book.current_page().len(), 1);
        assert!(book.set_rows_per_page(0).is_err());
    }

    #[test]
    fn test_totals_over_filtered_view() {
        let mut book = OrderBook::new(sample());
        assert_eq!(book.total_sales(), Money::from_major(1500));
        assert_eq!(book.total_profit(), Money::from_major(150));

        book.apply_filter(OrderFilter {
            search: "brian".to_string(),
            ..Default::default()
        });
        assert_eq!(book.total_sales(), Money::from_major(300));
    }
}
