//! # Checkout Submission
//!
//! Turns a sales session into a recorded sale.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                    │
//! │                                                                         │
//! │  session.prepare_checkout()                                             │
//! │      │                                                                  │
//! │      ├── EmptyCart / NoCustomerSelected ──► error, nothing sent         │
//! │      ▼                                                                  │
//! │  backend.process_sale(request)                                          │
//! │      │                                                                  │
//! │      ├── error ──► session untouched (cart, customer, VAT, discount)    │
//! │      ▼                                                                  │
//! │  session.complete_sale() ──► reset + Receipt                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockall::automock;
use peakers_core::checkout::CheckoutResponse;
use peakers_core::{CheckoutRequest, CompanyDetails, Receipt, SalesSession};
use tracing::{error, info};

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;

/// Notice text when a sale fails without a usable server message.
pub const CHECKOUT_FAILED: &str = "Error processing sale.";

/// The one call checkout needs from the backend.
#[automock]
#[async_trait]
pub trait SalesBackend: Send + Sync {
    /// Records the sale and returns its order number.
    async fn process_sale(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse>;
}

#[async_trait]
impl SalesBackend for ApiClient {
    async fn process_sale(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
        ApiClient::process_sale(self, request).await
    }
}

/// A sale the backend accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSale {
    pub order_number: String,
    pub receipt: Receipt,
}

/// Submits `session`'s cart through `backend`.
///
/// On success the session is reset for the next customer (payment type is
/// kept) and the receipt is returned. On any failure the session is left
/// exactly as it was.
pub async fn submit_sale<B>(
    backend: &B,
    session: &mut SalesSession,
    company: &CompanyDetails,
    now: NaiveDateTime,
) -> ClientResult<CompletedSale>
where
    B: SalesBackend + ?Sized,
{
    let pending = session.prepare_checkout()?;

    let response = match backend.process_sale(&pending.request).await {
        Ok(response) => response,
        Err(err) => {
            log_failure(&err);
            return Err(err);
        }
    };

    info!(
        order_number = %response.order_number,
        customer_id = pending.request.customer_id,
        total = %pending.breakdown.total,
        "Sale completed"
    );

    let order_number = response.order_number;
    let receipt = session.complete_sale(pending, order_number.clone(), company, now);
    Ok(CompletedSale {
        order_number,
        receipt,
    })
}

fn log_failure(err: &ClientError) {
    if err.is_insufficient_stock() {
        error!(error = %err, "Sale rejected: insufficient stock");
    } else {
        error!(error = %err, "Sale failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use peakers_core::{CoreError, Customer, Money, PaymentType, SaleDefaults, SaleProduct, VatRate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 15)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn company() -> CompanyDetails {
        CompanyDetails {
            company: "Peakers Mini Mart".to_string(),
            company_phone: "0700 000 000".to_string(),
        }
    }

    fn product(id: i64, name: &str, price: i64, stock: i64) -> SaleProduct {
        SaleProduct {
            product_id: id,
            product_name: name.to_string(),
            product_price: Money::from_major(price),
            product_stock: stock,
            is_bundle: false,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 42,
            name: "Wanjiru".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        }
    }

    fn ready_session() -> SalesSession {
        let mut session = SalesSession::new(SaleDefaults::default());
        let bread = product(1, "Bread", 100, 5);
        session.cart.add(&bread).unwrap();
        session.cart.add(&bread).unwrap();
        session.select_customer(customer());
        session.set_discount(Money::from_major(10));
        session.set_payment_type(PaymentType::Cash);
        session
    }

    #[tokio::test]
    async fn test_empty_cart_sends_nothing() {
        let mut backend = MockSalesBackend::new();
        backend.expect_process_sale().never();

        let mut session = SalesSession::new(SaleDefaults::default());
        session.select_customer(customer());

        let err = submit_sale(&backend, &mut session, &company(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::EmptyCart)));
        assert_eq!(err.user_message(CHECKOUT_FAILED), "Cart is empty.");
    }

    #[tokio::test]
    async fn test_missing_customer_sends_nothing() {
        let mut backend = MockSalesBackend::new();
        backend.expect_process_sale().never();

        let mut session = ready_session();
        session.deselect_customer();

        let err = submit_sale(&backend, &mut session, &company(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::NoCustomerSelected)));
        assert_eq!(session.cart.total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_success_resets_session_and_builds_receipt() {
        let mut backend = MockSalesBackend::new();
        backend
            .expect_process_sale()
            .times(1)
            .withf(|req| {
                req.customer_id == 42
                    && req.payment_type == PaymentType::Cash
                    && req.cart_items.len() == 1
                    && req.cart_items[0].quantity == 2
                    && req.vat == Money::from_major(32)
                    && req.discount == Money::from_major(10)
            })
            .returning(|_| {
                Ok(CheckoutResponse {
                    order_number: "ORD-1001".to_string(),
                })
            });

        let mut session = ready_session();
        session.set_vat_rate(VatRate::from_percent(16.0));

        let sale = submit_sale(&backend, &mut session, &company(), now())
            .await
            .unwrap();

        assert_eq!(sale.order_number, "ORD-1001");
        assert_eq!(sale.receipt.breakdown.total, Money::from_major(222));
        assert!(sale.receipt.render().contains("Order No: ORD-1001"));

        assert!(session.cart.is_empty());
        assert!(session.customer().is_none());
        assert_eq!(session.discount(), Money::zero());
        assert_eq!(session.vat_rate(), VatRate::default());
        assert_eq!(session.payment_type(), &PaymentType::Cash);
    }

    #[tokio::test]
    async fn test_failure_leaves_session_untouched() {
        let mut backend = MockSalesBackend::new();
        backend.expect_process_sale().times(1).returning(|_| {
            Err(ClientError::from_response(
                400,
                r#"{"error": "INSUFFICIENT_STOCK", "message": "Only 1 Bread left in stock"}"#,
            ))
        });

        let mut session = ready_session();
        let err = submit_sale(&backend, &mut session, &company(), now())
            .await
            .unwrap_err();

        assert!(err.is_insufficient_stock());
        assert_eq!(err.user_message(CHECKOUT_FAILED), "Only 1 Bread left in stock");
        assert_eq!(session.cart.total_quantity(), 2);
        assert_eq!(session.customer().map(|c| c.id), Some(42));
        assert_eq!(session.discount(), Money::from_major(10));
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_fallback() {
        let mut backend = MockSalesBackend::new();
        backend
            .expect_process_sale()
            .returning(|_| Err(ClientError::from_response(502, "")));

        let mut session = ready_session();
        let err = submit_sale(&backend, &mut session, &company(), now())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(CHECKOUT_FAILED), CHECKOUT_FAILED);
        assert!(!session.cart.is_empty());
    }
}
