//! Plain-text sales receipt.
//!
//! Rendered once after a successful checkout and handed to the caller for
//! display or printing. Nothing is stored.

use chrono::NaiveDateTime;

use crate::cart::CartLine;
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::types::{PaymentType, VatRate};
use crate::{CURRENCY_LABEL, GUEST_CUSTOMER};

const RULE: &str = "-------------------------------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub quantity: i64,
    pub name: String,
    pub is_bundle: bool,
    pub subtotal: Money,
}

impl From<&CartLine> for ReceiptLine {
    fn from(line: &CartLine) -> Self {
        ReceiptLine {
            quantity: line.quantity(),
            name: line.name().to_string(),
            is_bundle: line.is_bundle(),
            subtotal: line.subtotal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub company: String,
    pub company_phone: String,
    pub order_number: String,
    /// Local wall-clock time the receipt was printed.
    pub printed_at: NaiveDateTime,
    pub customer_name: String,
    pub lines: Vec<ReceiptLine>,
    pub vat_rate: VatRate,
    pub breakdown: PriceBreakdown,
    pub payment_type: PaymentType,
}

impl Receipt {
    pub fn render(&self) -> String {
        let customer = if self.customer_name.trim().is_empty() {
            GUEST_CUSTOMER
        } else {
            self.customer_name.as_str()
        };

        let mut out = Vec::with_capacity(16 + self.lines.len());
        out.push(self.company.clone());
        out.push(self.company_phone.clone());
        out.push(RULE.to_string());
        out.push("RECEIPT".to_string());
        out.push(format!("Order No: {}", self.order_number));
        out.push(format!(
            "Date: {}",
            self.printed_at.format("%d/%m/%Y, %H:%M:%S")
        ));
        out.push(format!("Customer: {customer}"));
        out.push(RULE.to_string());
        out.push("ITEMS:".to_string());
        for line in &self.lines {
            let bundle = if line.is_bundle { " (Bundle)" } else { "" };
            out.push(format!(
                "{} x {}{} - {} {}",
                line.quantity, line.name, bundle, CURRENCY_LABEL, line.subtotal
            ));
        }
        out.push(RULE.to_string());
        out.push(format!(
            "Subtotal: {} {}",
            CURRENCY_LABEL, self.breakdown.subtotal
        ));
        out.push(format!(
            "VAT ({}%): {} {}",
            self.vat_rate.percent_label(),
            CURRENCY_LABEL,
            self.breakdown.vat
        ));
        out.push(format!(
            "Discount: {} {}",
            CURRENCY_LABEL, self.breakdown.discount
        ));
        out.push(format!("Total: {} {}", CURRENCY_LABEL, self.breakdown.total));
        out.push(format!("Payment: {}", self.payment_type));
        out.push(RULE.to_string());
        out.push("Thank you for shopping with us!".to_string());

        out.join("\n")
    }
}
