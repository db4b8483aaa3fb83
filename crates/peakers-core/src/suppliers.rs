//! Suppliers, the stock they deliver, and what has been paid against it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::serde_helpers::{flexible_datetime_opt, lenient_i64, null_as_default};
use crate::types::PaymentType;
use crate::validation::{parse_positive_amount, parse_positive_int, require};

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(deserialize_with = "lenient_i64")]
    pub supplier_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplier_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_person: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl Supplier {
    /// Name, contact person, phone or email contains `query`.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        [
            &self.supplier_name,
            &self.contact_person,
            &self.phone_number,
            &self.email,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&q))
    }
}

pub fn search<'a>(suppliers: &'a [Supplier], query: &str) -> Vec<&'a Supplier> {
    suppliers.iter().filter(|s| s.matches(query)).collect()
}

/// Add / edit supplier form; also the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupplierForm {
    pub supplier_name: String,
    pub contact_person: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
}

impl SupplierForm {
    pub fn from_supplier(s: &Supplier) -> Self {
        SupplierForm {
            supplier_name: s.supplier_name.clone(),
            contact_person: s.contact_person.clone(),
            phone_number: s.phone_number.clone(),
            email: s.email.clone(),
            address: s.address.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Supplier name", &self.supplier_name)
    }
}

/// `GET /api/v1/supplier/{id}`; only the name is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupplierInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplier_name: String,
}

// =============================================================================
// Supplier Products
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProduct {
    #[serde(deserialize_with = "lenient_i64")]
    pub supplier_product_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "money::major_units")]
    pub price: Money,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock_supplied: i64,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub supply_date: Option<DateTime<Utc>>,
}

/// The "add supplied product" form as typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierProductForm {
    pub product_id: Option<i64>,
    pub stock_supplied: String,
    pub price: String,
    /// `YYYY-MM-DD`; the form starts on today's date.
    pub supply_date: String,
}

/// Body of `POST /supplier-products/{supplier_id}/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSupplierProduct {
    pub product_id: i64,
    pub stock_supplied: i64,
    #[serde(with = "money::major_units")]
    pub price: Money,
    pub supply_date: NaiveDate,
}

impl SupplierProductForm {
    pub fn starting_on(today: NaiveDate) -> Self {
        SupplierProductForm {
            supply_date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Checks, in order: product selected, stock > 0, price > 0, date present.
    pub fn to_request(&self) -> Result<NewSupplierProduct, ValidationError> {
        let product_id = self.product_id.ok_or_else(|| ValidationError::Required {
            field: "Product".to_string(),
        })?;
        let stock_supplied = parse_positive_int("Stock quantity", &self.stock_supplied)?;
        let price = parse_positive_amount("Price", &self.price)?;
        require("Supply date", &self.supply_date)?;
        let supply_date = NaiveDate::parse_from_str(self.supply_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidFormat {
                field: "Supply date".to_string(),
                reason: "use YYYY-MM-DD".to_string(),
            })?;

        Ok(NewSupplierProduct {
            product_id,
            stock_supplied,
            price,
            supply_date,
        })
    }
}

// =============================================================================
// Payments
// =============================================================================

/// Methods accepted for paying a supplier.
pub const SUPPLIER_PAYMENT_METHODS: [PaymentType; 2] = [PaymentType::Mpesa, PaymentType::Cash];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub amount: String,
    pub method: Option<PaymentType>,
    /// Mpesa transaction code; ignored for other methods.
    pub reference: String,
}

/// Body of `POST /supplier-payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPayment {
    pub supplier_id: i64,
    pub supplier_product_id: i64,
    #[serde(with = "money::major_units")]
    pub amount: Money,
    pub payment_method: PaymentType,
    pub reference: String,
}

impl PaymentForm {
    pub fn to_request(
        &self,
        supplier_id: i64,
        supplier_product_id: i64,
    ) -> Result<SupplierPayment, ValidationError> {
        let amount = parse_positive_amount("Payment amount", &self.amount)?;
        let method = self.method.clone().ok_or_else(|| ValidationError::Required {
            field: "Payment method".to_string(),
        })?;
        let reference = if method == PaymentType::Mpesa {
            self.reference.trim().to_string()
        } else {
            String::new()
        };

        Ok(SupplierPayment {
            supplier_id,
            supplier_product_id,
            amount,
            payment_method: method,
            reference,
        })
    }
}

/// `POST /supplier-payments` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentReceipt {
    #[serde(default, with = "money::major_units")]
    pub balance_remaining: Money,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentRecord {
    #[serde(deserialize_with = "lenient_i64")]
    pub payment_id: i64,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default, with = "money::major_units")]
    pub amount: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// `GET /supplier-payments/{supplier_id}/{supplier_product_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PaymentHistory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payments: Vec<PaymentRecord>,
    #[serde(default, with = "money::major_units")]
    pub total_paid: Money,
    #[serde(default, with = "money::major_units")]
    pub balance_remaining: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplier_info: SupplierInfo,
}
