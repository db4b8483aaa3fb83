//! Sales screen data: sellable products, customers, company header, and the
//! sale itself.

use peakers_core::checkout::CheckoutResponse;
use peakers_core::serde_helpers::null_as_default;
use peakers_core::{CheckoutRequest, CompanyDetails, CreatedCustomer, Customer, NewCustomer, SaleProduct};
use serde::Deserialize;
use tracing::info;

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct ProductList {
    #[serde(default, deserialize_with = "null_as_default")]
    products: Vec<SaleProduct>,
}

#[derive(Deserialize)]
struct CustomerList {
    #[serde(default, deserialize_with = "null_as_default")]
    customers: Vec<Customer>,
}

#[derive(Deserialize)]
struct CustomerCreated {
    customer: CreatedCustomer,
}

impl ApiClient {
    /// `GET /get-sales-products`.
    pub async fn sales_products(&self) -> ClientResult<Vec<SaleProduct>> {
        let list: ProductList = self.get("/get-sales-products").await?;
        Ok(list.products)
    }

    /// `GET /get-sales-customers`.
    pub async fn sales_customers(&self) -> ClientResult<Vec<Customer>> {
        let list: CustomerList = self.get("/get-sales-customers").await?;
        Ok(list.customers)
    }

    /// `POST /add-sales-customer`. The name is checked before sending.
    pub async fn add_customer(&self, customer: &NewCustomer) -> ClientResult<Customer> {
        customer.validate()?;
        let created: CustomerCreated = self.post("/add-sales-customer", customer).await?;
        let customer = Customer::from(created.customer);
        info!(customer_id = customer.id, name = %customer.name, "Customer added");
        Ok(customer)
    }

    /// `GET /get-company-details`.
    pub async fn company_details(&self) -> ClientResult<CompanyDetails> {
        self.get("/get-company-details").await
    }

    /// `POST /process-sale`.
    pub async fn process_sale(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
        self.post("/process-sale", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::decode;

    #[test]
    fn test_product_list_decodes_string_prices() {
        let list: ProductList = decode(
            "/get-sales-products",
            r#"{"products": [
                {"product_id": 1, "product_name": "Soda", "product_price": "60.00", "product_stock": 12},
                {"product_id": 4, "product_name": "Lunch Combo", "product_price": 350, "product_stock": 3, "is_bundle": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.products.len(), 2);
        assert_eq!(list.products[0].product_price.cents(), 6000);
        assert!(list.products[1].is_bundle);
    }

    #[test]
    fn test_created_customer_maps_to_customer() {
        let created: CustomerCreated = decode(
            "/add-sales-customer",
            r#"{"customer": {"customer_id": 9, "customer_name": "Achieng", "phone": null}}"#,
        )
        .unwrap();
        let customer = Customer::from(created.customer);
        assert_eq!(customer.id, 9);
        assert_eq!(customer.name, "Achieng");
        assert_eq!(customer.phone, "");
    }

    #[tokio::test]
    async fn test_add_customer_requires_name() {
        let api = ApiClient::new(&crate::config::ClientConfig::default(), "db").unwrap();
        let err = api.add_customer(&NewCustomer::default()).await.unwrap_err();
        assert!(err.user_message("Failed to add customer").contains("Customer name"));
    }
}
