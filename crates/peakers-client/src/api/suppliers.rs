//! Suppliers, their deliveries and payments.

use peakers_core::suppliers::{
    PaymentForm, PaymentHistory, PaymentReceipt, Supplier, SupplierForm, SupplierInfo,
    SupplierProduct, SupplierProductForm,
};
use tracing::info;

use crate::error::ClientResult;
use crate::http::ApiClient;

impl ApiClient {
    /// `GET /suppliers`.
    pub async fn suppliers(&self) -> ClientResult<Vec<Supplier>> {
        let suppliers: Option<Vec<Supplier>> = self.get("/suppliers").await?;
        Ok(suppliers.unwrap_or_default())
    }

    /// `GET /api/v1/supplier/{id}`.
    pub async fn supplier(&self, supplier_id: i64) -> ClientResult<SupplierInfo> {
        self.get(&format!("/api/v1/supplier/{supplier_id}")).await
    }

    /// `POST /add-supplier`, or `PUT /update-supplier/{id}` when editing.
    pub async fn save_supplier(&self, supplier_id: Option<i64>, form: &SupplierForm) -> ClientResult<()> {
        form.validate()?;
        let _: serde_json::Value = match supplier_id {
            Some(id) => self.put(&format!("/update-supplier/{id}"), form).await?,
            None => self.post("/add-supplier", form).await?,
        };
        info!(?supplier_id, name = %form.supplier_name, "Supplier saved");
        Ok(())
    }

    /// `DELETE /suppliers/{id}`.
    pub async fn delete_supplier(&self, supplier_id: i64) -> ClientResult<()> {
        let _: serde_json::Value = self.delete(&format!("/suppliers/{supplier_id}")).await?;
        info!(supplier_id, "Supplier deleted");
        Ok(())
    }

    /// `GET /supplier-products/{supplier_id}`.
    pub async fn supplier_products(&self, supplier_id: i64) -> ClientResult<Vec<SupplierProduct>> {
        let products: Option<Vec<SupplierProduct>> = self
            .get(&format!("/supplier-products/{supplier_id}"))
            .await?;
        Ok(products.unwrap_or_default())
    }

    /// `POST /supplier-products/{supplier_id}/add`.
    pub async fn add_supplier_product(
        &self,
        supplier_id: i64,
        form: &SupplierProductForm,
    ) -> ClientResult<()> {
        let request = form.to_request()?;
        let _: serde_json::Value = self
            .post(&format!("/supplier-products/{supplier_id}/add"), &request)
            .await?;
        info!(
            supplier_id,
            product_id = request.product_id,
            stock = request.stock_supplied,
            "Supplied stock recorded"
        );
        Ok(())
    }

    /// `POST /supplier-payments`.
    pub async fn pay_supplier(
        &self,
        supplier_id: i64,
        supplier_product_id: i64,
        form: &PaymentForm,
    ) -> ClientResult<PaymentReceipt> {
        let request = form.to_request(supplier_id, supplier_product_id)?;
        let receipt: PaymentReceipt = self.post("/supplier-payments", &request).await?;
        info!(
            supplier_id,
            supplier_product_id,
            amount = %request.amount,
            balance = %receipt.balance_remaining,
            "Supplier payment recorded"
        );
        Ok(receipt)
    }

    /// `GET /supplier-payments/{supplier_id}/{supplier_product_id}`.
    pub async fn payment_history(
        &self,
        supplier_id: i64,
        supplier_product_id: i64,
    ) -> ClientResult<PaymentHistory> {
        let history: Option<PaymentHistory> = self
            .get(&format!(
                "/supplier-payments/{supplier_id}/{supplier_product_id}"
            ))
            .await?;
        Ok(history.unwrap_or_default())
    }
}
