//! Order history and status changes.

use peakers_core::orders::{Order, StatusUpdate};
use peakers_core::serde_helpers::null_as_default;
use peakers_core::{OrderStatus, ValidationError};
use serde::Deserialize;
use tracing::info;

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct OrderList {
    #[serde(default, deserialize_with = "null_as_default")]
    orders: Vec<Order>,
}

impl ApiClient {
    /// `GET /get-orders`, amounts normalised to money.
    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        let list: OrderList = self.get("/get-orders").await?;
        Ok(list.orders)
    }

    /// `POST /update-order-status`. Only completed, voided and refunded are sent.
    pub async fn update_order_status(&self, sale_id: i64, status: OrderStatus) -> ClientResult<()> {
        if !OrderStatus::SETTABLE.contains(&status) {
            return Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("'{status}' cannot be set"),
            }
            .into());
        }
        let _: serde_json::Value = self
            .post("/update-order-status", &StatusUpdate { sale_id, status })
            .await?;
        info!(sale_id, status = %status, "Order status updated");
        Ok(())
    }
}
