//! Dashboard figures.

use peakers_core::dashboard::{Dashboard, SalesData};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;

impl ApiClient {
    /// `GET /sales-data`.
    pub async fn sales_data(&self) -> ClientResult<SalesData> {
        self.get("/sales-data").await
    }

    /// Sales data and orders, fetched together and folded into the dashboard.
    pub async fn dashboard(&self, config: &ClientConfig) -> ClientResult<Dashboard> {
        let (data, orders) = tokio::try_join!(self.sales_data(), self.orders())?;
        Ok(Dashboard::build(
            data,
            &orders,
            config.monthly_target(),
            config.dashboard.trend_days,
            config.dashboard.recent_orders,
        ))
    }
}
