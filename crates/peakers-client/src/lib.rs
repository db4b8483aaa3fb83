//! # peakers-client: Backend Access for Peakers POS
//!
//! The I/O half of the POS: REST calls, configuration, the stored database
//! name, and checkout submission.
//!
//! ## Modules
//!
//! - [`config`] - `client.toml` + `PEAKERS_*` overrides
//! - [`session`] - Selected database, persisted between runs
//! - [`http`] - Shared reqwest client and error mapping
//! - [`api`] - One module per screen's endpoints
//! - [`checkout`] - Submit a sale, reset on success
//! - [`error`] - Client error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use peakers_client::{ApiClient, ClientConfig, SessionStore};
//!
//! # async fn run() -> peakers_client::ClientResult<()> {
//! let config = ClientConfig::load(None)?;
//! let store = SessionStore::open_default()?;
//! let api = ApiClient::new(&config, store.db_name_or(&config.session.default_db_name))?;
//!
//! let products = api.sales_products().await?;
//! println!("{} products for sale", products.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use checkout::{submit_sale, CompletedSale, SalesBackend, CHECKOUT_FAILED};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use session::SessionStore;
