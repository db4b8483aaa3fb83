//! # Commands Module
//!
//! One module per screen. Each command validates locally, calls the API,
//! prints to stdout, and returns a [`Notice`](crate::error::Notice) on
//! failure.
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here
//! ├── auth.rs       ◄─── connect, login
//! ├── dashboard.rs  ◄─── metrics, trend, recent orders
//! ├── orders.rs     ◄─── history, filters, status changes
//! ├── catalog.rs    ◄─── products, bundles, categories, recipes
//! ├── suppliers.rs  ◄─── suppliers, deliveries, payments
//! ├── sales.rs      ◄─── interactive sell loop
//! └── config.rs     ◄─── show / write client.toml
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod orders;
pub mod sales;
pub mod suppliers;
