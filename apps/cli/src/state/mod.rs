//! # State Module
//!
//! What a command needs to run.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │   ClientConfig   │ │   SessionStore   │ │     ApiClient        │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  base URL, VAT,  │ │  selected db     │ │  reqwest + db header │    │
//! │  │  targets         │ │  (file)          │ │                      │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │            └──────────────────┬───────────────────┘                     │
//! │                               ▼                                         │
//! │                           AppState                                      │
//! │                                                                         │
//! │  SellScreen: the interactive sell loop's cart, lists and selection.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod sales;

pub use sales::{SellCommand, SellScreen, HELP};

use peakers_client::{ApiClient, ClientConfig, SessionStore};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{CliResult, Notice};

pub struct AppState {
    pub config: ClientConfig,
    pub store: SessionStore,
    pub api: ApiClient,
}

impl AppState {
    /// Loads config, opens the session store and builds the API client for
    /// the stored database (or the configured default).
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let config = ClientConfig::load(config_path)
            .map_err(|e| Notice::new("Configuration", e.to_string()))?;
        let store = SessionStore::open_default()
            .map_err(|e| Notice::new("Configuration", e.to_string()))?;
        let db_name = store.db_name_or(&config.session.default_db_name);
        debug!(db_name = %db_name, base_url = %config.server.base_url, "State loaded");

        let api = ApiClient::new(&config, db_name)
            .map_err(|e| Notice::new("Configuration", e.to_string()))?;

        Ok(AppState { config, store, api })
    }
}
