//! # Peakers POS CLI
//!
//! The `peakers` binary: a terminal front end for the POS backend.
//!
//! ## Module Organization
//! ```text
//! peakers_cli/
//! ├── lib.rs          ◄─── You are here (argument parsing, logging, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState: config, session store, API client
//! │   └── sales.rs    ◄─── SellScreen + sell loop grammar
//! ├── commands/
//! │   ├── auth.rs     ◄─── connect, login
//! │   ├── dashboard.rs◄─── dashboard
//! │   ├── orders.rs   ◄─── orders, order-status
//! │   ├── catalog.rs  ◄─── products, bundles, categories, recipes
//! │   ├── suppliers.rs◄─── suppliers and payments
//! │   ├── sales.rs    ◄─── interactive sell loop
//! │   └── config.rs   ◄─── config show / init
//! └── error.rs        ◄─── Notice { title, message }
//! ```

pub mod commands;
pub mod error;
pub mod state;

use clap::{Args, Parser, Subcommand};
use peakers_core::{ItemId, OrderStatus, PaymentType};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use error::CliResult;
use state::AppState;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "peakers", version, about = "Peakers POS terminal client")]
pub struct Cli {
    /// Config file (default: platform config dir / client.toml)
    #[arg(long, global = true, env = "PEAKERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a database with the server and remember it
    Connect { db_name: String },

    /// Log in against the selected database
    Login {
        username: String,
        #[arg(long, env = "PEAKERS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sales metrics, trend and recent orders
    Dashboard,

    /// Order history with filters and paging
    Orders(OrdersArgs),

    /// Set an order's status (completed, voided, refunded)
    OrderStatus {
        sale_id: i64,
        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },

    /// Products and bundles
    Products {
        #[arg(long)]
        search: Option<String>,
        #[command(subcommand)]
        action: Option<ProductAction>,
    },

    /// Product categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Product recipes (materials per unit)
    Recipe {
        #[command(subcommand)]
        action: RecipeAction,
    },

    /// Suppliers, supplied stock and payments
    Suppliers {
        #[command(subcommand)]
        action: SupplierAction,
    },

    /// Interactive sales session
    Sell,

    /// Client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct OrdersArgs {
    /// First day (YYYY-MM-DD); needs --to
    #[arg(long, requires = "to")]
    pub from: Option<chrono::NaiveDate>,
    /// Last day (YYYY-MM-DD); needs --from
    #[arg(long, requires = "from")]
    pub to: Option<chrono::NaiveDate>,
    /// Only orders from the N most frequent customers
    #[arg(long)]
    pub top: Option<usize>,
    #[arg(long, value_parser = parse_payment)]
    pub payment: Option<PaymentType>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<OrderStatus>,
    /// Order number or customer name
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page: 15, 50, 100 or 250
    #[arg(long, default_value_t = peakers_core::orders::DEFAULT_ROWS_PER_PAGE)]
    pub rows: usize,
    /// Print one order's details
    #[arg(long)]
    pub show: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: String,
    #[arg(long, default_value = "")]
    pub number: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub stock: String,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long, default_value = "")]
    pub unit: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub expiry: String,
    /// Material id; repeat for several
    #[arg(long = "ingredient")]
    pub ingredients: Vec<i64>,
}

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// Add a product
    Add(ProductArgs),
    /// Replace a product's details
    Update {
        id: i64,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Create or edit a bundle
    Bundle {
        /// Existing bundle to edit (bundle-<id>)
        #[arg(long)]
        id: Option<ItemId>,
        /// Member as <product_id>[:<qty>]; repeat for several
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        #[arg(long)]
        price: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    List,
    Add { name: String },
}

#[derive(Debug, Subcommand)]
pub enum RecipeAction {
    Show {
        product_id: i64,
    },
    /// Replace a recipe
    Save {
        product_id: i64,
        /// <material_id>=<quantity>; repeat for several
        #[arg(long = "material", required = true)]
        materials: Vec<String>,
    },
    /// List materials
    Materials,
}

#[derive(Debug, Args)]
pub struct SupplierArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Debug, Subcommand)]
pub enum SupplierAction {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Show {
        id: i64,
    },
    Add(SupplierArgs),
    Update {
        id: i64,
        #[command(flatten)]
        supplier: SupplierArgs,
    },
    Delete {
        id: i64,
    },
    /// Stock delivered by a supplier
    Products {
        supplier_id: i64,
    },
    /// Record a delivery
    AddProduct {
        supplier_id: i64,
        #[arg(long)]
        product: Option<i64>,
        #[arg(long, default_value = "")]
        stock: String,
        #[arg(long, default_value = "")]
        price: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Pay against a delivery
    Pay {
        supplier_id: i64,
        supplier_product_id: i64,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long, value_parser = parse_payment)]
        method: Option<PaymentType>,
        /// Mpesa transaction code
        #[arg(long, default_value = "")]
        reference: String,
    },
    /// Payments made against a delivery
    History {
        supplier_id: i64,
        supplier_product_id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init,
}

fn parse_status(s: &str) -> Result<OrderStatus, String> {
    s.parse().map_err(|e: peakers_core::ValidationError| e.to_string())
}

fn parse_payment(s: &str) -> Result<PaymentType, String> {
    Ok(PaymentType::from(s))
}

// =============================================================================
// Entry Point
// =============================================================================

/// Parses arguments, runs one command and reports the outcome.
pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    debug!(config = ?cli.config, "Starting");

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(notice) => {
            eprintln!("{notice}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    if let Command::Config { action } = &cli.command {
        return commands::config::run(action, cli.config.clone());
    }

    let mut state = AppState::load(cli.config)?;
    info!(db_name = %state.api.db_name(), "Peakers POS client ready");

    match cli.command {
        Command::Connect { db_name } => commands::auth::connect(&mut state, &db_name).await,
        Command::Login { username, password } => {
            commands::auth::login(&state, &username, &password).await
        }
        Command::Dashboard => commands::dashboard::show(&state).await,
        Command::Orders(args) => commands::orders::list(&state, &args).await,
        Command::OrderStatus { sale_id, status } => {
            commands::orders::set_status(&state, sale_id, status).await
        }
        Command::Products { search, action } => match action {
            None => commands::catalog::list(&state, search.as_deref().unwrap_or("")).await,
            Some(action) => commands::catalog::run(&state, action).await,
        },
        Command::Categories { action } => commands::catalog::categories(&state, action).await,
        Command::Recipe { action } => commands::catalog::recipe(&state, action).await,
        Command::Suppliers { action } => commands::suppliers::run(&state, action).await,
        Command::Sell => commands::sales::sell(&state).await,
        Command::Config { .. } => Ok(()),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=peakers_client=trace` - Trace the HTTP layer only
/// - Default: INFO, DEBUG for peakers crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,peakers=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_orders_filters() {
        let cli = Cli::try_parse_from([
            "peakers", "orders", "--from", "2024-10-01", "--to", "2024-10-15", "--payment",
            "cash", "--status", "voided", "--rows", "50",
        ])
        .unwrap();
        match cli.command {
            Command::Orders(args) => {
                assert_eq!(args.payment, Some(PaymentType::Cash));
                assert_eq!(args.status, Some(OrderStatus::Voided));
                assert_eq!(args.rows, 50);
                assert_eq!(args.page, 1);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(Cli::try_parse_from(["peakers", "orders", "--from", "2024-10-01"]).is_err());
        assert!(Cli::try_parse_from(["peakers", "order-status", "3", "lost"]).is_err());
    }

    #[test]
    fn test_parse_login_password_flag() {
        let cli =
            Cli::try_parse_from(["peakers", "login", "mary", "--password", "secret"]).unwrap();
        assert!(matches!(cli.command, Command::Login { ref username, .. } if username == "mary"));
    }
}
