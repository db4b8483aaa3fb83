//! `sell`: the interactive sales loop.
//!
//! Reads one command per line from stdin. Errors are printed as notices and
//! the loop carries on; only `quit` or end of input leaves it.

use chrono::Local;
use peakers_client::{submit_sale, CHECKOUT_FAILED};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::error::{CliResult, Notice};
use crate::state::{AppState, SellCommand, SellScreen, HELP};

enum Flow {
    Continue,
    Quit,
}

pub async fn sell(state: &AppState) -> CliResult<()> {
    let mut screen = SellScreen::new(state.config.sale_defaults());
    load(state, &mut screen).await?;
    info!(
        products = screen.products.len(),
        customers = screen.customers.len(),
        "Sales screen ready"
    );
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let Some(line) = lines.next() else { break };
        let line = line.map_err(|e| Notice::error(e.to_string()))?;
        let command = match SellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(notice) => {
                println!("{notice}");
                continue;
            }
        };

        match handle(state, &mut screen, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(notice) => println!("{notice}"),
        }
    }
    Ok(())
}

/// Products, customers and company details, fetched together.
async fn load(state: &AppState, screen: &mut SellScreen) -> CliResult<()> {
    let (products, customers, company) = tokio::try_join!(
        state.api.sales_products(),
        state.api.sales_customers(),
        state.api.company_details(),
    )
    .map_err(|e| Notice::from_client(e, "Failed to load data"))?;
    screen.products = products;
    screen.customers = customers;
    screen.company = company;
    Ok(())
}

async fn reload_products(state: &AppState, screen: &mut SellScreen) -> CliResult<()> {
    screen.products = state
        .api
        .sales_products()
        .await
        .map_err(|e| Notice::from_client(e, "Failed to load products"))?;
    Ok(())
}

async fn handle(state: &AppState, screen: &mut SellScreen, command: SellCommand) -> CliResult<Flow> {
    debug!(?command, "sell");
    match command {
        SellCommand::Search(query) => {
            for p in screen.search_products(&query) {
                println!(
                    "  [{}] {}{}  {}  stock {}",
                    p.item_id(),
                    p.product_name,
                    if p.is_bundle { " (Bundle)" } else { "" },
                    p.product_price,
                    p.product_stock
                );
            }
        }
        SellCommand::Add(id) => println!("{}", screen.add(id)?),
        SellCommand::Quantity(id, qty) => println!("{}", screen.set_quantity(id, &qty)?),
        SellCommand::Remove(id) => println!("{}", screen.remove(id)?),
        SellCommand::Customers(query) => {
            for c in screen.search_customers(&query) {
                println!("  [{}] {}  {}", c.id, c.name, c.phone);
            }
        }
        SellCommand::SelectCustomer(id) => println!("{}", screen.select_customer(id)?),
        SellCommand::ClearCustomer => {
            screen.session.deselect_customer();
            println!("Customer cleared");
        }
        SellCommand::NewCustomer(customer) => {
            let created = state
                .api
                .add_customer(&customer)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to add customer"))?;
            println!("{}", Notice::success(format!("Customer {} added", created.name)));
            screen.customer_created(created);
        }
        SellCommand::Vat(input) => {
            let rate = screen.set_vat(&input)?;
            println!("VAT {}%", rate.percent_label());
        }
        SellCommand::Discount(input) => {
            screen.set_discount(&input);
            println!("Discount {}", screen.session.discount());
        }
        SellCommand::Pay(payment) => {
            screen.session.set_payment_type(payment);
            println!("Payment: {}", screen.session.payment_type());
        }
        SellCommand::Cart => println!("{}", screen.render_cart()),
        SellCommand::Checkout => {
            let sale = submit_sale(
                &state.api,
                &mut screen.session,
                &screen.company,
                Local::now().naive_local(),
            )
            .await
            .map_err(|e| Notice::from_client(e, CHECKOUT_FAILED))?;
            println!("{}", sale.receipt.render());
            println!(
                "{}",
                Notice::success(format!("Sale completed. Order {}", sale.order_number))
            );
            reload_products(state, screen).await?;
        }
        SellCommand::Refresh => {
            load(state, screen).await?;
            println!(
                "Loaded {} products, {} customers",
                screen.products.len(),
                screen.customers.len()
            );
        }
        SellCommand::Help => println!("{HELP}"),
        SellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
