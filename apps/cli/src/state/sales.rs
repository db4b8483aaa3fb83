//! State and command grammar for the interactive `sell` loop.
//!
//! Everything here is local; the loop in `commands::sales` does the
//! fetching and posting.

use std::fmt::Write as _;

use peakers_core::validation::{parse_discount, parse_quantity};
use peakers_core::{
    CompanyDetails, Customer, ItemId, NewCustomer, PaymentType, SaleDefaults, SaleProduct,
    SalesSession, VatRate, CURRENCY_LABEL,
};

use crate::error::{CliResult, Notice};

pub const HELP: &str = "\
commands:
  search [text]              list products (name, price or id)
  add <id>                   add one of a product (bundles: bundle-<id>)
  qty <id> <n>               set a cart line's quantity
  remove <id>                drop a cart line
  customers [text]           list customers
  customer <id>|none         select or clear the customer
  new-customer <name> [| phone | email | address]
  vat <percent>              VAT for this sale
  discount <amount>          discount for this sale
  pay mpesa|cash|bank        payment type
  cart                       show the cart and totals
  checkout                   submit the sale
  refresh                    reload products and customers
  help                       this text
  quit                       leave";

// =============================================================================
// Command Grammar
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SellCommand {
    Search(String),
    Add(ItemId),
    Quantity(ItemId, String),
    Remove(ItemId),
    Customers(String),
    SelectCustomer(i64),
    ClearCustomer,
    NewCustomer(NewCustomer),
    Vat(String),
    Discount(String),
    Pay(PaymentType),
    Cart,
    Checkout,
    Refresh,
    Help,
    Quit,
}

impl SellCommand {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> CliResult<Option<SellCommand>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => SellCommand::Search(rest.to_string()),
            "add" | "a" => SellCommand::Add(item_id(rest)?),
            "qty" | "q" => {
                let (id, qty) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| Notice::validation("usage: qty <id> <n>"))?;
                SellCommand::Quantity(item_id(id)?, qty.trim().to_string())
            }
            "remove" | "rm" => SellCommand::Remove(item_id(rest)?),
            "customers" => SellCommand::Customers(rest.to_string()),
            "customer" => match rest.to_ascii_lowercase().as_str() {
                "none" | "clear" => SellCommand::ClearCustomer,
                _ => SellCommand::SelectCustomer(rest.parse().map_err(|_| {
                    Notice::validation("usage: customer <id>|none")
                })?),
            },
            "new-customer" => SellCommand::NewCustomer(new_customer(rest)),
            "vat" => SellCommand::Vat(rest.to_string()),
            "discount" => SellCommand::Discount(rest.to_string()),
            "pay" => {
                let payment = PaymentType::from(rest);
                if !PaymentType::CHECKOUT_OPTIONS.contains(&payment) {
                    return Err(Notice::validation("Payment must be Mpesa, Cash or Bank"));
                }
                SellCommand::Pay(payment)
            }
            "cart" | "c" => SellCommand::Cart,
            "checkout" => SellCommand::Checkout,
            "refresh" => SellCommand::Refresh,
            "help" | "?" => SellCommand::Help,
            "quit" | "exit" => SellCommand::Quit,
            other => {
                return Err(Notice::validation(format!(
                    "Unknown command '{other}'. Type 'help'."
                )))
            }
        };
        Ok(Some(command))
    }
}

fn item_id(text: &str) -> CliResult<ItemId> {
    text.trim()
        .parse()
        .map_err(|_| Notice::validation(format!("'{}' is not a product id", text.trim())))
}

/// `name | phone | email | address`, trailing fields optional.
fn new_customer(rest: &str) -> NewCustomer {
    let mut parts = rest.split('|').map(|p| p.trim().to_string());
    NewCustomer {
        customer_name: parts.next().unwrap_or_default(),
        phone: parts.next().unwrap_or_default(),
        email: parts.next().unwrap_or_default(),
        address: parts.next().unwrap_or_default(),
    }
}

// =============================================================================
// Sell Screen
// =============================================================================

/// The sales screen between commands.
#[derive(Debug, Clone, Default)]
pub struct SellScreen {
    pub products: Vec<SaleProduct>,
    pub customers: Vec<Customer>,
    pub company: CompanyDetails,
    pub session: SalesSession,
}

impl SellScreen {
    pub fn new(defaults: SaleDefaults) -> Self {
        SellScreen {
            session: SalesSession::new(defaults),
            ..Default::default()
        }
    }

    pub fn search_products(&self, query: &str) -> Vec<&SaleProduct> {
        self.products.iter().filter(|p| p.matches(query)).collect()
    }

    pub fn search_customers(&self, query: &str) -> Vec<&Customer> {
        self.customers.iter().filter(|c| c.matches(query)).collect()
    }

    pub fn add(&mut self, id: ItemId) -> CliResult<String> {
        let product = self
            .products
            .iter()
            .find(|p| p.item_id() == id)
            .ok_or_else(|| Notice::error(format!("Product {id} not found")))?;
        let line = self.session.cart.add(product)?;
        Ok(format!("{} x{} in cart", line.name(), line.quantity()))
    }

    pub fn set_quantity(&mut self, id: ItemId, input: &str) -> CliResult<String> {
        let quantity = parse_quantity(input)
            .ok_or_else(|| Notice::validation(format!("'{}' is not a whole number", input.trim())))?;
        let line = self.session.cart.set_quantity(id, quantity)?;
        Ok(format!("{} x{} in cart", line.name(), line.quantity()))
    }

    pub fn remove(&mut self, id: ItemId) -> CliResult<String> {
        let line = self.session.cart.remove(id)?;
        Ok(format!("Removed {}", line.name()))
    }

    pub fn select_customer(&mut self, id: i64) -> CliResult<String> {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Notice::error(format!("Customer {id} not found")))?;
        let message = format!("Customer: {}", customer.name);
        self.session.select_customer(customer);
        Ok(message)
    }

    /// A customer just created on the server: listed first and selected.
    pub fn customer_created(&mut self, customer: Customer) {
        self.customers.insert(0, customer.clone());
        self.session.select_customer(customer);
    }

    pub fn set_vat(&mut self, input: &str) -> CliResult<VatRate> {
        let rate = VatRate::parse_percent(input)?;
        self.session.set_vat_rate(rate);
        Ok(rate)
    }

    pub fn set_discount(&mut self, input: &str) {
        self.session.set_discount(parse_discount(input));
    }

    /// Cart lines, selection and totals.
    pub fn render_cart(&self) -> String {
        let session = &self.session;
        let mut out = String::new();

        let _ = writeln!(out, "Cart ({} items)", session.cart.total_quantity());
        if session.cart.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for line in session.cart.lines() {
            let _ = writeln!(
                out,
                "  [{}] {} x {}{} @ {} = {}",
                line.item_id(),
                line.quantity(),
                line.name(),
                if line.is_bundle() { " (Bundle)" } else { "" },
                line.unit_price(),
                line.subtotal()
            );
        }

        let totals = session.totals();
        let customer = session.customer().map_or("none", |c| c.name.as_str());
        let _ = writeln!(out, "Customer: {customer}");
        let _ = writeln!(out, "Subtotal: {CURRENCY_LABEL} {}", totals.subtotal);
        let _ = writeln!(
            out,
            "VAT ({}%): {CURRENCY_LABEL} {}",
            session.vat_rate().percent_label(),
            totals.vat
        );
        let _ = writeln!(out, "Discount: {CURRENCY_LABEL} {}", totals.discount);
        let _ = writeln!(out, "Total: {CURRENCY_LABEL} {}", totals.total);
        let _ = write!(out, "Payment: {}", session.payment_type());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peakers_core::Money;

    fn screen() -> SellScreen {
        let mut screen = SellScreen::new(SaleDefaults::default());
        screen.products = vec![
            SaleProduct {
                product_id: 1,
                product_name: "Bread".to_string(),
                product_price: Money::from_major(100),
                product_stock: 5,
                is_bundle: false,
            },
            SaleProduct {
                product_id: 1,
                product_name: "Breakfast Combo".to_string(),
                product_price: Money::from_major(250),
                product_stock: 2,
                is_bundle: true,
            },
            SaleProduct {
                product_id: 2,
                product_name: "Milk".to_string(),
                product_price: Money::from_major(60),
                product_stock: 0,
                is_bundle: false,
            },
        ];
        screen.customers = vec![Customer {
            id: 42,
            name: "Wanjiru".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        }];
        screen
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SellCommand::parse("   ").unwrap(), None);
        assert_eq!(
            SellCommand::parse("add bundle-1").unwrap(),
            Some(SellCommand::Add(ItemId::Bundle(1)))
        );
        assert_eq!(
            SellCommand::parse("qty 1 3").unwrap(),
            Some(SellCommand::Quantity(ItemId::Product(1), "3".to_string()))
        );
        assert_eq!(
            SellCommand::parse("customer none").unwrap(),
            Some(SellCommand::ClearCustomer)
        );
        assert_eq!(
            SellCommand::parse("pay cash").unwrap(),
            Some(SellCommand::Pay(PaymentType::Cash))
        );
        assert!(SellCommand::parse("pay card").is_err());
        assert!(SellCommand::parse("add soda").is_err());
        assert!(SellCommand::parse("dance").is_err());
    }

    #[test]
    fn test_parse_new_customer() {
        let cmd = SellCommand::parse("new-customer Jane Doe | 0712 345 678").unwrap();
        match cmd {
            Some(SellCommand::NewCustomer(c)) => {
                assert_eq!(c.customer_name, "Jane Doe");
                assert_eq!(c.phone, "0712 345 678");
                assert_eq!(c.email, "");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_products_and_bundles_are_separate_lines() {
        let mut screen = screen();
        screen.add(ItemId::Product(1)).unwrap();
        screen.add(ItemId::Bundle(1)).unwrap();
        screen.add(ItemId::Product(1)).unwrap();
        assert_eq!(screen.session.cart.line_count(), 2);
        assert_eq!(screen.session.cart.total_quantity(), 3);

        let notice = screen.add(ItemId::Product(2)).unwrap_err();
        assert_eq!(notice.title, "Out of Stock");

        let notice = screen.add(ItemId::Product(99)).unwrap_err();
        assert_eq!(notice.message, "Product 99 not found");
    }

    #[test]
    fn test_quantity_rules() {
        let mut screen = screen();
        screen.add(ItemId::Product(1)).unwrap();

        assert_eq!(screen.set_quantity(ItemId::Product(1), "x").unwrap_err().title, "Validation Error");
        assert_eq!(screen.set_quantity(ItemId::Product(1), "9").unwrap_err().title, "Stock Limit");
        assert_eq!(screen.set_quantity(ItemId::Product(1), "0").unwrap_err().title, "Cart");
        screen.set_quantity(ItemId::Product(1), "5").unwrap();
        assert_eq!(screen.session.cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_render_with_totals() {
        let mut screen = screen();
        screen.add(ItemId::Product(1)).unwrap();
        screen.add(ItemId::Product(1)).unwrap();
        screen.select_customer(42).unwrap();
        screen.set_discount("10");
        screen.set_vat("16").unwrap();

        let text = screen.render_cart();
        assert!(text.contains("[1] 2 x Bread @ 100.00 = 200.00"));
        assert!(text.contains("Customer: Wanjiru"));
        assert!(text.contains("VAT (16%): Ksh 32.00"));
        assert!(text.contains("Total: Ksh 222.00"));
        assert!(text.ends_with("Payment: Mpesa"));
    }

    #[test]
    fn test_created_customer_is_selected_and_listed_first() {
        let mut screen = screen();
        screen.customer_created(Customer {
            id: 50,
            name: "Achieng".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        });
        assert_eq!(screen.customers[0].id, 50);
        assert_eq!(screen.session.customer().map(|c| c.id), Some(50));
        assert!(screen.set_vat("abc").is_err());
    }
}
