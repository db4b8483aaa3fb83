//! `suppliers`.

use chrono::Local;
use peakers_core::suppliers::{self, PaymentForm, PaymentHistory, SupplierForm, SupplierProductForm};
use peakers_core::CURRENCY_LABEL;
use std::fmt::Write as _;
use tracing::debug;

use crate::error::{CliResult, Notice};
use crate::state::AppState;
use crate::{SupplierAction, SupplierArgs};

pub async fn run(state: &AppState, action: SupplierAction) -> CliResult<()> {
    debug!(?action, "suppliers");
    let api = &state.api;
    match action {
        SupplierAction::List { search } => {
            let list = api
                .suppliers()
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load suppliers"))?;
            for s in suppliers::search(&list, &search) {
                println!(
                    "{:>4}  {:<24} {:<16} {:<14} {}",
                    s.supplier_id, s.supplier_name, s.contact_person, s.phone_number, s.email
                );
            }
        }
        SupplierAction::Show { id } => {
            let info = api
                .supplier(id)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load supplier"))?;
            println!("{}", info.supplier_name);
        }
        SupplierAction::Add(args) => {
            api.save_supplier(None, &supplier_form(args))
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save supplier"))?;
            println!("Supplier added");
        }
        SupplierAction::Update { id, supplier } => {
            api.save_supplier(Some(id), &supplier_form(supplier))
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save supplier"))?;
            println!("Supplier {id} updated");
        }
        SupplierAction::Delete { id } => {
            api.delete_supplier(id)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to delete supplier"))?;
            println!("Supplier {id} deleted");
        }
        SupplierAction::Products { supplier_id } => {
            let products = api
                .supplier_products(supplier_id)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load supplier products"))?;
            for p in products {
                let date = p
                    .supply_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default();
                println!(
                    "{:>4}  {:<24} {:>6} @ {:>10}  {}",
                    p.supplier_product_id, p.product_name, p.stock_supplied, p.price.to_string(), date
                );
            }
        }
        SupplierAction::AddProduct {
            supplier_id,
            product,
            stock,
            price,
            date,
        } => {
            let mut form = SupplierProductForm::starting_on(Local::now().date_naive());
            form.product_id = product;
            form.stock_supplied = stock;
            form.price = price;
            if let Some(date) = date {
                form.supply_date = date;
            }
            api.add_supplier_product(supplier_id, &form)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to add supplier product"))?;
            println!("Delivery recorded");
        }
        SupplierAction::Pay {
            supplier_id,
            supplier_product_id,
            amount,
            method,
            reference,
        } => {
            let form = PaymentForm {
                amount,
                method,
                reference,
            };
            let receipt = api
                .pay_supplier(supplier_id, supplier_product_id, &form)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to record payment"))?;
            println!(
                "{}",
                receipt.message.as_deref().unwrap_or("Payment recorded")
            );
            println!(
                "Balance remaining: {CURRENCY_LABEL} {}",
                receipt.balance_remaining
            );
        }
        SupplierAction::History {
            supplier_id,
            supplier_product_id,
        } => {
            let history = api
                .payment_history(supplier_id, supplier_product_id)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load payment history"))?;
            println!("{}", render_history(&history));
        }
    }
    Ok(())
}

fn supplier_form(args: SupplierArgs) -> SupplierForm {
    SupplierForm {
        supplier_name: args.name,
        contact_person: args.contact,
        phone_number: args.phone,
        email: args.email,
        address: args.address,
    }
}

pub fn render_history(history: &PaymentHistory) -> String {
    let mut out = String::new();
    if !history.supplier_info.supplier_name.is_empty() {
        let _ = writeln!(out, "{}", history.supplier_info.supplier_name);
    }
    if history.payments.is_empty() {
        let _ = writeln!(out, "No payments yet");
    }
    for p in &history.payments {
        let date = p
            .payment_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<10} {:>10}  {:<6} {}",
            date,
            p.amount.to_string(),
            p.payment_method,
            p.reference.as_deref().unwrap_or("")
        );
    }
    let _ = writeln!(out, "Total paid: {CURRENCY_LABEL} {}", history.total_paid);
    let _ = write!(
        out,
        "Balance remaining: {CURRENCY_LABEL} {}",
        history.balance_remaining
    );
    out
}
