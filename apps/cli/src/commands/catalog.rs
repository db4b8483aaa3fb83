//! `products`, `categories` and `recipe`.

use peakers_core::catalog::{self, BundleDraft, CatalogEntry, NewCategory, ProductForm, RecipeEntry};
use peakers_core::{ItemId, ValidationError};
use std::fmt::Write as _;
use tracing::debug;

use crate::error::{CliResult, Notice};
use crate::state::AppState;
use crate::{CategoryAction, ProductAction, ProductArgs, RecipeAction};

pub async fn list(state: &AppState, search: &str) -> CliResult<()> {
    debug!(search, "products");
    let entries = state
        .api
        .catalog()
        .await
        .map_err(|e| Notice::from_client(e, "Failed to load products"))?;
    println!("{}", render_catalog(&catalog::search(&entries, search)));
    Ok(())
}

pub fn render_catalog(entries: &[&CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No products found".to_string();
    }
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut line = format!(
            "{:>10}  {:<28} {:>10}  stock {:<5} {}",
            entry.id.to_string(),
            entry.name,
            entry.price.to_string(),
            entry.stock,
            entry.category_name.as_deref().unwrap_or("-")
        );
        if entry.is_bundle() {
            let _ = write!(line, "  ({} products)", entry.products_count);
        } else if entry.has_recipe() {
            let _ = write!(line, "  ({} ingredients)", entry.ingredients_count);
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub async fn run(state: &AppState, action: ProductAction) -> CliResult<()> {
    match action {
        ProductAction::Add(args) => {
            let form = product_form(&args);
            state
                .api
                .save_product(None, &form)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save product"))?;
            println!("Product added");
        }
        ProductAction::Update { id, product } => {
            let form = product_form(&product);
            state
                .api
                .save_product(Some(id), &form)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save product"))?;
            println!("Product {id} updated");
        }
        ProductAction::Bundle { id, items, price } => {
            let draft = bundle_draft(&items, &price)?;
            state
                .api
                .save_bundle(id, &draft)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save bundle"))?;
            match id {
                Some(id) => println!("Bundle {id} updated"),
                None => println!("Bundle created with {} products", draft.items().len()),
            }
        }
    }
    Ok(())
}

fn product_form(args: &ProductArgs) -> ProductForm {
    let mut form = ProductForm {
        product_number: args.number.clone(),
        product_name: args.name.clone(),
        product_price: args.price.clone(),
        product_description: args.description.clone(),
        product_stock: args.stock.clone(),
        category_id: args.category,
        unit: args.unit.clone(),
        expiry_date: args.expiry.clone(),
        ingredients: Vec::new(),
    };
    for &material in &args.ingredients {
        form.toggle_ingredient(material);
    }
    form
}

/// Builds a bundle from `<product_id>[:<qty>]` arguments.
pub fn bundle_draft(items: &[String], price: &str) -> CliResult<BundleDraft> {
    let mut draft = BundleDraft::default();
    draft.selling_price = price.to_string();
    for raw in items {
        let (id, qty) = raw.split_once(':').unwrap_or((raw.as_str(), "1"));
        let product_id: i64 = id.trim().parse().map_err(|_| ValidationError::InvalidFormat {
            field: "Bundle item".to_string(),
            reason: format!("'{raw}' is not <product_id>[:<qty>]"),
        })?;
        if !draft.contains(product_id) {
            draft.toggle(ItemId::Product(product_id))?;
        }
        draft.set_quantity(product_id, qty);
    }
    Ok(draft)
}

pub async fn categories(state: &AppState, action: CategoryAction) -> CliResult<()> {
    match action {
        CategoryAction::List => {
            let categories = state
                .api
                .categories()
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load categories"))?;
            for c in categories {
                println!("{:>4}  {}", c.category_id, c.category_name);
            }
        }
        CategoryAction::Add { name } => {
            let category = NewCategory::new(&name)?;
            state
                .api
                .add_category(&category)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to add category"))?;
            println!("Category '{}' added", category.category_name);
        }
    }
    Ok(())
}

pub async fn recipe(state: &AppState, action: RecipeAction) -> CliResult<()> {
    match action {
        RecipeAction::Show { product_id } => {
            let entries = state
                .api
                .recipe(product_id)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load recipe"))?;
            if entries.is_empty() {
                println!("No recipe for product {product_id}");
            }
            for e in entries {
                println!(
                    "{:>4}  {:<24} {}",
                    e.material_id,
                    e.material_name.as_deref().unwrap_or("-"),
                    e.quantity.map(|q| q.to_string()).unwrap_or_default()
                );
            }
        }
        RecipeAction::Save {
            product_id,
            materials,
        } => {
            let entries = recipe_entries(&materials)?;
            let saved = state
                .api
                .save_recipe(product_id, &entries)
                .await
                .map_err(|e| Notice::from_client(e, "Failed to save recipe"))?;
            println!("Recipe saved ({saved} materials)");
        }
        RecipeAction::Materials => {
            let materials = state
                .api
                .materials()
                .await
                .map_err(|e| Notice::from_client(e, "Failed to load materials"))?;
            for m in materials {
                println!("{:>4}  {:<24} {}", m.material_id, m.material_name, m.unit);
            }
        }
    }
    Ok(())
}

/// Parses `<material_id>=<quantity>` arguments.
///
/// A quantity that is not a number is kept as missing and dropped when the
/// recipe is built.
pub fn recipe_entries(materials: &[String]) -> CliResult<Vec<RecipeEntry>> {
    materials
        .iter()
        .map(|raw| -> CliResult<RecipeEntry> {
            let (id, qty) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
            let material_id = id.trim().parse().map_err(|_| ValidationError::InvalidFormat {
                field: "Material".to_string(),
                reason: format!("'{raw}' is not <material_id>=<quantity>"),
            })?;
            Ok(RecipeEntry {
                material_id,
                material_name: None,
                quantity: qty.trim().parse().ok(),
            })
        })
        .collect()
}
