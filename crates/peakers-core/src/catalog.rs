//! # Catalog
//!
//! Products, bundles, categories, materials and recipes as the products
//! screen sees them.
//!
//! ## Merged Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /get-products?page=1..N          GET /get-bundles                  │
//! │        │                                     │                          │
//! │        ▼                                     ▼                          │
//! │  RawProduct ──► CatalogEntry         RawBundle ──► CatalogEntry         │
//! │                 id: Product(12)                    id: Bundle(3)        │
//! │                                                    category: "Bundle"   │
//! │        └──────────────── products ++ bundles ──────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::serde_helpers::{lenient_i64, lenient_i64_opt, null_as_default};
use crate::types::ItemId;
use crate::validation::{parse_positive_int_or_one, require};

/// Category label given to bundles in the merged listing.
pub const BUNDLE_CATEGORY: &str = "Bundle";

/// Reorder threshold sent with every product form.
pub const DEFAULT_REORDER_THRESHOLD: i64 = 5;

// =============================================================================
// Wire Records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProduct {
    #[serde(deserialize_with = "lenient_i64")]
    pub product_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "money::major_units")]
    pub product_price: Money,
    #[serde(default, with = "money::major_units")]
    pub buying_price: Money,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_stock: i64,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub category_id_fk: Option<i64>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub product_number: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub ingredients_count: Option<i64>,
}

/// One page of `GET /get-products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsPage {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total_products: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<RawProduct>,
}

impl ProductsPage {
    /// Pages to fetch in total, using this page's length as the page size.
    pub fn page_count(&self) -> usize {
        let total = usize::try_from(self.total_products).unwrap_or(0);
        crate::orders::total_pages(total, self.products.len())
    }
}

/// A component of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleItem {
    #[serde(deserialize_with = "lenient_i64")]
    pub product_id: i64,
    #[serde(default = "one", deserialize_with = "lenient_i64")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBundle {
    #[serde(deserialize_with = "lenient_i64")]
    pub bundle_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default, with = "money::major_units")]
    pub product_price: Money,
    #[serde(default, with = "money::major_units")]
    pub buying_price: Money,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub product_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<BundleItem>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub products_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "lenient_i64")]
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(deserialize_with = "lenient_i64")]
    pub material_id: i64,
    pub material_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// A product or bundle in the merged listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    pub price: Money,
    pub buying_price: Money,
    pub stock: i64,
    pub category_name: Option<String>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub product_number: Option<String>,
    pub unit: Option<String>,
    pub expiry_date: Option<String>,
    pub bundle_items: Vec<BundleItem>,
    pub products_count: i64,
    pub ingredients_count: i64,
}

impl CatalogEntry {
    pub fn is_bundle(&self) -> bool {
        self.id.is_bundle()
    }

    pub fn has_recipe(&self) -> bool {
        self.ingredients_count > 0
    }

    /// Name, description or category contains `query` (case-insensitive).
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&q));
        self.name.to_lowercase().contains(&q)
            || contains(self.description.as_deref())
            || contains(self.category_name.as_deref())
    }
}

impl From<RawProduct> for CatalogEntry {
    fn from(p: RawProduct) -> Self {
        CatalogEntry {
            id: ItemId::Product(p.product_id),
            name: p.product_name,
            price: p.product_price,
            buying_price: p.buying_price,
            stock: p.product_stock,
            category_name: p.category_name,
            category_id: p.category_id_fk,
            description: p.product_description,
            product_number: p.product_number,
            unit: p.unit,
            expiry_date: p.expiry_date,
            bundle_items: Vec::new(),
            products_count: 0,
            ingredients_count: p.ingredients_count.unwrap_or(0),
        }
    }
}

impl From<RawBundle> for CatalogEntry {
    fn from(b: RawBundle) -> Self {
        CatalogEntry {
            id: ItemId::Bundle(b.bundle_id),
            name: b.product_name,
            price: b.product_price,
            buying_price: b.buying_price,
            stock: b.product_stock,
            category_name: Some(BUNDLE_CATEGORY.to_string()),
            category_id: None,
            description: None,
            product_number: None,
            unit: None,
            expiry_date: None,
            bundle_items: b.items,
            products_count: b.products_count,
            ingredients_count: 0,
        }
    }
}

/// Products first, then bundles, each in backend order.
pub fn merge_catalog(products: Vec<RawProduct>, bundles: Vec<RawBundle>) -> Vec<CatalogEntry> {
    products
        .into_iter()
        .map(CatalogEntry::from)
        .chain(bundles.into_iter().map(CatalogEntry::from))
        .collect()
}

pub fn search<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|e| e.matches(query)).collect()
}

// =============================================================================
// Product Form
// =============================================================================

/// The add/edit product form as typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub product_number: String,
    pub product_name: String,
    pub product_price: String,
    pub product_description: String,
    pub product_stock: String,
    pub category_id: Option<i64>,
    pub unit: String,
    /// `YYYY-MM-DD` or empty.
    pub expiry_date: String,
    pub ingredients: Vec<i64>,
}

/// Body of `POST /add-product` and `PUT /updating-product/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub product_number: String,
    pub product_name: String,
    #[serde(with = "money::major_units")]
    pub product_price: Money,
    #[serde(with = "money::major_units")]
    pub buying_price: Money,
    pub product_description: String,
    pub product_stock: i64,
    pub category_id_fk: Option<i64>,
    pub unit: String,
    pub expiry_date: Option<String>,
    pub reorder_threshold: i64,
    pub ingredients: Vec<i64>,
}

impl ProductForm {
    /// Prefills the form from an existing product.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        ProductForm {
            product_number: entry.product_number.clone().unwrap_or_default(),
            product_name: entry.name.clone(),
            product_price: entry.price.to_string(),
            product_description: entry.description.clone().unwrap_or_default(),
            product_stock: entry.stock.to_string(),
            category_id: entry.category_id,
            unit: entry.unit.clone().unwrap_or_default(),
            expiry_date: entry
                .expiry_date
                .as_deref()
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
            ingredients: Vec::new(),
        }
    }

    /// Adds or removes a material from the ingredient list.
    pub fn toggle_ingredient(&mut self, material_id: i64) {
        match self.ingredients.iter().position(|&m| m == material_id) {
            Some(i) => {
                self.ingredients.remove(i);
            }
            None => self.ingredients.push(material_id),
        }
    }

    pub fn to_payload(&self) -> Result<ProductPayload, ValidationError> {
        require("Product name", &self.product_name)?;
        require("Selling price", &self.product_price)?;
        let product_price = Money::parse(&self.product_price).map_err(|_| {
            ValidationError::InvalidFormat {
                field: "Selling price".to_string(),
                reason: format!("'{}' is not a price", self.product_price.trim()),
            }
        })?;

        let stock_text = self.product_stock.trim();
        let product_stock = if stock_text.is_empty() {
            0
        } else {
            stock_text
                .parse()
                .map_err(|_| ValidationError::InvalidFormat {
                    field: "Stock".to_string(),
                    reason: format!("'{stock_text}' is not a whole number"),
                })?
        };

        let expiry = self.expiry_date.trim();
        if !expiry.is_empty() && chrono::NaiveDate::parse_from_str(expiry, "%Y-%m-%d").is_err() {
            return Err(ValidationError::InvalidFormat {
                field: "Expiry date".to_string(),
                reason: "use YYYY-MM-DD".to_string(),
            });
        }

        Ok(ProductPayload {
            product_number: self.product_number.trim().to_string(),
            product_name: self.product_name.trim().to_string(),
            product_price,
            buying_price: Money::zero(),
            product_description: self.product_description.trim().to_string(),
            product_stock,
            category_id_fk: self.category_id,
            unit: self.unit.trim().to_string(),
            expiry_date: (!expiry.is_empty()).then(|| expiry.to_string()),
            reorder_threshold: DEFAULT_REORDER_THRESHOLD,
            ingredients: self.ingredients.clone(),
        })
    }
}

// =============================================================================
// Bundle Builder
// =============================================================================

/// Body of `POST /add-bundle` and `PUT /update-bundle/{bundle_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlePayload {
    pub bundle_items: Vec<BundleItem>,
    #[serde(with = "money::major_units")]
    pub selling_price: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleDraft {
    items: Vec<BundleItem>,
    pub selling_price: String,
}

impl BundleDraft {
    /// Prefills the builder from an existing bundle.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        BundleDraft {
            items: entry.bundle_items.clone(),
            selling_price: entry.price.to_string(),
        }
    }

    pub fn items(&self) -> &[BundleItem] {
        &self.items
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Adds `product` with quantity 1, or removes it if already present.
    ///
    /// Bundles cannot be nested.
    pub fn toggle(&mut self, product: ItemId) -> Result<bool, ValidationError> {
        let product_id = match product {
            ItemId::Product(id) => id,
            ItemId::Bundle(_) => {
                return Err(ValidationError::InvalidFormat {
                    field: "Bundle item".to_string(),
                    reason: "a bundle cannot contain another bundle".to_string(),
                })
            }
        };

        if self.contains(product_id) {
            self.items.retain(|i| i.product_id != product_id);
            Ok(false)
        } else {
            self.items.push(BundleItem {
                product_id,
                quantity: 1,
            });
            Ok(true)
        }
    }

    /// Sets a member's quantity from text; anything unparsable counts as 1.
    pub fn set_quantity(&mut self, product_id: i64, input: &str) -> bool {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = parse_positive_int_or_one(input);
                true
            }
            None => false,
        }
    }

    pub fn to_payload(&self) -> Result<BundlePayload, ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::NoValidEntries {
                field: "bundle item".to_string(),
            });
        }
        require("Bundle selling price", &self.selling_price)?;
        let selling_price = Money::parse(&self.selling_price)?;
        Ok(BundlePayload {
            bundle_items: self.items.clone(),
            selling_price,
        })
    }
}

// =============================================================================
// Categories & Recipes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub category_name: String,
}

impl NewCategory {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        require("Category name", name)?;
        Ok(NewCategory {
            category_name: name.trim().to_string(),
        })
    }
}

/// One row of `GET /get-recipe/{product_id}` (and the editable recipe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    #[serde(deserialize_with = "lenient_i64")]
    pub material_id: i64,
    #[serde(default)]
    pub material_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub quantity: Option<f64>,
}

fn lenient_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeMaterial {
    pub material_id: i64,
    pub quantity: f64,
}

/// Body of `POST /add-recipe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRequest {
    pub product_id: i64,
    pub materials: Vec<RecipeMaterial>,
}

impl RecipeRequest {
    /// Keeps entries with a finite quantity `>= 0`; fails if none remain.
    pub fn build(product_id: i64, entries: &[RecipeEntry]) -> Result<Self, ValidationError> {
        let materials: Vec<RecipeMaterial> = entries
            .iter()
            .filter_map(|e| match e.quantity {
                Some(q) if q.is_finite() && q >= 0.0 => Some(RecipeMaterial {
                    material_id: e.material_id,
                    quantity: q,
                }),
                _ => None,
            })
            .collect();

        if materials.is_empty() {
            return Err(ValidationError::NoValidEntries {
                field: "ingredient quantity".to_string(),
            });
        }
        Ok(RecipeRequest {
            product_id,
            materials,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_product(id: i64, name: &str, category: Option<&str>) -> RawProduct {
        RawProduct {
            product_id: id,
            product_name: name.to_string(),
            product_price: Money::from_major(50),
            buying_price: Money::zero(),
            product_stock: 3,
            category_name: category.map(str::to_string),
            category_id_fk: None,
            product_description: Some("Freshly baked".to_string()),
            product_number: None,
            unit: None,
            expiry_date: Some("2025-01-31T00:00:00".to_string()),
            ingredients_count: Some(2),
        }
    }

    #[test]
    fn test_page_count_uses_first_page_length() {
        let page: ProductsPage = serde_json::from_str(
            r#"{"total_products": 45, "products": [
                {"product_id": 1}, {"product_id": 2}, {"product_id": 3}, {"product_id": 4},
                {"product_id": 5}, {"product_id": 6}, {"product_id": 7}, {"product_id": 8},
                {"product_id": 9}, {"product_id": 10}
            ]}"#,
        )
        .unwrap();
        assert_eq!(page.page_count(), 5);
        assert_eq!(ProductsPage::default().page_count(), 0);
    }

    #[test]
    fn test_merge_and_search() {
        let bundle: RawBundle = serde_json::from_str(
            r#"{"bundle_id": 4, "product_name": "Breakfast Combo", "product_price": "250.00",
                "buying_price": 0, "product_stock": 2,
                "items": [{"product_id": 1, "quantity": 2}], "products_count": 1}"#,
        )
        .unwrap();
        let entries = merge_catalog(
            vec![raw_product(1, "Bread", Some("Bakery")), raw_product(2, "Milk", None)],
            vec![bundle],
        );

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].id.to_string(), "bundle-4");
        assert_eq!(entries[2].category_name.as_deref(), Some("Bundle"));

        assert_eq!(search(&entries, "bakery").len(), 1);
        assert_eq!(search(&entries, "baked").len(), 2);
        assert_eq!(search(&entries, "bundle")[0].name, "Breakfast Combo");
        assert_eq!(search(&entries, "").len(), 3);
    }

    #[test]
    fn test_product_form_payload() {
        let entry = CatalogEntry::from(raw_product(1, "Bread", None));
        let mut form = ProductForm::from_entry(&entry);
        assert_eq!(form.expiry_date, "2025-01-31");
        form.toggle_ingredient(7);
        form.toggle_ingredient(8);
        form.toggle_ingredient(7);

        let payload = form.to_payload().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["product_price"], serde_json::json!(50.0));
        assert_eq!(json["buying_price"], serde_json::json!(0.0));
        assert_eq!(json["product_stock"], serde_json::json!(3));
        assert_eq!(json["ingredients"], serde_json::json!([8]));
        assert_eq!(json["reorder_threshold"], serde_json::json!(5));
    }

    #[test]
    fn test_product_form_rejects_bad_input() {
        let mut form = ProductForm {
            product_name: "Tea".to_string(),
            product_price: "cheap".to_string(),
            ..Default::default()
        };
        assert!(form.to_payload().is_err());

        form.product_price = "30".to_string();
        form.expiry_date = "31/01/2025".to_string();
        assert!(form.to_payload().is_err());

        form.expiry_date.clear();
        form.product_name = " ".to_string();
        assert!(matches!(
            form.to_payload(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_bundle_builder() {
        let mut draft = BundleDraft::default();
        assert!(draft.toggle(ItemId::Bundle(2)).is_err());
        assert!(draft.toggle(ItemId::Product(5)).unwrap());
        assert!(draft.toggle(ItemId::Product(6)).unwrap());
        assert!(!draft.toggle(ItemId::Product(5)).unwrap());
        assert!(draft.set_quantity(6, "3"));
        assert!(draft.set_quantity(6, "x"));
        assert_eq!(draft.items()[0].quantity, 1);
        assert!(!draft.set_quantity(99, "2"));

        assert!(draft.to_payload().is_err());
        draft.selling_price = "199.99".to_string();
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.bundle_items, vec![BundleItem { product_id: 6, quantity: 1 }]);
        assert_eq!(payload.selling_price.cents(), 19999);
    }

    #[test]
    fn test_recipe_keeps_only_valid_quantities() {
        let entries: Vec<RecipeEntry> = serde_json::from_str(
            r#"[{"material_id": 1, "quantity": "0.5"},
                {"material_id": 2, "quantity": -1},
                {"material_id": 3, "quantity": null},
                {"material_id": 4, "quantity": 0}]"#,
        )
        .unwrap();
        let req = RecipeRequest::build(10, &entries).unwrap();
        let ids: Vec<i64> = req.materials.iter().map(|m| m.material_id).collect();
        assert_eq!(ids, vec![1, 4]);

        assert!(matches!(
            RecipeRequest::build(10, &entries[1..3]),
            Err(ValidationError::NoValidEntries { .. })
        ));
    }

    #[test]
    fn test_category_name_required() {
        assert!(NewCategory::new("  ").is_err());
        assert_eq!(NewCategory::new(" Drinks ").unwrap().category_name, "Drinks");
    }
}
