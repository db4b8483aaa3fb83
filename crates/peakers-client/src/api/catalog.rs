//! Products, bundles, categories, materials and recipes.

use peakers_core::catalog::{
    merge_catalog, BundleDraft, CatalogEntry, Category, Material, NewCategory, ProductForm,
    ProductsPage, RawBundle, RawProduct, RecipeEntry, RecipeRequest,
};
use peakers_core::serde_helpers::null_as_default;
use peakers_core::ItemId;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct CategoryList {
    #[serde(default, deserialize_with = "null_as_default")]
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct MaterialList {
    #[serde(default, deserialize_with = "null_as_default")]
    materials: Vec<Material>,
}

#[derive(Deserialize)]
struct Recipe {
    #[serde(default, deserialize_with = "null_as_default")]
    recipe: Vec<RecipeEntry>,
}

impl ApiClient {
    /// `GET /get-products?page=N` (1-based).
    pub async fn products_page(&self, page: usize) -> ClientResult<ProductsPage> {
        self.get(&format!("/get-products?page={page}")).await
    }

    /// Every product, page by page.
    ///
    /// Page 1 gives the total and the page size; the rest are fetched in
    /// order, one at a time.
    pub async fn all_products(&self) -> ClientResult<Vec<RawProduct>> {
        let first = self.products_page(1).await?;
        let pages = first.page_count();
        debug!(total = first.total_products, pages, "Fetching product pages");

        let mut products = first.products;
        for page in 2..=pages {
            products.extend(self.products_page(page).await?.products);
        }
        Ok(products)
    }

    /// `GET /get-bundles`.
    pub async fn bundles(&self) -> ClientResult<Vec<RawBundle>> {
        let bundles: Option<Vec<RawBundle>> = self.get("/get-bundles").await?;
        Ok(bundles.unwrap_or_default())
    }

    /// Products and bundles as one list.
    pub async fn catalog(&self) -> ClientResult<Vec<CatalogEntry>> {
        let products = self.all_products().await?;
        let bundles = self.bundles().await?;
        Ok(merge_catalog(products, bundles))
    }

    /// `GET /get-categories`.
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        let list: CategoryList = self.get("/get-categories").await?;
        Ok(list.categories)
    }

    /// `GET /get-materials`.
    pub async fn materials(&self) -> ClientResult<Vec<Material>> {
        let list: MaterialList = self.get("/get-materials").await?;
        Ok(list.materials)
    }

    /// `POST /add-product`, or `PUT /updating-product/{id}` when `product_id`
    /// is set.
    pub async fn save_product(&self, product_id: Option<i64>, form: &ProductForm) -> ClientResult<()> {
        let payload = form.to_payload()?;
        let _: serde_json::Value = match product_id {
            Some(id) => self.put(&format!("/updating-product/{id}"), &payload).await?,
            None => self.post("/add-product", &payload).await?,
        };
        info!(?product_id, name = %payload.product_name, "Product saved");
        Ok(())
    }

    /// `POST /add-bundle`, or `PUT /update-bundle/{bundle_id}` when editing.
    pub async fn save_bundle(&self, bundle: Option<ItemId>, draft: &BundleDraft) -> ClientResult<()> {
        let payload = draft.to_payload()?;
        let _: serde_json::Value = match bundle {
            Some(id) => {
                self.put(&format!("/update-bundle/{}", id.raw()), &payload)
                    .await?
            }
            None => self.post("/add-bundle", &payload).await?,
        };
        info!(bundle = ?bundle, items = payload.bundle_items.len(), "Bundle saved");
        Ok(())
    }

    /// `POST /add-category`.
    pub async fn add_category(&self, category: &NewCategory) -> ClientResult<()> {
        let _: serde_json::Value = self.post("/add-category", category).await?;
        info!(name = %category.category_name, "Category added");
        Ok(())
    }

    /// `GET /get-recipe/{product_id}`.
    pub async fn recipe(&self, product_id: i64) -> ClientResult<Vec<RecipeEntry>> {
        let recipe: Recipe = self.get(&format!("/get-recipe/{product_id}")).await?;
        Ok(recipe.recipe)
    }

    /// `POST /add-recipe` with the entries that have a usable quantity.
    ///
    /// Fails without sending when none do.
    pub async fn save_recipe(&self, product_id: i64, entries: &[RecipeEntry]) -> ClientResult<usize> {
        let request = RecipeRequest::build(product_id, entries)?;
        let _: serde_json::Value = self.post("/add-recipe", &request).await?;
        info!(product_id, materials = request.materials.len(), "Recipe saved");
        Ok(request.materials.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::decode;

    #[test]
    fn test_bundles_accept_null() {
        let bundles: Option<Vec<RawBundle>> = decode("/get-bundles", "null").unwrap();
        assert!(bundles.is_none());

        let bundles: Option<Vec<RawBundle>> = decode(
            "/get-bundles",
            r#"[{"bundle_id": 7, "product_name": "Lunch Combo", "product_price": "350.00",
                 "buying_price": null, "product_stock": 4,
                 "items": [{"product_id": 1, "quantity": 2}], "products_count": 1}]"#,
        )
        .unwrap();
        let entries = merge_catalog(Vec::new(), bundles.unwrap());
        assert_eq!(entries[0].id.to_string(), "bundle-7");
    }

    #[test]
    fn test_recipe_decodes_text_quantities() {
        let recipe: Recipe = decode(
            "/get-recipe/3",
            r#"{"recipe": [{"material_id": 1, "material_name": "Flour", "quantity": "0.25"},
                           {"material_id": 2, "quantity": null}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.recipe[0].quantity, Some(0.25));
        assert_eq!(recipe.recipe[1].quantity, None);
    }

    #[tokio::test]
    async fn test_empty_recipe_is_not_sent() {
        let api = ApiClient::new(&crate::config::ClientConfig::default(), "db").unwrap();
        let entries = vec![RecipeEntry {
            material_id: 1,
            material_name: None,
            quantity: Some(f64::NAN),
        }];
        let err = api.save_recipe(3, &entries).await.unwrap_err();
        assert!(err.user_message("x").contains("No valid"));
    }
}
