//! Inventory service

use crate::error::{JayloyError, JayloyResult};
use crate::models::{Product, ProductId, ProductPatch};
use crate::storage::Storage;

/// Listing filter; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name or SKU
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.sku.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |c| &product.category == c);
        matches_search && matches_category
    }
}

/// Service for product and stock management
pub struct InventoryService<'a> {
    storage: &'a Storage,
}

impl<'a> InventoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, mut product: Product) -> JayloyResult<Product> {
        product.name = product.name.trim().to_string();
        product.sku = product.sku.trim().to_string();
        product.validate().map_err(JayloyError::Validation)?;

        self.storage.add_record(&self.storage.products, product)
    }

    pub fn get(&self, id: ProductId) -> JayloyResult<Option<Product>> {
        self.storage.products.get(id)
    }

    /// Find a product by id prefix or SKU
    pub fn find(&self, identifier: &str) -> JayloyResult<Option<Product>> {
        self.storage.products.find(identifier)
    }

    pub fn list(&self, filter: &ProductFilter) -> JayloyResult<Vec<Product>> {
        Ok(self
            .storage
            .products
            .get_all()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    pub fn update(&self, id: ProductId, patch: ProductPatch) -> JayloyResult<Product> {
        let before = self
            .get(id)?
            .ok_or_else(|| JayloyError::product_not_found(id.to_string()))?;

        let mut product = before.clone();
        patch.apply(&mut product);
        product.validate().map_err(JayloyError::Validation)?;

        self.storage
            .update_record(&self.storage.products, &before, product)
    }

    /// Receive (positive) or issue (negative) stock
    pub fn adjust_stock(&self, id: ProductId, delta: i64) -> JayloyResult<Product> {
        let current = self
            .get(id)?
            .ok_or_else(|| JayloyError::product_not_found(id.to_string()))?;

        let stock = current.stock + delta;
        if stock < 0 {
            return Err(JayloyError::Validation(format!(
                "Only {} {} of {} in stock",
                current.stock, current.unit, current.name
            )));
        }

        self.update(
            id,
            ProductPatch {
                stock: Some(stock),
                ..Default::default()
            },
        )
    }

    pub fn delete(&self, id: ProductId) -> JayloyResult<Product> {
        self.storage.delete_record(&self.storage.products, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::JayloyPaths;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = JayloyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn product(name: &str, sku: &str, category: &str) -> Product {
        Product::new(
            name,
            sku,
            Money::from_cents(600),
            Money::from_cents(450),
            10,
            category,
        )
    }

    #[test]
    fn test_create_and_find_by_sku() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InventoryService::new(&storage);
        let created = service.create(product("Paper", " PAP-A4 ", "Office")).unwrap();

        assert_eq!(created.sku, "PAP-A4");
        assert_eq!(service.find("pap-a4").unwrap().unwrap().id, created.id);
    }

    #[test]
    fn test_adjust_stock() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InventoryService::new(&storage);
        let created = service.create(product("Paper", "PAP-A4", "Office")).unwrap();

        assert_eq!(service.adjust_stock(created.id, -4).unwrap().stock, 6);
        assert_eq!(service.adjust_stock(created.id, 5).unwrap().stock, 11);
        assert!(service.adjust_stock(created.id, -12).unwrap_err().is_validation());
    }

    #[test]
    fn test_list_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InventoryService::new(&storage);
        service.create(product("Paper", "PAP-A4", "Office")).unwrap();
        service.create(product("Coffee beans", "COF-1", "Pantry")).unwrap();

        let pantry = service
            .list(&ProductFilter {
                category: Some("Pantry".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(pantry.len(), 1);

        let search = service
            .list(&ProductFilter {
                search: Some("pap".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(search[0].name, "Paper");
    }
}
