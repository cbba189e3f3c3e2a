//! Inventory report
//!
//! Stock valuation at cost, reorder alerts and the most valuable products.

use serde::Serialize;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::export::escape_csv;
use crate::models::{Money, Product, StockStatus};
use crate::storage::Storage;

use super::finance::CategoryData;
use super::palette_color;

/// Products listed in the top-by-value table
pub const TOP_PRODUCTS: usize = 10;

/// A product with its stock valuation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductValue {
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub value: Money,
}

impl From<&Product> for ProductValue {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            stock: product.stock,
            value: product.stock_value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub product_count: usize,
    pub total_value: Money,
    /// In stock but at or below the reorder level
    pub low_stock: Vec<ProductValue>,
    pub out_of_stock: Vec<ProductValue>,
    /// Stock value per category, first-seen order
    pub categories: Vec<CategoryData>,
    /// Highest stock value first
    pub top_products: Vec<ProductValue>,
}

impl InventoryReport {
    pub fn generate(storage: &Storage) -> JayloyResult<Self> {
        Ok(Self::compute(&storage.products.get_all()?))
    }

    pub fn compute(products: &[Product]) -> Self {
        let by_status = |status: StockStatus| -> Vec<ProductValue> {
            products
                .iter()
                .filter(|p| p.stock_status() == status)
                .map(ProductValue::from)
                .collect()
        };

        let mut categories: Vec<CategoryData> = Vec::new();
        for product in products {
            let value = product.stock_value();
            match categories.iter_mut().find(|c| c.name == product.category) {
                Some(existing) => existing.value += value,
                None => {
                    let color = palette_color(categories.len());
                    categories.push(CategoryData {
                        name: product.category.clone(),
                        value,
                        color,
                    });
                }
            }
        }

        let mut top_products: Vec<ProductValue> = products.iter().map(ProductValue::from).collect();
        // Stable sort keeps insertion order among equal values
        top_products.sort_by(|a, b| b.value.cmp(&a.value));
        top_products.truncate(TOP_PRODUCTS);

        Self {
            product_count: products.len(),
            total_value: products.iter().map(|p| p.stock_value()).sum(),
            low_stock: by_status(StockStatus::Low),
            out_of_stock: by_status(StockStatus::Out),
            categories,
            top_products,
        }
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Inventory Report\n");
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!("{:<36} {:>18}\n", "Products", self.product_count));
        output.push_str(&format!("{:<36} {:>18}\n", "Total stock value", self.total_value));
        output.push_str(&format!("{:<36} {:>18}\n", "Low stock", self.low_stock.len()));
        output.push_str(&format!("{:<36} {:>18}\n", "Out of stock", self.out_of_stock.len()));

        if !self.categories.is_empty() {
            output.push_str("\nValue by Category\n");
            output.push_str(&"-".repeat(56));
            output.push('\n');
            for category in &self.categories {
                output.push_str(&format!("{:<36} {:>18}\n", category.name, category.value));
            }
        }

        if !self.top_products.is_empty() {
            output.push_str("\nTop Products by Value\n");
            output.push_str(&"-".repeat(56));
            output.push('\n');
            for product in &self.top_products {
                output.push_str(&format!(
                    "{:<24} {:<12} {:>5} {:>12}\n",
                    truncate(&product.name, 24),
                    product.sku,
                    product.stock,
                    product.value
                ));
            }
        }

        for (title, rows) in [("Low Stock", &self.low_stock), ("Out of Stock", &self.out_of_stock)] {
            if rows.is_empty() {
                continue;
            }
            output.push_str(&format!("\n{}\n", title));
            output.push_str(&"-".repeat(56));
            output.push('\n');
            for product in rows {
                output.push_str(&format!("{:<36} {:>5} left\n", product.name, product.stock));
            }
        }

        output
    }

    /// Category valuation rows
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> JayloyResult<()> {
        let io = |e: std::io::Error| JayloyError::Export(e.to_string());
        writeln!(writer, "Category,Value,Color").map_err(io)?;
        for category in &self.categories {
            writeln!(
                writer,
                "{},{:.2},{}",
                escape_csv(&category.name),
                category.value.to_decimal(),
                category.color
            )
            .map_err(io)?;
        }
        writeln!(writer, "Total,{:.2},", self.total_value.to_decimal()).map_err(io)?;
        Ok(())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::PALETTE;

    fn product(name: &str, category: &str, cost_cents: i64, stock: i64, reorder: i64) -> Product {
        let mut p = Product::new(
            name,
            format!("SKU-{}", name),
            Money::from_cents(cost_cents * 2),
            Money::from_cents(cost_cents),
            stock,
            category,
        );
        p.reorder_level = reorder;
        p
    }

    #[test]
    fn test_totals_and_alerts() {
        let products = vec![
            product("Paper", "Office", 450, 10, 2),
            product("Toner", "Office", 3000, 1, 2),
            product("Chair", "Furniture", 12000, 0, 1),
        ];

        let report = InventoryReport::compute(&products);

        assert_eq!(report.total_value.cents(), 4500 + 3000);
        assert_eq!(report.low_stock.len(), 1);
        assert_eq!(report.low_stock[0].name, "Toner");
        assert_eq!(report.out_of_stock.len(), 1);
        assert_eq!(report.out_of_stock[0].name, "Chair");
    }

    #[test]
    fn test_category_values_and_colors() {
        let products = vec![
            product("Paper", "Office", 100, 5, 0),
            product("Desk", "Furniture", 1000, 1, 0),
            product("Pens", "Office", 50, 10, 0),
        ];

        let report = InventoryReport::compute(&products);

        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].name, "Office");
        assert_eq!(report.categories[0].value.cents(), 1000);
        assert_eq!(report.categories[0].color, PALETTE[0]);
        assert_eq!(report.categories[1].color, PALETTE[1]);
    }

    #[test]
    fn test_top_products_limited_and_sorted() {
        let products: Vec<_> = (1..=12)
            .map(|i| product(&format!("P{}", i), "Misc", 100 * i, 1, 0))
            .collect();

        let report = InventoryReport::compute(&products);

        assert_eq!(report.top_products.len(), TOP_PRODUCTS);
        assert_eq!(report.top_products[0].name, "P12");
        assert_eq!(report.top_products[9].name, "P3");
    }

    #[test]
    fn test_empty_inventory() {
        let report = InventoryReport::compute(&[]);
        assert!(report.total_value.is_zero());
        assert!(report.top_products.is_empty());
        assert!(report.format_terminal().starts_with("Inventory Report"));
    }
}
