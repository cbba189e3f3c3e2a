//! Product display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::Product;

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Level")]
    level: String,
}

pub fn format_product_list(products: &[Product]) -> String {
    let rows = products
        .iter()
        .map(|p| ProductRow {
            sku: p.sku.clone(),
            name: truncate(&p.name, 24),
            category: p.category.clone(),
            price: p.price.to_string(),
            stock: format!("{} {}", p.stock, p.unit),
            value: p.stock_value().to_string(),
            level: p.stock_status().to_string(),
        })
        .collect();
    render_table(rows, "No products found.\n")
}

pub fn format_product_details(product: &Product) -> String {
    let mut output = String::new();

    output.push_str(&format!("Product: {}\n", product.name));
    output.push_str(&format!("  ID:            {}\n", product.id));
    output.push_str(&format!("  SKU:           {}\n", product.sku));
    output.push_str(&format!("  Category:      {}\n", product.category));
    if !product.description.is_empty() {
        output.push_str(&format!("  Description:   {}\n", product.description));
    }
    output.push_str(&format!("  Price:         {}\n", product.price));
    output.push_str(&format!("  Cost:          {}\n", product.cost));
    output.push_str(&format!("  Stock:         {} {}\n", product.stock, product.unit));
    output.push_str(&format!("  Reorder level: {}\n", product.reorder_level));
    output.push_str(&format!("  Stock value:   {}\n", product.stock_value()));
    output.push_str(&format!("  Level:         {}\n", product.stock_status()));

    output
}
