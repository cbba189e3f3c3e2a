//! Inventory CLI commands

use clap::Subcommand;

use super::{parse_money, parse_optional_money};
use crate::display::{format_product_details, format_product_list};
use crate::error::{JayloyError, JayloyResult};
use crate::models::{Product, ProductPatch};
use crate::services::{InventoryService, ProductFilter};
use crate::storage::Storage;

/// Inventory subcommands
#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add a product
    Add {
        /// Product name
        name: String,
        /// Stock keeping unit
        sku: String,
        /// Selling price per unit
        #[arg(long)]
        price: String,
        /// Purchase cost per unit
        #[arg(long)]
        cost: String,
        /// Units on hand
        #[arg(long, default_value = "0")]
        stock: i64,
        /// Reorder when stock falls to this level
        #[arg(long, default_value = "0")]
        reorder: i64,
        /// Category
        #[arg(short, long, default_value = "General")]
        category: String,
        /// Unit of measure
        #[arg(long)]
        unit: Option<String>,
    },
    /// List products
    List {
        /// Filter by name or SKU
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show product details
    Show {
        /// SKU or ID
        product: String,
    },
    /// Edit a product
    Edit {
        /// SKU or ID
        product: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        cost: Option<String>,
        #[arg(long)]
        reorder: Option<i64>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Receive (positive) or issue (negative) stock
    Adjust {
        /// SKU or ID
        product: String,
        /// Change in units on hand
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Delete a product
    Delete {
        /// SKU or ID
        product: String,
    },
}

/// Handle an inventory command
pub fn handle_inventory_command(storage: &Storage, cmd: InventoryCommands) -> JayloyResult<()> {
    let service = InventoryService::new(storage);

    let find = |input: &str| -> JayloyResult<Product> {
        service
            .find(input)?
            .ok_or_else(|| JayloyError::product_not_found(input))
    };

    match cmd {
        InventoryCommands::Add {
            name,
            sku,
            price,
            cost,
            stock,
            reorder,
            category,
            unit,
        } => {
            let mut product = Product::new(
                name,
                sku,
                parse_money(&price, "price")?,
                parse_money(&cost, "cost")?,
                stock,
                category,
            );
            product.reorder_level = reorder;
            if let Some(unit) = unit {
                product.unit = unit;
            }
            let product = service.create(product)?;
            println!("Added product: {} ({})", product.name, product.sku);
            println!("  Stock value: {}", product.stock_value());
        }

        InventoryCommands::List { search, category } => {
            let filter = ProductFilter { search, category };
            print!("{}", format_product_list(&service.list(&filter)?));
        }

        InventoryCommands::Show { product } => {
            print!("{}", format_product_details(&find(&product)?));
        }

        InventoryCommands::Edit {
            product,
            name,
            price,
            cost,
            reorder,
            category,
        } => {
            let found = find(&product)?;
            let patch = ProductPatch {
                name,
                price: parse_optional_money(price.as_deref(), "price")?,
                cost: parse_optional_money(cost.as_deref(), "cost")?,
                reorder_level: reorder,
                category,
                ..Default::default()
            };
            let updated = service.update(found.id, patch)?;
            println!("Updated product: {} ({})", updated.name, updated.sku);
        }

        InventoryCommands::Adjust { product, delta } => {
            let found = find(&product)?;
            let updated = service.adjust_stock(found.id, delta)?;
            println!(
                "{}: {} {} in stock ({})",
                updated.sku,
                updated.stock,
                updated.unit,
                updated.stock_status()
            );
        }

        InventoryCommands::Delete { product } => {
            let found = find(&product)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted product: {} ({})", deleted.name, deleted.sku);
        }
    }

    Ok(())
}
