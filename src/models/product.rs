//! Inventory product model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ProductId;
use super::money::Money;

/// Stock level classification used by the inventory report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Out,
    Low,
    Good,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Out => f.pad("Out"),
            Self::Low => f.pad("Low"),
            Self::Good => f.pad("Good"),
        }
    }
}

/// A stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: String,
    /// Selling price per unit
    pub price: Money,
    /// Purchase cost per unit
    pub cost: Money,
    pub stock: i64,
    #[serde(default)]
    pub reorder_level: i64,
    pub category: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "pcs".to_string()
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Money,
        cost: Money,
        stock: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            sku: sku.into(),
            description: String::new(),
            price,
            cost,
            stock,
            reorder_level: 0,
            category: category.into(),
            unit: default_unit(),
        }
    }

    /// Cost value of the units on hand
    pub fn stock_value(&self) -> Money {
        self.cost.times(self.stock)
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.stock == 0 {
            StockStatus::Out
        } else if self.stock <= self.reorder_level {
            StockStatus::Low
        } else {
            StockStatus::Good
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name is required".into());
        }
        if self.sku.trim().is_empty() {
            return Err("SKU is required".into());
        }
        if self.price.is_negative() || self.cost.is_negative() {
            return Err("Price and cost cannot be negative".into());
        }
        if self.stock < 0 || self.reorder_level < 0 {
            return Err("Stock and reorder level cannot be negative".into());
        }
        Ok(())
    }
}

/// Partial update for a product
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub cost: Option<Money>,
    pub stock: Option<i64>,
    pub reorder_level: Option<i64>,
    pub category: Option<String>,
    pub unit: Option<String>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(v) = self.name {
            product.name = v;
        }
        if let Some(v) = self.sku {
            product.sku = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.cost {
            product.cost = v;
        }
        if let Some(v) = self.stock {
            product.stock = v;
        }
        if let Some(v) = self.reorder_level {
            product.reorder_level = v;
        }
        if let Some(v) = self.category {
            product.category = v;
        }
        if let Some(v) = self.unit {
            product.unit = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, reorder_level: i64) -> Product {
        let mut p = Product::new(
            "Printer paper",
            "PAP-A4",
            Money::from_cents(600),
            Money::from_cents(450),
            stock,
            "Office",
        );
        p.reorder_level = reorder_level;
        p
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(product(10, 2).stock_value().cents(), 4500);
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(product(0, 5).stock_status(), StockStatus::Out);
        assert_eq!(product(5, 5).stock_status(), StockStatus::Low);
        assert_eq!(product(6, 5).stock_status(), StockStatus::Good);
    }

    #[test]
    fn test_validate_negative_stock() {
        assert!(product(-1, 0).validate().is_err());
    }
}
