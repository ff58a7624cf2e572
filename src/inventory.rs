//! The working product list for the lifetime of the process.
//!
//! Records are reseeded from static data on every start; nothing here talks to
//! persistent storage.

use once_cell::sync::Lazy;

use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product};

/// Category selection matching every record.
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_CATEGORY: &str = "General";

static SEED_PRODUCTS: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        Product::new("1", "Rice", "Grains", 120),
        Product::new("2", "Sugar", "Essentials", 80),
        Product::new("3", "Wheat Flour", "Grains", 50),
        Product::new("4", "Palm Oil", "Oils", 200),
        Product::new("5", "Salt", "Essentials", 150),
        Product::new("6", "Milk", "Dairy", 60),
        Product::new("7", "Butter", "Dairy", 30),
        Product::new("8", "Cheese", "Dairy", 25),
        Product::new("9", "Apples", "Fruits", 100),
        Product::new("10", "Bananas", "Fruits", 150),
        Product::new("11", "Tomatoes", "Vegetables", 90),
        Product::new("12", "Potatoes", "Vegetables", 200),
        Product::new("13", "Onions", "Vegetables", 180),
        Product::new("14", "Chicken", "Meat", 40),
        Product::new("15", "Mutton", "Meat", 20),
    ]
});

#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    products: Vec<Product>,
}

impl InventoryStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn seeded() -> Self {
        Self::new(SEED_PRODUCTS.clone())
    }

    /// Drops every change and goes back to the seed list.
    pub fn reset(&mut self) {
        self.products = SEED_PRODUCTS.clone();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self, candidate: NewProduct) -> Result<Product> {
        let name = validate_name(&candidate.name)?;
        let quantity = validate_quantity(candidate.quantity)?;
        self.ensure_unique_name(&name, None)?;

        let category = match candidate.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            other => other.to_string(),
        };

        let product = Product {
            id: self.next_id(),
            name,
            category,
            quantity,
        };
        tracing::info!("Added product {} ({})", product.id, product.name);
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replaces the record with the same id. Unknown ids are ignored and
    /// reported as `Ok(false)`.
    pub fn update(&mut self, mut record: Product) -> Result<bool> {
        let Some(index) = self.products.iter().position(|p| p.id == record.id) else {
            tracing::debug!("Update for unknown product id {} ignored", record.id);
            return Ok(false);
        };
        record.name = validate_name(&record.name)?;
        self.ensure_unique_name(&record.name, Some(record.id.as_str()))?;

        self.products[index] = record;
        Ok(true)
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let removed = self.products.len() != before;
        if removed {
            tracing::info!("Deleted product {}", id);
        }
        removed
    }

    pub fn filter(&self, query: &str, category: &str) -> Vec<&Product> {
        filter_products(&self.products, query, category)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category) {
                seen.push(product.category.clone());
            }
        }
        seen
    }

    fn next_id(&self) -> String {
        let max = self
            .products
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> Result<()> {
        let wanted = name.to_lowercase();
        let taken = self
            .products
            .iter()
            .filter(|p| Some(p.id.as_str()) != except_id)
            .any(|p| p.name.to_lowercase() == wanted);
        if taken {
            return Err(AppError::Validation(format!(
                "A product named '{}' already exists.",
                name
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Product name cannot be empty.".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Converts a submitted quantity into the stored unsigned form.
pub fn validate_quantity(quantity: i64) -> Result<u32> {
    if quantity < 0 {
        return Err(AppError::Validation("Quantity cannot be negative.".to_string()));
    }
    u32::try_from(quantity).map_err(|_| AppError::Validation("Quantity is too large.".to_string()))
}

/// Records whose name or id contains `query` (case-insensitive) and whose
/// category equals `category`, unless `category` is [`ALL_CATEGORIES`].
pub fn filter_products<'a>(records: &'a [Product], query: &str, category: &str) -> Vec<&'a Product> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.id.to_lowercase().contains(&needle)
        })
        .filter(|p| category == ALL_CATEGORIES || p.category == category)
        .collect()
}

/// The 1-based page `page_number` of `records`. Pages past the end, page 0
/// and a zero page size all give an empty slice.
pub fn paginate<T>(records: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = match (page_number - 1).checked_mul(page_size) {
        Some(start) if start < records.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}
