use serde::Serialize;

use crate::inventory::InventoryStore;
use crate::models::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyOverview {
    pub month: &'static str,
    pub stock: u32,
    pub sales: u32,
}

/// Stock-in vs sales figures shown on the overview chart.
pub const OVERVIEW_SERIES: [MonthlyOverview; 6] = [
    MonthlyOverview { month: "January", stock: 186, sales: 80 },
    MonthlyOverview { month: "February", stock: 305, sales: 200 },
    MonthlyOverview { month: "March", stock: 237, sales: 120 },
    MonthlyOverview { month: "April", stock: 73, sales: 190 },
    MonthlyOverview { month: "May", stock: 209, sales: 130 },
    MonthlyOverview { month: "June", stock: 214, sales: 140 },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_products: usize,
    pub total_stock: u64,
    pub category_count: usize,
    pub active_users: usize,
    pub low_stock_threshold: u32,
    pub low_stock: Vec<Product>,
    pub overview: Vec<MonthlyOverview>,
}

impl DashboardSummary {
    pub fn build(inventory: &InventoryStore, active_users: usize, low_stock_threshold: u32) -> Self {
        let products = inventory.products();
        Self {
            total_products: products.len(),
            total_stock: products.iter().map(|p| u64::from(p.quantity)).sum(),
            category_count: inventory.categories().len(),
            active_users,
            low_stock_threshold,
            low_stock: products
                .iter()
                .filter(|p| p.quantity < low_stock_threshold)
                .cloned()
                .collect(),
            overview: OVERVIEW_SERIES.to_vec(),
        }
    }
}
