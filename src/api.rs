use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardSummary;
use crate::models::{Product, Session, Theme};
use crate::pages::MenuItem;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenericResponse {
    pub success: bool,
    pub error_message: Option<String>,
}

impl GenericResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub error_message: Option<String>,
    pub session: Option<Session>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Session,
    pub role_label: String,
    pub menu: Vec<MenuItem>,
    pub can_manage_catalog: bool,
}

// Product list query string: /api/products?q=&category=&page=
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductPageResponse {
    pub success: bool,
    pub items: Vec<Product>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

/// Full replacement of a product; the id comes from the path.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub category: String,
    /// Signed so a negative edit reaches validation instead of failing to decode.
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub success: bool,
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub summary: DashboardSummary,
}
