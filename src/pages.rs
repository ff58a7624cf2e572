use serde::Serialize;

use crate::models::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Products,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Dashboard, Page::Products];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Products => "/products",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Products => "Products",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard.html",
            Page::Products => "products.html",
        }
    }

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Page::Dashboard => &[Role::Manager],
            Page::Products => &[Role::Manager, Role::StoreKeeper],
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Sidebar entries visible to `role`, in display order.
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    Page::ALL
        .iter()
        .filter(|page| page.permits(role))
        .map(|page| MenuItem {
            label: page.label(),
            path: page.path(),
        })
        .collect()
}

/// Where a freshly signed-in user is sent.
pub fn landing_page(role: Role) -> Page {
    match role {
        Role::Manager => Page::Dashboard,
        Role::StoreKeeper => Page::Products,
    }
}
