use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    StoreKeeper,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "MANAGER",
            Role::StoreKeeper => "STORE_KEEPER",
        }
    }

    /// Human readable label, e.g. "store keeper".
    pub fn label(&self) -> String {
        self.as_str().to_lowercase().replace('_', " ")
    }

    /// Adding and deleting catalogue entries is reserved for managers.
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Manager)
    }

    pub fn can_edit_products(&self) -> bool {
        true
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mock account. Passwords are plaintext on purpose; this is not a security model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl UserRecord {
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }
}

/// The signed-in identity. Serialized verbatim into persistent storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
}

impl Product {
    pub fn new(id: &str, name: &str, category: &str, quantity: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            quantity,
        }
    }
}

/// Input for adding a product. Quantity is signed so negative input can be rejected
/// with a validation error instead of a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: i64,
}

impl NewProduct {
    pub fn new(name: &str, category: &str, quantity: i64) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"MANAGER\"");
        assert_eq!(serde_json::to_string(&Role::StoreKeeper).unwrap(), "\"STORE_KEEPER\"");
        assert!(serde_json::from_str::<Role>("\"ADMIN\"").is_err());
    }

    #[test]
    fn session_layout_matches_storage_record() {
        let session = Session {
            token: "abc".into(),
            role: Role::StoreKeeper,
            email: "storekeeper@example.com".into(),
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "token": "abc",
                "role": "STORE_KEEPER",
                "email": "storekeeper@example.com"
            })
        );
    }

    #[test]
    fn only_managers_manage_catalog() {
        assert!(Role::Manager.can_manage_catalog());
        assert!(!Role::StoreKeeper.can_manage_catalog());
        assert!(Role::StoreKeeper.can_edit_products());
        assert_eq!(Role::StoreKeeper.label(), "store keeper");
    }

    #[test]
    fn theme_parses_known_values_only() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::default(), Theme::Light);
    }
}
