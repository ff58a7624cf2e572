use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::models::{Role, UserRecord};

/// Source of user accounts. Calling code only sees this trait so the static
/// list can later be replaced by a real backend.
#[async_trait]
pub trait UserDirectory: std::fmt::Debug + Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn count(&self) -> Result<usize>;
}

static SEED_USERS: Lazy<Vec<UserRecord>> = Lazy::new(|| {
    vec![
        UserRecord::new("manager@example.com", "manager123", Role::Manager),
        UserRecord::new("storekeeper@example.com", "store123", Role::StoreKeeper),
    ]
});

/// Fixed in-process credential list, loaded once.
#[derive(Debug, Clone)]
pub struct StaticUserDirectory {
    users: Vec<UserRecord>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn seeded() -> Self {
        Self::new(SEED_USERS.clone())
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }
}

impl Default for StaticUserDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_seed_users_by_exact_email() {
        let directory = StaticUserDirectory::seeded();
        let manager = directory.find_by_email("manager@example.com").await.unwrap();
        assert_eq!(manager.map(|u| u.role), Some(Role::Manager));

        // exact match only
        assert!(directory.find_by_email("Manager@example.com").await.unwrap().is_none());
        assert!(directory.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(directory.count().await.unwrap(), 2);
    }
}
