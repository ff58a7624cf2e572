use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::directory::UserDirectory;
use crate::error::{AppError, Result};
use crate::models::Session;
use crate::pages::LOGIN_PATH;
use crate::storage::{PersistentStorage, SESSION_KEY};

const TOKEN_LEN: usize = 64;

/// Owns the single active session of this context. Only `login`, `logout` and
/// `restore_session` change it; everything else reads.
///
/// Each of those three holds `transition` while it writes storage and then
/// publishes, so the persisted record and the in-memory session always name
/// the same identity once a call returns.
#[derive(Debug)]
pub struct SessionManager {
    directory: Arc<dyn UserDirectory>,
    storage: Arc<dyn PersistentStorage>,
    current: watch::Sender<Option<Session>>,
    transition: Mutex<()>,
}

impl SessionManager {
    pub fn new(directory: Arc<dyn UserDirectory>, storage: Arc<dyn PersistentStorage>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            directory,
            storage,
            current,
            transition: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Observers see every login, logout and restore.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let user = match self.directory.find_by_email(email).await? {
            Some(user) if user.password == password => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let session = Session {
            token: generate_token(),
            role: user.role,
            email: user.email,
        };

        let _guard = self.transition.lock().await;
        self.storage
            .set_item(SESSION_KEY, serde_json::to_string(&session)?)
            .await?;
        self.current.send_replace(Some(session.clone()));

        tracing::info!("Signed in {} as {}", session.email, session.role);
        Ok(session)
    }

    /// Clears the session everywhere and returns the path to navigate to.
    pub async fn logout(&self) -> Result<&'static str> {
        let _guard = self.transition.lock().await;
        self.storage.remove_item(SESSION_KEY).await?;
        if let Some(previous) = self.current.send_replace(None) {
            tracing::info!("Signed out {}", previous.email);
        }
        Ok(LOGIN_PATH)
    }

    /// Re-reads the persisted session. A missing record is the signed-out
    /// state; an unreadable one is discarded.
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        let _guard = self.transition.lock().await;
        let restored = match self.storage.get_item(SESSION_KEY).await? {
            Some(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding unreadable persisted session: {}", e);
                    self.storage.remove_item(SESSION_KEY).await?;
                    None
                }
            },
            None => None,
        };

        if let Some(session) = &restored {
            tracing::debug!("Restored session for {}", session.email);
        }
        self.current.send_replace(restored.clone());
        Ok(restored)
    }

    /// The in-memory session, falling back to persisted storage.
    pub async fn resolve(&self) -> Result<Option<Session>> {
        match self.current() {
            Some(session) => Ok(Some(session)),
            None => self.restore_session().await,
        }
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
