use crate::error::Result;
use crate::models::{Role, Session};
use crate::pages::{Page, LOGIN_PATH};
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Unchecked,
    Authorized(Session),
    Redirecting { target: &'static str },
}

/// One-shot role check guarding a page. Once settled, the state does not
/// change for the lifetime of the gate, even if the session does.
#[derive(Debug, Clone)]
pub struct RouteGate {
    allowed: &'static [Role],
    state: GateState,
}

impl RouteGate {
    pub fn new(allowed: &'static [Role]) -> Self {
        Self {
            allowed,
            state: GateState::Unchecked,
        }
    }

    pub fn for_page(page: Page) -> Self {
        Self::new(page.allowed_roles())
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub async fn check(&mut self, sessions: &SessionManager) -> Result<&GateState> {
        if self.state == GateState::Unchecked {
            let session = sessions.resolve().await?;
            self.state = self.decide(session);
        }
        Ok(&self.state)
    }

    fn decide(&self, session: Option<Session>) -> GateState {
        match session {
            None => {
                tracing::debug!("No session, redirecting to {}", LOGIN_PATH);
                GateState::Redirecting { target: LOGIN_PATH }
            }
            Some(session) if !self.allowed.contains(&session.role) => {
                tracing::debug!("Role {} not allowed here, redirecting", session.role);
                GateState::Redirecting { target: LOGIN_PATH }
            }
            Some(session) => GateState::Authorized(session),
        }
    }

    /// Renders `content` only when authorized. Unchecked and redirecting gates
    /// render nothing.
    pub fn render<T>(&self, content: impl FnOnce(&Session) -> T) -> Option<T> {
        match &self.state {
            GateState::Authorized(session) => Some(content(session)),
            _ => None,
        }
    }
}
