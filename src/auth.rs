use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::{AppError, Result};
use crate::models::Session;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

// Extractor for the session cookie. Only the token is read here; whether it
// belongs to the active session is checked in the handler via validate().
pub struct LoggedUser {
    pub session_token: String,
}

impl FromRequest for LoggedUser {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.cookie(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => ready(Ok(LoggedUser {
                session_token: cookie.value().to_owned(),
            })),
            _ => {
                tracing::debug!("Session cookie missing.");
                ready(Err(AppError::Unauthorized.into()))
            }
        }
    }
}

impl LoggedUser {
    pub async fn validate(&self, state: &AppState) -> Result<Session> {
        match state.sessions.resolve().await? {
            Some(session) if session.token == self.session_token => Ok(session),
            Some(_) => {
                tracing::debug!("Session cookie does not match the active session");
                Err(AppError::Unauthorized)
            }
            None => Err(AppError::Unauthorized),
        }
    }

    /// Validates and additionally requires `allowed(role)`.
    pub async fn require(
        &self,
        state: &AppState,
        allowed: impl FnOnce(&Session) -> bool,
        action: &str,
    ) -> Result<Session> {
        let session = self.validate(state).await?;
        if !allowed(&session) {
            tracing::warn!("{} denied for role {}", action, session.role);
            return Err(AppError::Forbidden(format!(
                "{} is not permitted for the {} role",
                action,
                session.role.label()
            )));
        }
        Ok(session)
    }
}
