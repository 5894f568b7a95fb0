//! Login, logout, and password change.

use std::sync::Arc;

use tracing::warn;

use super::checked;
use crate::domain::ports::AuthGateway;
use crate::domain::{
    Error, ErrorCode, LoginCredentials, PasswordReset, Session, SessionManager,
};
use crate::inbound::Toast;

const LOGIN_FAILED: &str = "Usuario o contraseña incorrectos";

/// Drives the login and register screens and the logout button.
pub struct SessionController {
    sessions: Arc<SessionManager>,
    auth: Arc<dyn AuthGateway>,
}

impl SessionController {
    /// Create a controller over `sessions`.
    pub fn new(sessions: Arc<SessionManager>, auth: Arc<dyn AuthGateway>) -> Self {
        Self { sessions, auth }
    }

    /// Restore the persisted session at startup; failures mean logged out.
    pub async fn restore(&self) -> Option<Session> {
        match self.sessions.rehydrate().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not restore session");
                None
            }
        }
    }

    /// Log in with the form's email and password.
    ///
    /// The server's own message is shown when it rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Toast {
        let credentials = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => return Toast::error(err.to_string()),
        };
        match self.sessions.login(&credentials).await {
            Ok(_) => Toast::success("Inicio exitoso"),
            Err(err) => login_failure(&err),
        }
    }

    /// Log out and forget the stored session.
    pub async fn logout(&self) -> Toast {
        match checked(&self.sessions, self.sessions.logout().await, "Error al cerrar sesión").await {
            Ok(()) => Toast::success("Sesión cerrada"),
            Err(toast) => toast,
        }
    }

    /// Change the password of the logged-in account.
    pub async fn change_password(&self, password: &str) -> Toast {
        const FAILED: &str = "Error al cambiar la contraseña";
        let result = async {
            let session = self.sessions.require()?;
            let reset = PasswordReset::try_from_parts(session.token().expose(), password)
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            self.auth
                .change_password(&reset)
                .await
                .map_err(Error::from)
        }
        .await;
        match checked(&self.sessions, result, FAILED).await {
            Ok(()) => Toast::success("Contraseña actualizada correctamente!"),
            Err(toast) => toast,
        }
    }
}

fn login_failure(err: &Error) -> Toast {
    match err.code() {
        ErrorCode::ServiceUnavailable | ErrorCode::InternalError => Toast::error(LOGIN_FAILED),
        _ => Toast::error(err.message()),
    }
}
