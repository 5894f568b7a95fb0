//! Session lifecycle: login, logout, rehydration, forced expiry.
//!
//! [`SessionManager`] is the single owner of "who is logged in". Changes are
//! published through a `tokio::sync::watch` channel so the navigation router
//! and badge can follow them without polling.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::ports::{AuthGateway, TokenStore, TokenStoreError};
use crate::domain::{Error, LoginCredentials, Session, User};

fn map_store_error(error: TokenStoreError) -> Error {
    Error::internal(error.to_string())
}

/// Owns the current session and its persisted copy.
pub struct SessionManager {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Option<Session>>,
}

impl SessionManager {
    /// Create a manager with no session loaded.
    pub fn new(auth: Arc<dyn AuthGateway>, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self { auth, store, state }
    }

    /// Exchange credentials for a session, persist it, and publish it.
    ///
    /// On failure the current session is left untouched and the error is
    /// returned for the caller to render.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let session = self.auth.login(credentials).await.map_err(Error::from)?;
        self.store.save(&session).await.map_err(map_store_error)?;
        info!(user = %session.user_id(), role = %session.role(), "session started");
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Forget the session locally and on disk.
    pub async fn logout(&self) -> Result<(), Error> {
        self.store.clear().await.map_err(map_store_error)?;
        if self.state.send_replace(None).is_some() {
            info!("session ended");
        }
        Ok(())
    }

    /// Restore a persisted session at startup.
    ///
    /// An unreadable record is discarded and treated as no session.
    pub async fn rehydrate(&self) -> Result<Option<Session>, Error> {
        let loaded = match self.store.load().await {
            Ok(loaded) => loaded,
            Err(TokenStoreError::Corrupt { message }) => {
                warn!(%message, "discarding unreadable stored session");
                self.store.clear().await.map_err(map_store_error)?;
                None
            }
            Err(err) => return Err(map_store_error(err)),
        };
        if let Some(session) = &loaded {
            info!(user = %session.user_id(), "session restored");
        }
        self.state.send_replace(loaded.clone());
        Ok(loaded)
    }

    /// Drop the session after the API rejected its token.
    ///
    /// Always clears the in-memory session, even when the store cannot be
    /// cleared.
    pub async fn expire(&self) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "could not clear stored session on expiry");
        }
        if self.state.send_replace(None).is_some() {
            warn!("session expired");
        }
    }

    /// Pass `result` through, expiring the session first if it is an
    /// authorization failure.
    pub async fn check<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.expire().await;
            }
        }
        result
    }

    /// Replace the user snapshot after a profile edit, keeping the token.
    pub async fn replace_user(&self, user: User) -> Result<(), Error> {
        let Some(current) = self.current() else {
            return Err(Error::unauthorized("no active session"));
        };
        let session = Session::new(user, current.token().clone());
        self.store.save(&session).await.map_err(map_store_error)?;
        self.state.send_replace(Some(session));
        Ok(())
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Current session or an unauthorized error.
    pub fn require(&self) -> Result<Session, Error> {
        self.current()
            .ok_or_else(|| Error::unauthorized("inicia sesión para continuar"))
    }

    /// Receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[path = "session_service_tests.rs"]
mod tests;
