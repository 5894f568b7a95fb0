//! Port for persisting the session token between runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Session;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// The backing storage could not be read or written.
        Io { message: String } => "token store I/O failed: {message}",
        /// A stored record exists but could not be decoded.
        Corrupt { message: String } => "stored session is unreadable: {message}",
    }
}

/// Durable slot holding at most one session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored session, if any.
    async fn load(&self) -> Result<Option<Session>, TokenStoreError>;

    /// Replace the stored session.
    async fn save(&self, session: &Session) -> Result<(), TokenStoreError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Process-local token store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    slot: RwLock<Option<Session>>,
}

impl InMemoryTokenStore {
    /// Store pre-seeded with `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<Session>, TokenStoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), TokenStoreError> {
        *self.slot.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.slot.write().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{AuthToken, Role, User, UserDraft, UserId};

    fn session() -> Session {
        let user = User::new(UserDraft {
            id: UserId::new("p1").expect("id"),
            name: "Lucia".to_owned(),
            email: "lucia@example.com".to_owned(),
            role: Role::Paciente,
            confirmado: true,
            image: None,
        });
        Session::new(user, AuthToken::new("tok").expect("token"))
    }

    #[tokio::test]
    async fn save_load_clear_cycle() {
        let store = InMemoryTokenStore::default();
        assert!(store.load().await.expect("load").is_none());

        store.save(&session()).await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some(session()));

        store.clear().await.expect("clear");
        store.clear().await.expect("clearing twice is fine");
        assert!(store.load().await.expect("load").is_none());
    }
}
