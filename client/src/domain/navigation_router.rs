//! Follows session changes and recomputes the visible navigation.

use tokio::sync::watch;
use tracing::debug;

use crate::domain::{BadgeService, NavigationTree, Session, SessionManager, tree_for};

/// What the tab bar should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub tree: NavigationTree,
    pub unread: usize,
}

/// Recomputes the tree and badge each time the session changes.
pub struct NavigationRouter {
    sessions: watch::Receiver<Option<Session>>,
    badges: BadgeService,
}

impl NavigationRouter {
    /// Subscribe to `sessions`.
    pub fn new(sessions: &SessionManager, badges: BadgeService) -> Self {
        Self {
            sessions: sessions.subscribe(),
            badges,
        }
    }

    /// State for the session as it is now.
    pub async fn current(&mut self) -> NavigationState {
        let session = self.sessions.borrow_and_update().clone();
        self.state_for(session.as_ref()).await
    }

    /// Wait for the next session change and return the new state.
    ///
    /// Returns `None` once the session manager is gone.
    pub async fn next(&mut self) -> Option<NavigationState> {
        self.sessions.changed().await.ok()?;
        Some(self.current().await)
    }

    async fn state_for(&self, session: Option<&Session>) -> NavigationState {
        let tree = tree_for(session);
        let unread = match session {
            Some(session) if tree.shows_badge() => {
                self.badges.unread_for(session.user_id()).await
            }
            _ => 0,
        };
        debug!(?tree, unread, "navigation recomputed");
        NavigationState { tree, unread }
    }
}
