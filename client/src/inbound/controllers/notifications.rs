//! Notification list and badge.

use std::sync::Arc;

use super::checked;
use crate::domain::{
    BadgeService, Error, Notification, NotificationId, SessionManager, UserId, unread_count,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the notifications screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationsView {
    pub items: Vec<Notification>,
    pub unread: usize,
}

/// Controller for the "Alertas" tab.
pub struct NotificationsController {
    sessions: Arc<SessionManager>,
    badges: BadgeService,
    view: ViewSlot<NotificationsView>,
}

impl NotificationsController {
    /// Create a controller with an empty list.
    pub fn new(sessions: Arc<SessionManager>, badges: BadgeService) -> Self {
        Self {
            sessions,
            badges,
            view: ViewSlot::default(),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<NotificationsView> {
        &self.view
    }

    /// Reload the notifications of the logged-in user.
    pub async fn refresh(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let result = match self.sessions.require() {
            Ok(session) => self.badges.list(session.user_id()).await,
            Err(err) => Err(err),
        };
        let items = checked(&self.sessions, result, "Error al cargar las notificaciones").await?;
        updater.apply(|view| {
            view.unread = unread_count(&items);
            view.items = items;
        });
        Ok(())
    }

    /// Send a notification to `user` on behalf of the logged-in staff member.
    pub async fn send(&self, user: &UserId, description: &str) -> Toast {
        let result = match self.sessions.require() {
            Ok(_) => self.badges.notify(user, description).await,
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "Error al enviar la notificación").await {
            Ok(()) => Toast::success("Notificación enviada"),
            Err(toast) => toast,
        }
    }

    /// Delete one notification and update the badge.
    pub async fn delete(&self, id: &NotificationId) -> Toast {
        let updater = self.view.updater();
        let result = match self.sessions.require() {
            Ok(session) => self.badges.delete_and_recount(session.user_id(), id).await,
            Err(err) => Err::<(Vec<Notification>, usize), Error>(err),
        };
        match checked(&self.sessions, result, "Error al eliminar la notificación").await {
            Ok((items, unread)) => {
                updater.apply(|view| {
                    view.items = items;
                    view.unread = unread;
                });
                Toast::success("Notificación eliminada")
            }
            Err(toast) => toast,
        }
    }
}
