//! Unread-notification badge.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{NotificationsGateway, or_empty};
use crate::domain::{Error, NewNotification, Notification, NotificationId, UserId, unread_count};

/// Fetches notifications and derives the badge count.
#[derive(Clone)]
pub struct BadgeService {
    gateway: Arc<dyn NotificationsGateway>,
}

impl BadgeService {
    /// Create a service backed by `gateway`.
    pub fn new(gateway: Arc<dyn NotificationsGateway>) -> Self {
        Self { gateway }
    }

    /// Notifications addressed to `user`; a missing list is empty.
    pub async fn list(&self, user: &UserId) -> Result<Vec<Notification>, Error> {
        or_empty(self.gateway.list_for_user(user).await).map_err(Error::from)
    }

    /// Unread count for `user`. Failures are logged and shown as zero.
    pub async fn unread_for(&self, user: &UserId) -> usize {
        match self.list(user).await {
            Ok(notifications) => unread_count(&notifications),
            Err(err) => {
                warn!(user = %user, error = %err, "could not fetch notifications for badge");
                0
            }
        }
    }

    /// Send `description` to `user`. Blank text is rejected locally.
    pub async fn notify(&self, user: &UserId, description: &str) -> Result<(), Error> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::invalid_request("La notificación no puede estar vacía"));
        }
        let notification = NewNotification {
            user: user.clone(),
            description: description.to_owned(),
        };
        self.gateway.create(&notification).await.map_err(Error::from)
    }

    /// Delete one notification and return the remaining list and badge.
    ///
    /// The deleted id is excluded even if the server still lists it.
    pub async fn delete_and_recount(
        &self,
        user: &UserId,
        id: &NotificationId,
    ) -> Result<(Vec<Notification>, usize), Error> {
        self.gateway.delete(id).await.map_err(Error::from)?;
        let remaining: Vec<_> = self
            .list(user)
            .await?
            .into_iter()
            .filter(|notification| notification.id() != id)
            .collect();
        let unread = unread_count(&remaining);
        Ok((remaining, unread))
    }
}
