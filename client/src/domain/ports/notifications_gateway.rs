//! Driven port for notification endpoints.

use async_trait::async_trait;

use crate::domain::{NewNotification, Notification, NotificationId, UserId};

use super::GatewayError;

/// Notification operations exposed by the clinic API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsGateway: Send + Sync {
    /// `POST /api/notifications`.
    async fn create(&self, notification: &NewNotification) -> Result<(), GatewayError>;

    /// `GET /api/notifications/user/{id}`.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, GatewayError>;

    /// `DELETE /api/notifications/{id}`.
    async fn delete(&self, id: &NotificationId) -> Result<(), GatewayError>;
}
