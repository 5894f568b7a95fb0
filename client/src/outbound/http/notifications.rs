//! Notification endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::gateway::ApiGateway;
use crate::domain::ports::{GatewayError, NotificationsGateway};
use crate::domain::{NewNotification, Notification, NotificationId, UserId};

#[async_trait]
impl NotificationsGateway for ApiGateway {
    async fn create(&self, notification: &NewNotification) -> Result<(), GatewayError> {
        self.send_json_unit(Method::POST, "api/notifications", notification)
            .await
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, GatewayError> {
        self.get_json(&format!("api/notifications/user/{user}"))
            .await
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), GatewayError> {
        self.delete_path(&format!("api/notifications/{id}")).await
    }
}
