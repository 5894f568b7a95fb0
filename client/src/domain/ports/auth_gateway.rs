//! Driven port for account endpoints: login, profiles, users, specialties.

use async_trait::async_trait;

use crate::domain::{
    LoginCredentials, NewProfile, PasswordReset, ProfileUpdate, Session, Specialty, User, UserId,
};

use super::GatewayError;

/// Account operations exposed by the clinic API.
///
/// Each method maps to exactly one HTTP call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /api/users/login`; the response carries the user and its token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, GatewayError>;

    /// `POST /api/users` as multipart; used by administrators.
    async fn create_profile(&self, profile: &NewProfile) -> Result<User, GatewayError>;

    /// `POST /api/users/perfil/{id}` as multipart.
    async fn edit_profile(&self, id: &UserId, update: &ProfileUpdate)
    -> Result<User, GatewayError>;

    /// `GET /api/users`.
    async fn list_users(&self) -> Result<Vec<User>, GatewayError>;

    /// `GET /api/specialty`.
    async fn list_specialties(&self) -> Result<Vec<Specialty>, GatewayError>;

    /// `POST /api/users/recovered-password/{token}`.
    async fn change_password(&self, reset: &PasswordReset) -> Result<(), GatewayError>;
}
