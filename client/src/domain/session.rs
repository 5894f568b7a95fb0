//! The authenticated session.

use serde::{Deserialize, Serialize};

use super::{AuthToken, LoginValidationError, Role, User, UserId};

/// Who is logged in on this instance, and the token proving it.
///
/// Exactly one session exists per running client. It is persisted next to
/// the token so a restart can rebuild it without a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionDto", into = "SessionDto")]
pub struct Session {
    user: User,
    token: AuthToken,
}

impl Session {
    /// Pair a user with the token the API issued for them.
    pub fn new(user: User, token: AuthToken) -> Self {
        Self { user, token }
    }

    /// Authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Identifier of the authenticated user.
    pub fn user_id(&self) -> &UserId {
        self.user.id()
    }

    /// Role of the authenticated user.
    pub fn role(&self) -> Role {
        self.user.role()
    }

    /// Whether the account has been confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.user.is_confirmed()
    }

    /// Bearer token for outgoing requests.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }
}

#[derive(Serialize, Deserialize)]
struct SessionDto {
    token: String,
    user: User,
}

impl From<Session> for SessionDto {
    fn from(value: Session) -> Self {
        Self {
            token: value.token.expose().to_owned(),
            user: value.user,
        }
    }
}

impl TryFrom<SessionDto> for Session {
    type Error = LoginValidationError;

    fn try_from(value: SessionDto) -> Result<Self, Self::Error> {
        Ok(Self::new(value.user, AuthToken::new(value.token)?))
    }
}
