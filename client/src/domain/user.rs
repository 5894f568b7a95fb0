//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Closed set of roles the clinic API assigns to accounts.
///
/// The wire names are the Spanish strings the API stores in `rol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A patient booking and following their own appointments.
    Paciente,
    /// Front-desk staff managing appointments for patients.
    Asistente,
    /// A doctor approving, finishing, and cancelling appointments.
    Doctor,
    /// Administrator creating accounts and QR codes.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 4] = [Self::Paciente, Self::Asistente, Self::Doctor, Self::Admin];

    /// Wire name used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paciente => "paciente",
            Self::Asistente => "asistente",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value.trim())
            .ok_or_else(|| UnknownRole(value.to_owned()))
    }
}

/// Input payload for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub confirmado: bool,
    pub image: Option<String>,
}

/// Account as returned by the API.
///
/// ## Invariants
/// - `id` is a non-empty server identifier.
/// - `role` is one of the four known roles; unknown roles fail decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    confirmado: bool,
    image: Option<String>,
}

impl User {
    /// Build a user from already validated parts.
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            name,
            email,
            role,
            confirmado,
            image,
        } = draft;
        Self {
            id,
            name,
            email,
            role,
            confirmado,
            image,
        }
    }

    /// Server identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Role driving navigation and lifecycle permissions.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the account has been confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.confirmado
    }

    /// Relative path of the profile image, if any.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Keep only the users holding `role`, preserving order.
///
/// The API has no role filter on `GET /api/users`; pickers for doctors and
/// patients filter client side.
pub fn users_with_role(users: &[User], role: Role) -> Vec<User> {
    users
        .iter()
        .filter(|user| user.role() == role)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(alias = "role")]
    rol: String,
    #[serde(default)]
    confirmado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

/// Errors raised while decoding a [`User`] payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The `_id` field was not a valid identifier.
    InvalidId(super::IdValidationError),
    /// The `rol` field named an unknown role.
    InvalidRole(UnknownRole),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "{err}"),
            Self::InvalidRole(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            email: value.email,
            rol: value.role.as_str().to_owned(),
            confirmado: value.confirmado,
            image: value.image,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let id = UserId::new(value.id).map_err(UserValidationError::InvalidId)?;
        let role = value
            .rol
            .parse::<Role>()
            .map_err(UserValidationError::InvalidRole)?;
        Ok(Self::new(UserDraft {
            id,
            name: value.name,
            email: value.email,
            role,
            confirmado: value.confirmado,
            image: value.image.filter(|path| !path.trim().is_empty()),
        }))
    }
}
