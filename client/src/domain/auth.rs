//! Authentication primitives such as login credentials and bearer tokens.
//!
//! Keep raw input parsing outside the services by exposing constructors that
//! validate string inputs before a controller talks to a port.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Token was blank.
    EmptyToken,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyToken => write!(f, "token must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials sent to `POST /api/users/login`.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use clinica_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ana@example.com", "secret").unwrap();
/// assert_eq!(creds.email(), "ana@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used as the account lookup key.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Bearer token returned by a successful login.
///
/// The value is wiped from memory on drop and never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Validate and wrap a raw token.
    pub fn new(token: impl Into<String>) -> Result<Self, LoginValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(LoginValidationError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Header value in `Bearer <token>` form.
    pub fn bearer(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.expose()))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// New password submitted with a recovery token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    recovery_token: String,
    password: Zeroizing<String>,
}

impl PasswordReset {
    /// Validate the recovery token and the new password.
    pub fn try_from_parts(
        recovery_token: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        let recovery_token = recovery_token.trim();
        if recovery_token.is_empty() {
            return Err(LoginValidationError::EmptyToken);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            recovery_token: recovery_token.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Recovery token embedded in the request path.
    pub fn recovery_token(&self) -> &str {
        self.recovery_token.as_str()
    }

    /// Replacement password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
