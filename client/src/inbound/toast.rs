//! Transient user-facing messages.

use std::fmt;

use crate::domain::{Error, ErrorCode};

/// Whether a toast reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short message shown at the bottom of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    /// Success toast with `message`.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    /// Error toast with `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    /// Error toast for a failed action.
    ///
    /// Validation and session failures carry a message meant for the user
    /// (a taken hour, a missing reason, an expired login) and are shown
    /// verbatim; anything else shows `fallback`.
    pub fn failure(err: &Error, fallback: &str) -> Self {
        match err.code() {
            ErrorCode::InvalidRequest | ErrorCode::Unauthorized => Self::error(err.message()),
            _ => Self::error(fallback),
        }
    }

    /// Whether this toast reports a failure.
    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            ToastKind::Success => "✔",
            ToastKind::Error => "✘",
        };
        write!(f, "{marker} {}", self.message)
    }
}
