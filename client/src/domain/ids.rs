//! Opaque server identifiers.
//!
//! The API hands out document ids (`_id`) as strings. Each entity gets its own
//! newtype so a notification id can never be passed where an appointment id
//! is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was empty or only whitespace.
    Empty {
        /// Entity the identifier belongs to.
        kind: &'static str,
    },
    /// The identifier carried leading or trailing whitespace.
    Padded {
        /// Entity the identifier belongs to.
        kind: &'static str,
    },
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { kind } => write!(f, "{kind} id must not be empty"),
            Self::Padded { kind } => {
                write!(f, "{kind} id must not contain surrounding whitespace")
            }
        }
    }
}

impl std::error::Error for IdValidationError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(IdValidationError::Empty { kind: $kind });
                }
                if id.trim() != id {
                    return Err(IdValidationError::Padded { kind: $kind });
                }
                Ok(Self(id))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a user account of any role.
    UserId => "user"
);
define_id!(
    /// Identifier of an appointment (cita).
    CitaId => "appointment"
);
define_id!(
    /// Identifier of a medical specialty.
    SpecialtyId => "specialty"
);
define_id!(
    /// Identifier of a notification.
    NotificationId => "notification"
);
define_id!(
    /// Identifier of a document attached to an appointment.
    DocumentId => "document"
);
define_id!(
    /// Identifier of a cancellation or observation note.
    DescriptionId => "description"
);
define_id!(
    /// Identifier of a prescription (receta).
    RecetaId => "prescription"
);
define_id!(
    /// Identifier of an invoice (factura).
    FacturaId => "invoice"
);
define_id!(
    /// Identifier of a stored signature (firma) or signed document.
    FirmaId => "signature"
);
define_id!(
    /// Identifier of a menstrual-cycle record.
    MenstrualControlId => "menstrual control"
);

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty { kind: "user" })]
    #[case("   ", IdValidationError::Empty { kind: "user" })]
    #[case(" 66a1 ", IdValidationError::Padded { kind: "user" })]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: IdValidationError) {
        let err = UserId::new(raw).expect_err("malformed id must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn deserialises_from_plain_string() {
        let id: CitaId = serde_json::from_str("\"668c01073f1f6fe9f80b9afd\"").expect("valid id");
        assert_eq!(id.as_ref(), "668c01073f1f6fe9f80b9afd");
    }

    #[test]
    fn deserialisation_rejects_empty_string() {
        let result: Result<NotificationId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
