//! Failure taxonomy shared by every API gateway port.

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors raised by API gateway adapters.
    pub enum GatewayError {
        /// The request never reached the API.
        Transport { message: String } => "API request failed: {message}",
        /// The API did not answer within the configured timeout.
        Timeout { message: String } => "API request timed out: {message}",
        /// The API rejected the bearer token, or none was sent.
        Unauthorized { message: String } => "{message}",
        /// The account may not perform the request.
        Forbidden { message: String } => "{message}",
        /// The resource does not exist.
        NotFound { message: String } => "{message}",
        /// Any other non-success status, with the server's `msg`.
        Rejected { status: u16, message: String } => "{message}",
        /// Any other non-success status whose body carried no `msg`.
        Unexplained { status: u16, message: String } => "{message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "API response could not be decoded: {message}",
    }
}

impl GatewayError {
    /// Whether the server reported the resource missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<GatewayError> for Error {
    fn from(value: GatewayError) -> Self {
        let mut message = value.to_string();
        if message.trim().is_empty() {
            message = "API request failed".to_owned();
        }
        match value {
            GatewayError::Transport { .. } | GatewayError::Timeout { .. } => {
                Self::service_unavailable(message)
            }
            GatewayError::Unauthorized { .. } => Self::unauthorized(message),
            GatewayError::Forbidden { .. } => Self::forbidden(message),
            GatewayError::NotFound { .. } => Self::not_found(message),
            GatewayError::Rejected { status, .. } | GatewayError::Unexplained { status, .. } => {
                match status {
                    400 | 422 => Self::invalid_request(message),
                    409 => Self::conflict(message),
                    _ => Self::internal(message),
                }
            }
            GatewayError::Decode { .. } => Self::internal(message),
        }
    }
}

/// Treat a missing collection as an empty one.
pub fn or_empty<T>(result: Result<Vec<T>, GatewayError>) -> Result<Vec<T>, GatewayError> {
    match result {
        Err(err) if err.is_not_found() => Ok(Vec::new()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(GatewayError::transport("connection refused"), ErrorCode::ServiceUnavailable)]
    #[case(GatewayError::timeout("30s"), ErrorCode::ServiceUnavailable)]
    #[case(GatewayError::unauthorized("token expirado"), ErrorCode::Unauthorized)]
    #[case(GatewayError::forbidden("sin permiso"), ErrorCode::Forbidden)]
    #[case(GatewayError::not_found("Cita no encontrada"), ErrorCode::NotFound)]
    #[case(GatewayError::rejected(400_u16, "Hora no disponible"), ErrorCode::InvalidRequest)]
    #[case(GatewayError::rejected(422_u16, "fecha requerida"), ErrorCode::InvalidRequest)]
    #[case(GatewayError::rejected(409_u16, "ya aprobada"), ErrorCode::Conflict)]
    #[case(GatewayError::rejected(500_u16, "boom"), ErrorCode::InternalError)]
    #[case(GatewayError::unexplained(400_u16, "status 400"), ErrorCode::InvalidRequest)]
    #[case(GatewayError::unexplained(502_u16, "status 502"), ErrorCode::InternalError)]
    #[case(GatewayError::decode("missing field `_id`"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] err: GatewayError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(err).code(), expected);
    }

    #[test]
    fn server_messages_pass_through_verbatim() {
        let err = Error::from(GatewayError::rejected(
            400_u16,
            "Hora no disponible para esa fecha",
        ));
        assert_eq!(err.message(), "Hora no disponible para esa fecha");
    }

    #[test]
    fn missing_lists_become_empty() {
        let listed: Result<Vec<u8>, _> = or_empty(Err(GatewayError::not_found("sin datos")));
        assert_eq!(listed.expect("empty list"), Vec::<u8>::new());

        let failed: Result<Vec<u8>, _> = or_empty(Err(GatewayError::timeout("slow")));
        assert!(failed.is_err());
    }
}
