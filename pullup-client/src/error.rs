use pullup_common::api::ErrorMessage;
use pullup_common::domain::Role;
use reqwest::StatusCode;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

const FALLBACK_MESSAGE: &str = "An unexpected error occurred";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Every failure the client hands to a caller. The `Display` text is what gets shown to the user.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Could not reach the server. Check your connection and try again.")]
    Network(#[source] reqwest::Error),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Incorrect password for this private event")]
    WrongPassword,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("You need to log in first")]
    NotLoggedIn,

    #[error("This action requires a {required} account")]
    WrongRole { required: Role, found: Role },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Unexpected response from the server")]
    Decode(String),

    #[error("Failed to set up the http client: {0}")]
    Setup(String),
}

impl ApiError {
    /// Map a non-success response. `body` is the raw response text, which may or may not be JSON.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let transport = match status {
            StatusCode::UNAUTHORIZED => SESSION_EXPIRED.to_string(),
            _ => format!("Request failed with status {status}"),
        };
        let message = error_message(
            serde_json::from_str::<ErrorMessage>(body).ok().as_ref(),
            &transport,
        );

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::WrongPassword,
            StatusCode::CONFLICT => ApiError::AlreadyRegistered,
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{what} not found"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::WrongPassword => Some(403),
            ApiError::AlreadyRegistered => Some(409),
            ApiError::NotFound(_) => Some(404),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error)
    }
}

/// Pick the most specific text available: `message`, then `detail`, then `error`, then the
/// transport's own description, then a fixed fallback.
pub fn error_message(body: Option<&ErrorMessage>, transport: &str) -> String {
    let structured = body.and_then(|b| {
        [&b.message, &b.detail, &b.error]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
    });

    match structured {
        Some(v) => v,
        None if !transport.trim().is_empty() => transport.to_string(),
        None => FALLBACK_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_takes_precedence_over_detail() {
        let body = ErrorMessage {
            message: Some("Event is full".into()),
            detail: Some("capacity reached".into()),
            error: None,
        };
        assert_eq!(error_message(Some(&body), "HTTP 400"), "Event is full");
    }

    #[test]
    fn detail_then_error_then_transport_then_fallback() {
        let detail = ErrorMessage {
            message: None,
            detail: Some("capacity reached".into()),
            error: Some("ignored".into()),
        };
        assert_eq!(error_message(Some(&detail), "HTTP 400"), "capacity reached");

        let error = ErrorMessage {
            error: Some("Student not found".into()),
            ..Default::default()
        };
        assert_eq!(error_message(Some(&error), "HTTP 404"), "Student not found");

        assert_eq!(error_message(None, "HTTP 500"), "HTTP 500");
        assert_eq!(error_message(None, ""), FALLBACK_MESSAGE);
    }

    #[test]
    fn statuses_map_to_domain_errors() {
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, ""),
            ApiError::WrongPassword
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "{\"error\":\"dup\"}"),
            ApiError::AlreadyRegistered
        ));

        let err = ApiError::from_status(StatusCode::NOT_FOUND, "{\"error\":\"Event not found\"}");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Event not found");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "not json");
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Request failed with status 400 Bad Request"
        );
    }

    #[test]
    fn unauthorized_keeps_the_server_message() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            "{\"message\":\"Invalid email or password\"}",
        );
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Invalid email or password");

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.to_string(), SESSION_EXPIRED);
    }
}
