use serde::Serialize;
use thiserror::Error;

/// Machine-readable category of an [`ApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    AuthRequired,
    AuthRejected,
    AuthInsufficient,
    NotFound,
    ServerFault,
    NetworkFailure,
    ParseFailure,
    Rejected,
}

/// Failure of a request against the backend. `Display` yields the message
/// shown to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("please log in to continue")]
    AuthRequired,

    #[error("unauthorized, please log in again")]
    AuthRejected,

    #[error("admin privileges required")]
    AuthInsufficient,

    #[error("record not found")]
    NotFound,

    #[error("server error, try again")]
    ServerFault(u16),

    #[error("network error, check connection")]
    NetworkFailure(String),

    #[error("failed to parse server response")]
    ParseFailure(String),

    #[error("request rejected by server")]
    Rejected(u16),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-2xx status to its error.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiError::AuthRejected,
            403 => ApiError::AuthInsufficient,
            404 => ApiError::NotFound,
            500..=599 => ApiError::ServerFault(status),
            _ => ApiError::Rejected(status),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::AuthRequired => ErrorKind::AuthRequired,
            ApiError::AuthRejected => ErrorKind::AuthRejected,
            ApiError::AuthInsufficient => ErrorKind::AuthInsufficient,
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::ServerFault(_) => ErrorKind::ServerFault,
            ApiError::NetworkFailure(_) => ErrorKind::NetworkFailure,
            ApiError::ParseFailure(_) => ErrorKind::ParseFailure,
            ApiError::Rejected(_) => ErrorKind::Rejected,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// HTTP status behind the error, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthRejected => Some(401),
            ApiError::AuthInsufficient => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::ServerFault(status) | ApiError::Rejected(status) => Some(*status),
            _ => None,
        }
    }

    /// Low-level detail for logs; never shown to the user.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::NetworkFailure(detail) | ApiError::ParseFailure(detail) => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ParseFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_taxonomy() {
        assert_eq!(ApiError::from_status(401).kind(), ErrorKind::AuthRejected);
        assert_eq!(ApiError::from_status(403).kind(), ErrorKind::AuthInsufficient);
        assert_eq!(ApiError::from_status(404).kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::from_status(503), ApiError::ServerFault(503));
        assert_eq!(ApiError::from_status(400), ApiError::Rejected(400));
    }

    #[test]
    fn user_messages_are_fixed() {
        assert_eq!(
            ApiError::AuthRejected.user_message(),
            "unauthorized, please log in again"
        );
        assert_eq!(
            ApiError::NetworkFailure("connection refused".into()).user_message(),
            "network error, check connection"
        );
        assert_eq!(
            ApiError::ParseFailure("eof".into()).detail(),
            Some("eof")
        );
    }
}
