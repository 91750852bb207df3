use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The API answered with a non-success status.
    #[error("API returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("Entity not found")]
    NotFound,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RepositoryError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if err.is_builder() {
            RepositoryError::Unexpected(format!("Invalid request: {err}"))
        } else {
            RepositoryError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Unexpected(format!("I/O error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_is_exposed() {
        let err = RepositoryError::Status {
            status: 409,
            message: Some("Email già registrata".to_string()),
        };
        assert_eq!(err.server_message(), Some("Email già registrata"));
        assert_eq!(err.to_string(), "API returned 409: Email già registrata");

        let bare = RepositoryError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(bare.server_message(), None);
        assert_eq!(bare.to_string(), "API returned 500");
    }
}
