//! Error types for anyview.

use thiserror::Error;

/// Result type alias using anyview's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for anyview operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A property format outside the known taxonomy (API/version mismatch)
    #[error("Unsupported property format: {0}")]
    UnsupportedFormat(String),

    /// A property's populated value slot disagrees with its declared format
    #[error("Property {key} declares format {format} but carries a {found} value")]
    FormatMismatch {
        key: String,
        format: String,
        found: String,
    },

    /// File icon lookup failed (absorbed by the icon resolver)
    #[error("Icon resolution failed: {0}")]
    IconResolution(String),

    /// A form date value could not be parsed
    #[error("Invalid date value for property {key}: {value}")]
    InvalidDateValue { key: String, value: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Pinned store is at capacity
    #[error("Can't pin more than {0} objects")]
    PinnedLimit(usize),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that mean the referenced entity no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Api { status: 404, .. })
    }

    /// HTTP status annotation, when the error came from the API.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unsupported_format() {
        let err = Error::UnsupportedFormat("relation".to_string());
        assert_eq!(err.to_string(), "Unsupported property format: relation");
    }

    #[test]
    fn test_error_display_format_mismatch() {
        let err = Error::FormatMismatch {
            key: "due".to_string(),
            format: "date".to_string(),
            found: "text".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Property due declares format date but carries a text value"
        );
    }

    #[test]
    fn test_error_display_pinned_limit() {
        let err = Error::PinnedLimit(5);
        assert_eq!(err.to_string(), "Can't pin more than 5 objects");
    }

    #[test]
    fn test_error_display_api() {
        let err = Error::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error [500]: boom");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("space".to_string()).is_not_found());
        assert!(Error::Api {
            status: 404,
            message: String::new()
        }
        .is_not_found());
        assert!(!Error::Api {
            status: 401,
            message: String::new()
        }
        .is_not_found());
        assert!(!Error::Request("refused".to_string()).is_not_found());
    }

    #[test]
    fn test_status_annotation() {
        assert_eq!(Error::NotFound("x".to_string()).status(), Some(404));
        assert_eq!(
            Error::Api {
                status: 403,
                message: String::new()
            }
            .status(),
            Some(403)
        );
        assert_eq!(Error::Config("x".to_string()).status(), None);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
